// [libs/infra/upstream-client/src/client.rs]
//! APARATO: UPSTREAM MATCH API CLIENT
//! CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
//! RESPONSABILIDAD: ENVOLTURA TIPADA SOBRE LA API DE PARTIDAS BAJO PRESUPUESTO DE TASA
//!
//! Every operation acquires the rate limiter, issues one outbound request
//! under the current credential, and decodes the JSON payload. The
//! credential slot is mutable under a short lock to permit hot-swap during
//! `WAITING_FOR_KEY` without reconstructing the client.

use crate::dto::{AccountDto, LadderEntryDto, MatchDto, RankedEntryDto, TimelineDto};
use crate::errors::ClientError;
use crate::item_catalog::ItemCatalog;
use crate::rank::RankFloor;
use harvester_core_rate_limiter::RateLimiter;
use harvester_domain_models::{Credential, PatchTag};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// Header the upstream match API expects the bearer credential under.
const CREDENTIAL_HEADER: &str = "X-Riot-Token";

/// Fallback sleep when a 429 carries no `Retry-After` hint.
const DEFAULT_RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(30);

pub struct UpstreamClient {
    http: Client,
    base_url: String,
    credential: RwLock<Credential>,
    rate_limiter: Arc<RateLimiter>,
    cancel: CancellationToken,
    rank_floor: RankFloor,
}

impl UpstreamClient {
    pub fn new(base_url: String, credential: Credential, rate_limiter: Arc<RateLimiter>, cancel: CancellationToken, rank_floor: RankFloor) -> Self {
        Self {
            http: Client::builder()
                .user_agent("harvester-core/0.1")
                .timeout(Duration::from_secs(30))
                .build()
                .expect("reqwest client construction cannot fail with these settings"),
            base_url: base_url.trim_end_matches('/').to_string(),
            credential: RwLock::new(credential),
            rate_limiter,
            cancel,
            rank_floor,
        }
    }

    /// Hot-swaps the bearer credential. Uncontended during `WAITING_FOR_KEY`
    /// since the spider is paused and issuing no requests.
    #[instrument(skip(self, credential))]
    pub async fn set_credential(&self, credential: Credential) {
        *self.credential.write().await = credential;
        debug!("upstream credential swapped");
    }

    async fn request_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        loop {
            self.rate_limiter.acquire(&self.cancel).await.map_err(|_| ClientError::Cancelled)?;

            let token = self.credential.read().await.as_str().to_string();
            let response = self.http.get(url).header(CREDENTIAL_HEADER, token).send().await?;
            let status = response.status();

            match status {
                StatusCode::OK => return Ok(response.json::<T>().await?),
                StatusCode::TOO_MANY_REQUESTS => {
                    let retry_after = response
                        .headers()
                        .get("Retry-After")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<u64>().ok())
                        .map(Duration::from_secs)
                        .unwrap_or(DEFAULT_RATE_LIMIT_BACKOFF);

                    warn!(?retry_after, "upstream rate limited, backing off");
                    tokio::select! {
                        _ = tokio::time::sleep(retry_after) => continue,
                        _ = self.cancel.cancelled() => return Err(ClientError::Cancelled),
                    }
                }
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(ClientError::CredentialInvalid),
                StatusCode::NOT_FOUND => return Err(ClientError::NotFound),
                other => return Err(ClientError::Transient(other.as_u16())),
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn account_by_id(&self, game_name: &str, tag: &str) -> Result<AccountDto, ClientError> {
        let url = format!("{}/riot/account/v1/accounts/by-riot-id/{}/{}", self.base_url, game_name, tag);
        self.request_json(&url).await
    }

    #[instrument(skip(self))]
    pub async fn match_ids_by_player(&self, player_id: &str, count: u32) -> Result<Vec<String>, ClientError> {
        let url = format!(
            "{}/lol/match/v5/matches/by-puuid/{}/ids?queue=420&count={}",
            self.base_url, player_id, count
        );
        self.request_json(&url).await
    }

    #[instrument(skip(self))]
    pub async fn fetch_match(&self, match_id: &str) -> Result<MatchDto, ClientError> {
        let url = format!("{}/lol/match/v5/matches/{}", self.base_url, match_id);
        self.request_json(&url).await
    }

    #[instrument(skip(self))]
    pub async fn timeline(&self, match_id: &str) -> Result<TimelineDto, ClientError> {
        let url = format!("{}/lol/match/v5/matches/{}/timeline", self.base_url, match_id);
        self.request_json(&url).await
    }

    #[instrument(skip(self))]
    pub async fn ranked_entries(&self, player_id: &str) -> Result<Vec<RankedEntryDto>, ClientError> {
        let url = format!("{}/lol/league/v4/entries/by-puuid/{}", self.base_url, player_id);
        self.request_json(&url).await
    }

    #[instrument(skip(self))]
    pub async fn top_of_ladder(&self) -> Result<Vec<LadderEntryDto>, ClientError> {
        let url = format!("{}/lol/league/v4/challengerleagues/by-queue/RANKED_SOLO_5x5", self.base_url);
        self.request_json(&url).await
    }

    /// Returns `(tier, division)` for the player's solo-queue entry, or
    /// `None` if they have no ranked solo entry.
    #[instrument(skip(self))]
    pub async fn solo_queue_rank(&self, player_id: &str) -> Result<Option<(String, String)>, ClientError> {
        let entries = self.ranked_entries(player_id).await?;
        Ok(entries
            .into_iter()
            .find(|entry| entry.queue_type == "RANKED_SOLO_5x5")
            .map(|entry| (entry.tier, entry.division)))
    }

    /// Pure predicate comparing a rank against the configured floor.
    pub fn rank_qualifies(&self, tier: &str, division: &str) -> bool {
        self.rank_floor.qualifies(tier, division)
    }

    /// Fetches the current-version manifest (newest first) and normalizes
    /// the leading entry into a patch tag. Served from a static CDN
    /// endpoint rather than the rate-limited match API — no credential,
    /// no rate-limiter acquisition.
    #[instrument(skip(self))]
    pub async fn current_patch(&self, manifest_url: &str) -> Result<PatchTag, ClientError> {
        let versions: Vec<String> = self.http.get(manifest_url).send().await?.json().await?;
        let newest = versions.first().ok_or(ClientError::NotFound)?;
        PatchTag::parse(newest).ok_or(ClientError::NotFound)
    }

    /// Ordered, de-duplicated list of completed-item purchases for one
    /// participant (by timeline `participantId`, 1-based), filtered
    /// through the completed-item predicate.
    pub fn build_order_from_timeline(timeline: &TimelineDto, participant_id: u32, catalog: &ItemCatalog) -> Vec<u32> {
        let mut build_order = Vec::new();

        for frame in &timeline.info.frames {
            for event in &frame.events {
                if event.event_type != "ITEM_PURCHASED" {
                    continue;
                }
                if event.participant_id != Some(participant_id) {
                    continue;
                }
                let Some(item_id) = event.item_id else { continue };
                if !catalog.is_completed_item(item_id) {
                    continue;
                }
                if !build_order.contains(&item_id) {
                    build_order.push(item_id);
                }
            }
        }

        build_order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{TimelineEventDto, TimelineFrameDto, TimelineInfoDto};

    #[test]
    fn build_order_filters_by_participant_dedupes_and_respects_the_catalog() {
        let timeline = TimelineDto {
            info: TimelineInfoDto {
                frames: vec![TimelineFrameDto {
                    events: vec![
                        TimelineEventDto { event_type: "ITEM_PURCHASED".into(), participant_id: Some(1), item_id: Some(1001) },
                        TimelineEventDto { event_type: "ITEM_PURCHASED".into(), participant_id: Some(2), item_id: Some(2003) },
                        TimelineEventDto { event_type: "ITEM_DESTROYED".into(), participant_id: Some(1), item_id: Some(1001) },
                        TimelineEventDto { event_type: "ITEM_PURCHASED".into(), participant_id: Some(1), item_id: Some(1001) },
                        TimelineEventDto { event_type: "ITEM_PURCHASED".into(), participant_id: Some(1), item_id: Some(3006) },
                    ],
                }],
            },
        };

        let catalog = ItemCatalog::with_completed([1001]);
        let build_order = UpstreamClient::build_order_from_timeline(&timeline, 1, &catalog);
        // Only the completed item survives, the repeated purchase is
        // deduped, and participant 2's event is excluded entirely.
        assert_eq!(build_order, vec![1001]);
    }
}
