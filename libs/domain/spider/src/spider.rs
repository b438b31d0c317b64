// [libs/domain/spider/src/spider.rs]
//! APARATO: CRAWL ENGINE
//! RESPONSABILIDAD: CAMINATA DEL GRAFO DE JUGADORES CON DEDUPLICACIÓN POR BLOOM
//!
//! One step pops one player, fetches their recent ranked matches, and for
//! each unseen match id writes ten participant rows plus (with independent
//! probability) a sampled timeline-derived build order. `CredentialInvalid`
//! propagates out of `step()` unchanged — the supervisor owns the reaction.

use crate::config::SpiderConfig;
use crate::errors::SpiderError;
use crate::stats::SpiderStats;
use harvester_core_probabilistic::ShardedFilter;
use harvester_domain_models::{ParticipantRow, PatchTag};
use harvester_infra_rotating_log::RotatingLog;
use harvester_infra_upstream_client::{ClientError, ItemCatalog, UpstreamClient};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    QueueEmpty,
    PlayerUnqualified,
    MatchesWritten { matches: u32, timelines: u32 },
}

pub struct Spider {
    config: SpiderConfig,
    upstream: Arc<UpstreamClient>,
    catalog: Arc<ItemCatalog>,
    visited_matches: ShardedFilter<String>,
    visited_players: ShardedFilter<String>,
    queue: VecDeque<String>,
    rng: StdRng,
    stats: SpiderStats,
}

impl Spider {
    pub fn new(config: SpiderConfig, upstream: Arc<UpstreamClient>, catalog: Arc<ItemCatalog>) -> Self {
        let visited_matches = ShardedFilter::new(config.bloom_shard_count, config.bloom_match_capacity, config.bloom_false_positive_rate);
        let visited_players = ShardedFilter::new(config.bloom_shard_count, config.bloom_player_capacity, config.bloom_false_positive_rate);
        Self {
            config,
            upstream,
            catalog,
            visited_matches,
            visited_players,
            queue: VecDeque::new(),
            rng: StdRng::from_entropy(),
            stats: SpiderStats::default(),
        }
    }

    pub fn stats(&self) -> &SpiderStats {
        &self.stats
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Enqueues the highest-LP qualifying player from the challenger
    /// ladder. `CredentialInvalid` is the caller's to react to.
    #[instrument(skip(self))]
    pub async fn seed_from_top_of_ladder(&mut self) -> Result<(), SpiderError> {
        let ladder = self.upstream.top_of_ladder().await?;
        if let Some(top) = ladder.into_iter().max_by_key(|entry| entry.league_points) {
            self.visited_players.insert(&top.puuid);
            self.queue.push_back(top.puuid);
            self.stats.active_players += 1;
            info!("crawl seeded from top-of-ladder player");
        }
        Ok(())
    }

    /// One batch: pop one player, harvest their recent unseen matches.
    /// Returns without writing when the queue is empty or the player
    /// doesn't meet the rank floor.
    #[instrument(skip(self, log))]
    pub async fn step(&mut self, log: &mut RotatingLog, current_patch: PatchTag) -> Result<StepOutcome, SpiderError> {
        let Some(player_id) = self.queue.pop_front() else {
            return Ok(StepOutcome::QueueEmpty);
        };

        let rank = self.upstream.solo_queue_rank(&player_id).await?;
        let qualifies = match &rank {
            Some((tier, division)) => self.upstream.rank_qualifies(tier, division),
            None => false,
        };
        if !qualifies {
            self.stats.players_skipped += 1;
            return Ok(StepOutcome::PlayerUnqualified);
        }

        let match_ids = self.upstream.match_ids_by_player(&player_id, self.config.matches_per_player).await?;

        let mut matches_written = 0u32;
        let mut timelines_collected = 0u32;

        for match_id in match_ids {
            if self.visited_matches.contains(&match_id) {
                continue;
            }
            self.visited_matches.insert(&match_id);

            let detail = match self.upstream.fetch_match(&match_id).await {
                Ok(detail) => detail,
                Err(ClientError::NotFound) => continue,
                Err(other) => return Err(other.into()),
            };

            let Some(match_patch) = PatchTag::parse(&detail.info.game_version) else { continue };
            if match_patch != current_patch {
                debug!(%match_id, "skipping match off the current patch");
                continue;
            }

            let timeline = if self.rng.gen_bool(self.config.timeline_sampling_rate) {
                match self.upstream.timeline(&match_id).await {
                    Ok(timeline) => {
                        timelines_collected += 1;
                        Some(timeline)
                    }
                    Err(ClientError::NotFound) => None,
                    Err(other) => return Err(other.into()),
                }
            } else {
                None
            };

            for (index, participant) in detail.info.participants.iter().enumerate() {
                let build_order =
                    timeline.as_ref().map(|timeline| UpstreamClient::build_order_from_timeline(timeline, (index + 1) as u32, &self.catalog));

                let row = ParticipantRow {
                    match_id: detail.metadata.match_id.clone(),
                    game_version: detail.info.game_version.clone(),
                    game_duration: detail.info.game_duration,
                    game_creation: detail.info.game_creation,
                    puuid: participant.puuid.clone(),
                    game_name: None,
                    tag_line: None,
                    champion_id: participant.champion_id,
                    champion_name: participant.champion_name.clone(),
                    team_position: participant.team_position.clone(),
                    win: participant.win,
                    item0: participant.item0,
                    item1: participant.item1,
                    item2: participant.item2,
                    item3: participant.item3,
                    item4: participant.item4,
                    item5: participant.item5,
                    build_order,
                };

                log.write_row(&row)?;

                if !self.visited_players.contains(&participant.puuid) && self.stats.active_players < self.config.max_players {
                    self.visited_players.insert(&participant.puuid);
                    self.queue.push_back(participant.puuid.clone());
                    self.stats.active_players += 1;
                }
            }

            log.match_complete()?;
            matches_written += 1;
            self.stats.total_matches_written += 1;
        }

        self.stats.timelines_collected += timelines_collected as u64;
        Ok(StepOutcome::MatchesWritten { matches: matches_written, timelines: timelines_collected })
    }

    /// Discards bloom sets, clears the queue, zeros counters. Does not
    /// touch on-disk state.
    pub fn reset(&mut self) {
        self.visited_matches = ShardedFilter::new(self.config.bloom_shard_count, self.config.bloom_match_capacity, self.config.bloom_false_positive_rate);
        self.visited_players = ShardedFilter::new(self.config.bloom_shard_count, self.config.bloom_player_capacity, self.config.bloom_false_positive_rate);
        self.queue.clear();
        self.stats = SpiderStats::default();
        info!("spider reset: bloom sets and queue cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvester_core_rate_limiter::{RateLimiter, RateLimiterConfig};
    use harvester_domain_models::Credential;
    use harvester_infra_rotating_log::{RotatingLog, RotatingLogConfig};
    use harvester_infra_upstream_client::RankFloor;
    use serde_json::json;
    use tempfile::tempdir;
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn new_log() -> (RotatingLog, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        let log = RotatingLog::new(dir.path(), RotatingLogConfig { max_matches_per_file: 10_000, ..Default::default() }, tx).unwrap();
        (log, dir)
    }

    fn spider_against(base_url: String) -> Spider {
        let rate_limiter = Arc::new(RateLimiter::new(RateLimiterConfig::default()));
        let upstream = UpstreamClient::new(
            base_url,
            Credential::new("test-token"),
            rate_limiter,
            CancellationToken::new(),
            RankFloor::default(),
        );
        let config = SpiderConfig { timeline_sampling_rate: 0.0, ..SpiderConfig::default() };
        Spider::new(config, Arc::new(upstream), Arc::new(ItemCatalog::default()))
    }

    #[tokio::test]
    async fn step_qualifying_player_writes_new_match_and_enqueues_participants() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/lol/league/v4/entries/by-puuid/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "queueType": "RANKED_SOLO_5x5", "tier": "EMERALD", "division": "IV", "wins": 10, "losses": 5 }
            ])))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/lol/match/v5/matches/by-puuid/p1/ids"))
            .and(query_param("queue", "420"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["NA1_1"])))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/lol/match/v5/matches/NA1_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "metadata": { "matchId": "NA1_1", "participants": ["p1", "p2"] },
                "info": {
                    "gameVersion": "14.3.567.1234",
                    "gameDuration": 1800,
                    "gameCreation": 1,
                    "participants": [
                        {
                            "puuid": "p1", "championId": 1, "championName": "Annie", "teamPosition": "MIDDLE",
                            "win": true, "item0": 1001, "item1": 0, "item2": 0, "item3": 0, "item4": 0, "item5": 0
                        },
                        {
                            "puuid": "p2", "championId": 2, "championName": "Ahri", "teamPosition": "TOP",
                            "win": false, "item0": 0, "item1": 0, "item2": 0, "item3": 0, "item4": 0, "item5": 0
                        }
                    ]
                }
            })))
            .mount(&server)
            .await;

        let mut spider = spider_against(server.uri());
        spider.queue.push_back("p1".to_string());
        let (mut log, _dir) = new_log();
        let current_patch = PatchTag { major: 14, minor: 3 };

        let outcome = spider.step(&mut log, current_patch).await.unwrap();

        assert_eq!(outcome, StepOutcome::MatchesWritten { matches: 1, timelines: 0 });
        assert_eq!(spider.stats().total_matches_written, 1);
        assert!(spider.visited_matches.contains(&"NA1_1".to_string()));
        // p1 was the crawled player, not re-enqueued from its own match;
        // p2 is newly discovered and queued for a future step.
        assert_eq!(spider.queue_len(), 1);
    }

    #[tokio::test]
    async fn step_unqualified_player_skips_without_fetching_matches() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/lol/league/v4/entries/by-puuid/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "queueType": "RANKED_SOLO_5x5", "tier": "BRONZE", "division": "I", "wins": 1, "losses": 1 }
            ])))
            .mount(&server)
            .await;

        let mut spider = spider_against(server.uri());
        spider.queue.push_back("p1".to_string());
        let (mut log, _dir) = new_log();
        let current_patch = PatchTag { major: 14, minor: 3 };

        let outcome = spider.step(&mut log, current_patch).await.unwrap();

        assert_eq!(outcome, StepOutcome::PlayerUnqualified);
        assert_eq!(spider.stats().players_skipped, 1);
    }

    #[tokio::test]
    async fn step_skips_matches_already_in_the_visited_set() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/lol/league/v4/entries/by-puuid/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "queueType": "RANKED_SOLO_5x5", "tier": "EMERALD", "division": "IV", "wins": 10, "losses": 5 }
            ])))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/lol/match/v5/matches/by-puuid/p1/ids"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["NA1_1"])))
            .mount(&server)
            .await;

        let mut spider = spider_against(server.uri());
        spider.visited_matches.insert(&"NA1_1".to_string());
        spider.queue.push_back("p1".to_string());
        let (mut log, _dir) = new_log();
        let current_patch = PatchTag { major: 14, minor: 3 };

        let outcome = spider.step(&mut log, current_patch).await.unwrap();

        assert_eq!(outcome, StepOutcome::MatchesWritten { matches: 0, timelines: 0 });
    }

    #[tokio::test]
    async fn step_on_empty_queue_returns_queue_empty() {
        let server = MockServer::start().await;
        let mut spider = spider_against(server.uri());
        let (mut log, _dir) = new_log();
        let current_patch = PatchTag { major: 14, minor: 3 };

        let outcome = spider.step(&mut log, current_patch).await.unwrap();
        assert_eq!(outcome, StepOutcome::QueueEmpty);
    }

    #[test]
    fn reset_clears_stats_and_queue() {
        let mut stats = SpiderStats::default();
        stats.active_players = 5;
        stats.total_matches_written = 10;
        let reset = SpiderStats::default();
        assert_ne!(stats, reset);
    }
}
