// [apps/harvester/src/main.rs]
//! APARATO: HARVESTER BINARY ENTRY POINT
//! CLASIFICACIÓN: APPLICATION SHELL (ESTRATO L3)
//! RESPONSABILIDAD: BOOTSTRAP DE INFRAESTRUCTURA Y ARRANQUE DEL SUPERVISOR
//!
//! Parses configuration, wires every component the supervisor owns, spawns
//! the shutdown signal handler, then drives the state machine until it has
//! fully sequenced a shutdown.

use anyhow::{Context, Result};
use clap::Parser;
use harvester_core::config::HarvesterConfig;
use harvester_core::supervisor::{Supervisor, SupervisorConfig};
use harvester_core::{shutdown, TracingNotificationHook};
use harvester_core_rate_limiter::{RateLimiter, RateLimiterConfig};
use harvester_domain_credential::{EnvPollKeyProvider, UpstreamProbeValidator};
use harvester_domain_models::Credential;
use harvester_domain_reducer::Reducer;
use harvester_domain_spider::{Spider, SpiderConfig};
use harvester_infra_async_pusher::AsyncPusher;
use harvester_infra_remote_store::{AggregateRepository, RemoteStoreClient};
use harvester_infra_rotating_log::{RotatingLog, RotatingLogConfig};
use harvester_infra_upstream_client::{ItemCatalog, RankFloor, UpstreamClient};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let config = HarvesterConfig::parse();
    info!(storage_path = %config.storage_path, "harvester core starting");

    let cancel = CancellationToken::new();

    let rate_limiter = Arc::new(RateLimiter::new(RateLimiterConfig::default()));
    let rank_floor = RankFloor { tier: config.rank_floor_tier.clone(), division: config.rank_floor_division.clone() };
    let upstream = Arc::new(UpstreamClient::new(
        config.upstream_base_url.clone(),
        Credential::new(config.upstream_credential.clone()),
        rate_limiter,
        cancel.clone(),
        rank_floor,
    ));

    let catalog_http = reqwest::Client::builder().timeout(Duration::from_secs(30)).build().context("failed to build the item-catalog HTTP client")?;
    let catalog = Arc::new(ItemCatalog::fetch(&catalog_http, &config.item_catalog_url).await.context("failed to fetch the item metadata catalog")?);

    let spider_config = SpiderConfig {
        matches_per_player: config.matches_per_player,
        timeline_sampling_rate: config.timeline_sampling_rate,
        max_players: config.max_players,
        ..SpiderConfig::default()
    };
    let spider = Spider::new(spider_config, upstream.clone(), catalog);

    let (warm_tx, warm_rx) = mpsc::unbounded_channel();
    let log = RotatingLog::new(std::path::Path::new(&config.storage_path), RotatingLogConfig::default(), warm_tx)
        .context("failed to create the hot/warm/cold storage directories")?;

    let reducer = Reducer::new();

    let store_client =
        RemoteStoreClient::connect(&config.remote_store_url, config.remote_store_auth.clone()).await.context("failed to connect to the remote aggregate store")?;
    let pusher = AsyncPusher::spawn(Arc::new(AggregateRepository::new(store_client)));

    let key_provider = Arc::new(EnvPollKeyProvider::new(config.key_poll_var.clone(), config.key_poll_interval));
    let key_validator = Arc::new(UpstreamProbeValidator::new(config.credential_probe_url.clone()));
    let notify_hook = Arc::new(TracingNotificationHook);

    let supervisor_config = SupervisorConfig {
        warm_file_threshold: config.warm_file_threshold,
        bloom_reset_interval: config.bloom_reset_interval,
        shutdown_timeout: config.shutdown_timeout,
        retention_delta: config.retention_delta,
        state_poll_tick: config.state_poll_tick,
        manifest_url: config.version_manifest_url.clone(),
        data_url: config.remote_store_url.clone(),
    };

    let mut supervisor = Supervisor::new(
        supervisor_config,
        upstream,
        spider,
        log,
        reducer,
        pusher,
        key_provider,
        key_validator,
        notify_hook,
        warm_rx,
        cancel,
    );

    tokio::spawn(shutdown::install(supervisor.shutdown_handle()));

    supervisor.run().await;
    info!("harvester core exited cleanly");
    Ok(())
}
