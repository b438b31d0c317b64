// [apps/harvester/src/config.rs]
//! APARATO: SUPERVISOR CONFIGURATION
//! RESPONSABILIDAD: TIPADO DE LOS PARÁMETROS DE ENTORNO DEL BINARIO
//!
//! One `clap(env)` field per tunable named in spec section 6, plus the
//! wiring a standalone binary needs that spec.md treats as given (upstream
//! base URL, manifest/catalog endpoints, rank floor). Defaults mirror the
//! ones documented throughout the spec and already hard-coded as crate
//! defaults (`SpiderConfig`, `RotatingLogConfig`, `RateLimiterConfig`).

use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "harvester", about = "Match-data harvesting core supervisor")]
pub struct HarvesterConfig {
    /// Base directory for the hot/warm/cold tiered log.
    #[arg(long, env = "STORAGE_PATH", default_value = "./data")]
    pub storage_path: String,

    /// Bearer credential for the upstream match API, rotatable at runtime.
    #[arg(long, env = "UPSTREAM_CREDENTIAL")]
    pub upstream_credential: String,

    /// Upstream match API base URL.
    #[arg(long, env = "UPSTREAM_BASE_URL")]
    pub upstream_base_url: String,

    /// Current-version manifest endpoint (array of version strings, newest first).
    #[arg(long, env = "VERSION_MANIFEST_URL")]
    pub version_manifest_url: String,

    /// Item-metadata endpoint backing the completed-item predicate.
    #[arg(long, env = "ITEM_CATALOG_URL")]
    pub item_catalog_url: String,

    /// Lightweight probe endpoint a candidate credential is validated against.
    #[arg(long, env = "CREDENTIAL_PROBE_URL")]
    pub credential_probe_url: String,

    /// Minimum challenger-ladder tier a player must hold to be crawled.
    #[arg(long, env = "RANK_FLOOR_TIER", default_value = "EMERALD")]
    pub rank_floor_tier: String,

    /// Minimum division within `rank_floor_tier`.
    #[arg(long, env = "RANK_FLOOR_DIVISION", default_value = "IV")]
    pub rank_floor_division: String,

    /// Remote aggregate store endpoint (libsql:// or https://, or a local path for tests).
    #[arg(long, env = "REMOTE_STORE_URL")]
    pub remote_store_url: String,

    /// Remote aggregate store auth token, required for a remote URL.
    #[arg(long, env = "REMOTE_STORE_AUTH")]
    pub remote_store_auth: Option<String>,

    /// Warm files accumulated before the supervisor triggers a reduce cycle.
    #[arg(long, env = "WARM_FILE_THRESHOLD", default_value_t = 10)]
    pub warm_file_threshold: u32,

    /// Interval the default env-poll credential provider checks for a new value.
    #[arg(long, env = "KEY_POLL_INTERVAL", value_parser = parse_seconds, default_value = "30")]
    pub key_poll_interval: Duration,

    /// Environment variable the default credential provider polls.
    #[arg(long, env = "KEY_POLL_VAR", default_value = "UPSTREAM_CREDENTIAL_NEXT")]
    pub key_poll_var: String,

    /// Maximum time the supervisor waits for a final reduce during shutdown.
    #[arg(long, env = "SHUTDOWN_TIMEOUT", value_parser = parse_seconds, default_value = "300")]
    pub shutdown_timeout: Duration,

    /// Reduce cycles between automatic `spider.reset()` calls.
    #[arg(long, env = "BLOOM_RESET_INTERVAL", default_value_t = 5)]
    pub bloom_reset_interval: u32,

    /// Independent probability of sampling a match's timeline.
    #[arg(long, env = "TIMELINE_SAMPLING_RATE", default_value_t = 0.20)]
    pub timeline_sampling_rate: f64,

    /// Most recent ranked matches fetched per player per step.
    #[arg(long, env = "MATCHES_PER_PLAYER", default_value_t = 20)]
    pub matches_per_player: u32,

    /// Cap on simultaneously tracked players.
    #[arg(long, env = "MAX_PLAYERS", default_value_t = 50_000)]
    pub max_players: usize,

    /// Minor-version delta subtracted from the current patch to compute the retention floor.
    #[arg(long, env = "RETENTION_DELTA", default_value_t = 3)]
    pub retention_delta: u32,

    /// Poll tick the supervisor sleeps when it has no pending work to dispatch.
    #[arg(long, env = "STATE_POLL_TICK_MS", value_parser = parse_millis, default_value = "100")]
    pub state_poll_tick: Duration,
}

fn parse_seconds(raw: &str) -> Result<Duration, std::num::ParseIntError> {
    raw.parse::<u64>().map(Duration::from_secs)
}

fn parse_millis(raw: &str) -> Result<Duration, std::num::ParseIntError> {
    raw.parse::<u64>().map(Duration::from_millis)
}
