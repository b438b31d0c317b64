// [libs/domain/spider/src/stats.rs]

/// Running counters for the supervisor's telemetry line. Reset alongside
/// the bloom sets and queue on `reset()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpiderStats {
    pub active_players: usize,
    pub total_matches_written: u64,
    pub timelines_collected: u64,
    pub players_skipped: u64,
}
