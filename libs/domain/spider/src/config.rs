// [libs/domain/spider/src/config.rs]

/// Tunables for one crawl engine instance. Defaults mirror spec section 4.5.
#[derive(Debug, Clone)]
pub struct SpiderConfig {
    /// Most recent ranked matches fetched per player per step.
    pub matches_per_player: u32,
    /// Independent probability of additionally fetching a match's timeline.
    pub timeline_sampling_rate: f64,
    /// Cap on simultaneously tracked (enqueued or already-visited) players.
    pub max_players: usize,
    pub bloom_match_capacity: usize,
    pub bloom_player_capacity: usize,
    pub bloom_false_positive_rate: f64,
    pub bloom_shard_count: usize,
}

impl Default for SpiderConfig {
    fn default() -> Self {
        Self {
            matches_per_player: 20,
            timeline_sampling_rate: 0.20,
            max_players: 50_000,
            bloom_match_capacity: 500_000,
            bloom_player_capacity: 1_000_000,
            bloom_false_positive_rate: 0.001,
            bloom_shard_count: 8,
        }
    }
}
