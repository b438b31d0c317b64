// [libs/domain/reducer/src/cycle.rs]
//! APARATO: REDUCE CYCLE ORCHESTRATOR
//! RESPONSABILIDAD: UN PASE COMPLETO FLUSH -> AGREGAR -> EXPORTAR -> ARCHIVAR -> PODAR
//!
//! Parallel per-file decoding (Rayon), sequential associative merge, grounded
//! on the census pipeline's chunked ingest-then-seal shape.

use crate::archive::archive_warm_file;
use crate::errors::ReduceError;
use crate::process::process_warm_file;
use chrono::{DateTime, Utc};
use harvester_domain_models::{AggregateCounters, ExportArtifact, Manifest, PatchTag};
use harvester_infra_rotating_log::RotatingLog;
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;
use tracing::{info, instrument};

/// Result of one completed reduce cycle, handed back to the supervisor so
/// it can forward the artifact to the async pusher.
#[derive(Debug, Clone)]
pub struct ReduceOutcome {
    pub artifact: ExportArtifact,
    pub manifest: Manifest,
    pub content_hash: String,
    pub archived_files: Vec<PathBuf>,
    pub warm_files_processed: usize,
}

/// Holds the global aggregate state across the process's lifetime. Each
/// cycle folds in only the rows from warm files processed that cycle —
/// the counters themselves persist across many cycles until pruned.
#[derive(Debug, Default)]
pub struct Reducer {
    counters: AggregateCounters,
}

impl Reducer {
    pub fn new() -> Self {
        Self { counters: AggregateCounters::new() }
    }

    pub fn counters(&self) -> &AggregateCounters {
        &self.counters
    }

    /// Discards all accumulated counters. Called by the supervisor on a
    /// fresh restart, alongside `Spider::reset()` — a new credential means
    /// a new crawl identity, so stale aggregate state is dropped with it.
    pub fn reset(&mut self) {
        self.counters = AggregateCounters::new();
    }

    /// Runs one reduce cycle: rotate the log's active hot file into warm,
    /// aggregate every warm file, emit a versioned export artifact,
    /// archive consumed files into cold, and prune patches older than the
    /// retention floor. Never deletes a warm file it failed to aggregate.
    #[instrument(skip(self, log))]
    pub fn run_cycle(
        &mut self,
        log: &mut RotatingLog,
        current_patch: PatchTag,
        retention_delta: u32,
        data_url: &str,
        generated_at: DateTime<Utc>,
    ) -> Result<ReduceOutcome, ReduceError> {
        log.flush_and_rotate()?;

        let paths = log.paths().clone();
        let mut warm_files: Vec<PathBuf> = fs::read_dir(&paths.warm)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("jsonl"))
            .collect();
        warm_files.sort();

        let file_results: Vec<Result<AggregateCounters, ReduceError>> =
            warm_files.par_iter().map(|path| process_warm_file(path)).collect();

        let mut cycle_counters = AggregateCounters::new();
        for result in file_results {
            cycle_counters.merge(result?);
        }
        self.counters.merge(cycle_counters);

        let artifact = ExportArtifact::from_counters(&self.counters, current_patch, generated_at);
        let content_hash = artifact.content_hash()?;
        let floor = current_patch.retention_floor(retention_delta);
        let manifest = Manifest { version: current_patch.as_tag(), min_patch: floor.as_tag(), data_url: data_url.to_string(), updated_at: generated_at };

        let mut archived_files = Vec::with_capacity(warm_files.len());
        for warm_path in &warm_files {
            archived_files.push(archive_warm_file(warm_path, &paths.cold)?);
        }

        self.counters.prune_patches_older_than(floor);

        info!(
            files = warm_files.len(),
            champion_stats = artifact.champion_stats.len(),
            content_hash,
            "reduce cycle complete"
        );

        Ok(ReduceOutcome { artifact, manifest, content_hash, archived_files, warm_files_processed: warm_files.len() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvester_domain_models::ParticipantRow;
    use harvester_infra_rotating_log::RotatingLogConfig;
    use tempfile::tempdir;
    use tokio::sync::mpsc;

    fn sample_row(match_id: &str, champion_id: u32, win: bool) -> ParticipantRow {
        ParticipantRow {
            match_id: match_id.into(),
            game_version: "14.3.1.2".into(),
            game_duration: 1800,
            game_creation: 1,
            puuid: format!("p{champion_id}"),
            game_name: None,
            tag_line: None,
            champion_id,
            champion_name: "Champ".into(),
            team_position: "TOP".into(),
            win,
            item0: 0,
            item1: 0,
            item2: 0,
            item3: 0,
            item4: 0,
            item5: 0,
            build_order: None,
        }
    }

    #[test]
    fn run_cycle_aggregates_archives_and_prunes() {
        let dir = tempdir().unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut log = RotatingLog::new(dir.path(), RotatingLogConfig { max_matches_per_file: 10_000, ..Default::default() }, tx).unwrap();

        log.write_row(&sample_row("m1", 1, true)).unwrap();
        log.write_row(&sample_row("m1", 2, false)).unwrap();
        log.match_complete().unwrap();

        let mut reducer = Reducer::new();
        let patch = PatchTag { major: 14, minor: 3 };
        let outcome = reducer
            .run_cycle(&mut log, patch, 3, "local", DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().with_timezone(&Utc))
            .unwrap();

        assert_eq!(outcome.warm_files_processed, 1);
        assert_eq!(outcome.artifact.champion_stats.len(), 2);
        assert!(outcome.archived_files[0].exists());
        assert!(fs::read_dir(dir.path().join("warm")).unwrap().next().is_none());
    }

    #[test]
    fn second_cycle_merges_onto_persistent_counters() {
        let dir = tempdir().unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut log = RotatingLog::new(dir.path(), RotatingLogConfig { max_matches_per_file: 10_000, ..Default::default() }, tx).unwrap();
        let mut reducer = Reducer::new();
        let patch = PatchTag { major: 14, minor: 3 };
        let timestamp = Utc::now();

        log.write_row(&sample_row("m1", 1, true)).unwrap();
        log.match_complete().unwrap();
        reducer.run_cycle(&mut log, patch, 3, "local", timestamp).unwrap();

        log.write_row(&sample_row("m2", 1, true)).unwrap();
        log.match_complete().unwrap();
        let outcome = reducer.run_cycle(&mut log, patch, 3, "local", timestamp).unwrap();

        let cell = outcome.artifact.champion_stats.iter().find(|row| row.champion_id == 1).unwrap();
        assert_eq!(cell.matches, 2);
    }
}
