// [libs/infra/rotating-log/src/log.rs]
//! APARATO: TIERED ROTATING LOG
//! RESPONSABILIDAD: ESCRITURA DURABLE DE FILAS DE PARTICIPANTE Y ROTACIÓN CALIENTE->TIBIO
//!
//! Owns the hot and warm file handles exclusively. The spider is the only
//! writer; the reducer is the only reader of warm/ and the only writer
//! into cold/ (archival lives in the reducer crate, not here).

use crate::errors::LogError;
use crate::paths::StoragePaths;
use chrono::Utc;
use harvester_domain_models::ParticipantRow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument};

/// Rotation thresholds. Defaults mirror spec: 1000 matches per file or one
/// hour of wall-clock age, whichever comes first.
#[derive(Debug, Clone)]
pub struct RotatingLogConfig {
    pub max_matches_per_file: u32,
    pub max_file_age: Duration,
}

impl Default for RotatingLogConfig {
    fn default() -> Self {
        Self { max_matches_per_file: 1000, max_file_age: Duration::from_secs(3600) }
    }
}

/// Emitted once per rotation so the supervisor can maintain its warm-file
/// counter without the log holding a back-pointer to it.
#[derive(Debug, Clone)]
pub struct WarmFileEvent {
    pub path: PathBuf,
    pub matches: u32,
}

struct HotFile {
    writer: BufWriter<File>,
    path: PathBuf,
    opened_at: Instant,
    matches_in_file: u32,
}

pub struct RotatingLog {
    paths: StoragePaths,
    config: RotatingLogConfig,
    warm_notify: UnboundedSender<WarmFileEvent>,
    current: Option<HotFile>,
    sequence: u64,
}

impl RotatingLog {
    pub fn new(
        base_path: &std::path::Path,
        config: RotatingLogConfig,
        warm_notify: UnboundedSender<WarmFileEvent>,
    ) -> Result<Self, LogError> {
        let paths = StoragePaths::new(base_path);
        paths.ensure_directories()?;
        Ok(Self { paths, config, warm_notify, current: None, sequence: 0 })
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Encodes `record` as a single JSON line and appends it to the current
    /// hot file, opening one lazily if none is active. Never rotates mid-row.
    pub fn write_row(&mut self, record: &ParticipantRow) -> Result<(), LogError> {
        if self.current.is_none() {
            self.open_hot_file()?;
        }
        let hot = self.current.as_mut().expect("hot file just opened");
        serde_json::to_writer(&mut hot.writer, record)?;
        hot.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Called exactly once per fully written match. Flushes the buffer and
    /// rotates if either threshold has been crossed.
    #[instrument(skip(self))]
    pub fn match_complete(&mut self) -> Result<(), LogError> {
        let Some(hot) = self.current.as_mut() else { return Ok(()) };
        hot.matches_in_file += 1;
        hot.writer.flush()?;

        let age_exceeded = hot.opened_at.elapsed() >= self.config.max_file_age;
        let count_exceeded = hot.matches_in_file >= self.config.max_matches_per_file;
        if age_exceeded || count_exceeded {
            self.flush_and_rotate()?;
        }
        Ok(())
    }

    /// Force-flushes and closes the current hot file, atomically moving it
    /// into warm/. Used on reduce entry and on shutdown. No-op if no hot
    /// file is open.
    #[instrument(skip(self))]
    pub fn flush_and_rotate(&mut self) -> Result<(), LogError> {
        let Some(mut hot) = self.current.take() else { return Ok(()) };
        hot.writer.flush()?;
        hot.writer.get_ref().sync_all()?;
        drop(hot.writer);

        let warm_path = self.paths.warm.join(hot.path.file_name().expect("hot file has a name"));
        fs::rename(&hot.path, &warm_path)?;

        info!(path = %warm_path.display(), matches = hot.matches_in_file, "hot file rotated into warm");
        let _ = self.warm_notify.send(WarmFileEvent { path: warm_path, matches: hot.matches_in_file });
        Ok(())
    }

    /// Shutdown path: flush and close, moving a non-empty hot file into
    /// warm/ and deleting an empty one outright.
    pub fn close(&mut self) -> Result<(), LogError> {
        let Some(hot) = self.current.as_ref() else { return Ok(()) };
        if hot.matches_in_file == 0 {
            let path = hot.path.clone();
            self.current = None;
            fs::remove_file(&path)?;
            debug!(path = %path.display(), "closed empty hot file, deleted");
            Ok(())
        } else {
            self.flush_and_rotate()
        }
    }

    /// (matches written to the current file, its basename) for the
    /// supervisor's warm-file accounting.
    pub fn stats(&self) -> (u32, Option<String>) {
        match &self.current {
            Some(hot) => (hot.matches_in_file, hot.path.file_name().map(|name| name.to_string_lossy().into_owned())),
            None => (0, None),
        }
    }

    fn open_hot_file(&mut self) -> Result<(), LogError> {
        self.sequence += 1;
        let filename = format!("raw_matches_{}_{:06}.jsonl", Utc::now().format("%Y-%m-%d_%H-%M-%S"), self.sequence);
        let path = self.paths.hot.join(filename);
        let file = File::create(&path)?;
        self.current = Some(HotFile { writer: BufWriter::new(file), path, opened_at: Instant::now(), matches_in_file: 0 });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvester_domain_models::ParticipantRow;
    use tempfile::tempdir;
    use tokio::sync::mpsc;

    fn sample_row() -> ParticipantRow {
        ParticipantRow {
            match_id: "NA1_1".into(),
            game_version: "14.3.1.2".into(),
            game_duration: 1800,
            game_creation: 1,
            puuid: "p1".into(),
            game_name: None,
            tag_line: None,
            champion_id: 1,
            champion_name: "Annie".into(),
            team_position: "MIDDLE".into(),
            win: true,
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
    fn rotates_on_match_count_threshold() {
        let dir = tempdir().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut log = RotatingLog::new(dir.path(), RotatingLogConfig { max_matches_per_file: 2, ..Default::default() }, tx).unwrap();

        for _ in 0..2 {
            log.write_row(&sample_row()).unwrap();
            log.match_complete().unwrap();
        }

        assert_eq!(log.stats(), (0, None));
        let event = rx.try_recv().unwrap();
        assert_eq!(event.matches, 2);
        assert!(event.path.starts_with(dir.path().join("warm")));
    }

    #[test]
    fn close_deletes_empty_hot_file() {
        let dir = tempdir().unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut log = RotatingLog::new(dir.path(), RotatingLogConfig::default(), tx).unwrap();
        log.write_row(&sample_row()).unwrap();

        let hot_path = log.current.as_ref().unwrap().path.clone();
        log.close().unwrap();
        assert!(!hot_path.exists());
    }

    #[test]
    fn close_moves_non_empty_hot_file_into_warm() {
        let dir = tempdir().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut log = RotatingLog::new(dir.path(), RotatingLogConfig::default(), tx).unwrap();
        log.write_row(&sample_row()).unwrap();
        log.match_complete().unwrap();

        log.close().unwrap();
        let event = rx.try_recv().unwrap();
        assert_eq!(event.matches, 1);
        assert!(event.path.exists());
    }
}
