// [libs/domain/reducer/src/process.rs]
//! APARATO: WARM FILE TWO-PASS AGGREGATION
//! RESPONSABILIDAD: DECODIFICACIÓN TOLERANTE Y CONTEO POR ARCHIVO TIBIO
//!
//! One file, one pass over the lines: position, item and item-slot counters
//! update directly; participants also bucket by match id for a second,
//! in-memory pass that derives directional matchup cells. Mirrors the
//! census pipeline's per-chunk local accumulation merged once at the end.

use crate::errors::ReduceError;
use harvester_domain_models::{AggregateCounters, ItemKey, ItemSlotKey, MatchupKey, ParticipantRow, PatchTag, Position, PositionKey};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::warn;

/// Decodes every line in `path` as a [`ParticipantRow`], tolerating
/// individual corrupt lines (logged and skipped), and folds them into a
/// fresh, file-local [`AggregateCounters`].
pub fn process_warm_file(path: &Path) -> Result<AggregateCounters, ReduceError> {
    let reader = BufReader::new(File::open(path)?);
    let mut counters = AggregateCounters::new();
    let mut match_buckets: HashMap<String, Vec<(PatchTag, Position, u32, bool)>> = HashMap::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let row: ParticipantRow = match serde_json::from_str(&line) {
            Ok(row) => row,
            Err(fault) => {
                warn!(path = %path.display(), error = %fault, "corrupt participant row skipped");
                continue;
            }
        };

        let Some(position) = row.position() else { continue };
        let Some(patch) = PatchTag::parse(&row.game_version) else { continue };

        let position_key = PositionKey { patch, champion_id: row.champion_id, position };
        counters.champion_position.entry(position_key).or_default().record(row.win);

        record_build_order(&mut counters, &row, patch, position);

        match_buckets.entry(row.match_id.clone()).or_default().push((patch, position, row.champion_id, row.win));
    }

    apply_matchups(&mut counters, match_buckets);
    Ok(counters)
}

/// Updates item and item-slot counters for the first six distinct
/// completed items in the row's build order, 1-based purchase order.
fn record_build_order(counters: &mut AggregateCounters, row: &ParticipantRow, patch: PatchTag, position: Position) {
    let Some(build_order) = &row.build_order else { return };
    let mut seen = Vec::with_capacity(6);

    for &item_id in build_order {
        if seen.contains(&item_id) {
            continue;
        }
        seen.push(item_id);
        if seen.len() > 6 {
            break;
        }
        let slot = seen.len() as u8;

        let item_key = ItemKey { patch, champion_id: row.champion_id, position, item_id };
        counters.items.entry(item_key).or_default().record(row.win);

        let slot_key = ItemSlotKey { patch, champion_id: row.champion_id, position, item_id, slot };
        counters.item_slots.entry(slot_key).or_default().record(row.win);
    }
}

/// Second pass: group each match's participants by position. Exactly two
/// entries with differing win flags yields one directional cell per side;
/// any other count, or equal win flags, is skipped as unreconcilable.
fn apply_matchups(counters: &mut AggregateCounters, match_buckets: HashMap<String, Vec<(PatchTag, Position, u32, bool)>>) {
    for participants in match_buckets.into_values() {
        let mut by_position: HashMap<Position, Vec<(PatchTag, u32, bool)>> = HashMap::new();
        for (patch, position, champion_id, win) in participants {
            by_position.entry(position).or_default().push((patch, champion_id, win));
        }

        for (position, entries) in by_position {
            if entries.len() != 2 {
                continue;
            }
            let (patch, champion_a, win_a) = entries[0];
            let (_, champion_b, win_b) = entries[1];
            if win_a == win_b {
                continue;
            }

            let key_a = MatchupKey { patch, champion_id: champion_a, position, enemy_champion_id: champion_b };
            counters.matchups.entry(key_a).or_default().record(win_a);

            let key_b = MatchupKey { patch, champion_id: champion_b, position, enemy_champion_id: champion_a };
            counters.matchups.entry(key_b).or_default().record(win_b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn row(match_id: &str, champion_id: u32, position: &str, win: bool) -> ParticipantRow {
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
            team_position: position.into(),
            win,
            item0: 0,
            item1: 0,
            item2: 0,
            item3: 0,
            item4: 0,
            item5: 0,
            build_order: Some(vec![1001, 1002, 1001, 1003, 1004, 1005, 1006, 1007]),
        }
    }

    fn write_lines(rows: &[ParticipantRow]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for row in rows {
            writeln!(file, "{}", serde_json::to_string(row).unwrap()).unwrap();
        }
        file
    }

    #[test]
    fn tolerates_one_corrupt_line_among_valid_rows() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", serde_json::to_string(&row("m1", 1, "TOP", true)).unwrap()).unwrap();
        writeln!(file, "not json").unwrap();
        writeln!(file, "{}", serde_json::to_string(&row("m1", 2, "TOP", false)).unwrap()).unwrap();

        let counters = process_warm_file(file.path()).unwrap();
        assert_eq!(counters.total_position_matches(), 2);
    }

    #[test]
    fn caps_build_order_at_six_distinct_slots() {
        let rows = vec![row("m1", 1, "TOP", true)];
        let file = write_lines(&rows);
        let counters = process_warm_file(file.path()).unwrap();
        let slots: Vec<_> = counters.item_slots.keys().filter(|key| key.champion_id == 1).collect();
        assert_eq!(slots.len(), 6);
        assert!(slots.iter().all(|key| key.slot <= 6));
    }

    #[test]
    fn matchup_symmetry_holds_for_a_resolved_pair() {
        let rows = vec![row("m1", 1, "TOP", true), row("m1", 2, "TOP", false)];
        let file = write_lines(&rows);
        let counters = process_warm_file(file.path()).unwrap();

        let forward = counters.matchups.iter().find(|(key, _)| key.champion_id == 1 && key.enemy_champion_id == 2).unwrap();
        let backward = counters.matchups.iter().find(|(key, _)| key.champion_id == 2 && key.enemy_champion_id == 1).unwrap();
        assert_eq!(forward.1.matches, backward.1.matches);
        assert_eq!(forward.1.wins + backward.1.wins, forward.1.matches);
    }

    #[test]
    fn skips_matchup_when_win_flags_agree() {
        let rows = vec![row("m1", 1, "TOP", true), row("m1", 2, "TOP", true)];
        let file = write_lines(&rows);
        let counters = process_warm_file(file.path()).unwrap();
        assert!(counters.matchups.is_empty());
    }
}
