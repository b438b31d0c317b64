// [libs/domain/models/src/export.rs]
use crate::counters::AggregateCounters;
use crate::patch::PatchTag;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionStatRow {
    pub patch: String,
    pub champion_id: u32,
    pub position: String,
    pub wins: u64,
    pub matches: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionItemRow {
    pub patch: String,
    pub champion_id: u32,
    pub position: String,
    pub item_id: u32,
    pub wins: u64,
    pub matches: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionItemSlotRow {
    pub patch: String,
    pub champion_id: u32,
    pub position: String,
    pub item_id: u32,
    pub slot: u8,
    pub wins: u64,
    pub matches: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionMatchupRow {
    pub patch: String,
    pub champion_id: u32,
    pub position: String,
    pub enemy_champion_id: u32,
    pub wins: u64,
    pub matches: u64,
}

/// Versioned snapshot emitted once per reduce cycle. Consumed by the async
/// pusher and, optionally, persisted to a local export directory for
/// out-of-band inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportArtifact {
    pub patch: String,
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
    #[serde(rename = "championStats")]
    pub champion_stats: Vec<ChampionStatRow>,
    #[serde(rename = "championItems")]
    pub champion_items: Vec<ChampionItemRow>,
    #[serde(rename = "championItemSlots")]
    pub champion_item_slots: Vec<ChampionItemSlotRow>,
    #[serde(rename = "championMatchups")]
    pub champion_matchups: Vec<ChampionMatchupRow>,
}

impl ExportArtifact {
    /// Flattens the in-memory keyed counters into the four exported arrays
    /// for the given current patch, stamped at `generated_at`.
    pub fn from_counters(counters: &AggregateCounters, current_patch: PatchTag, generated_at: DateTime<Utc>) -> Self {
        let champion_stats = counters
            .champion_position
            .iter()
            .map(|(key, cell)| ChampionStatRow {
                patch: key.patch.as_tag(),
                champion_id: key.champion_id,
                position: key.position.as_str().to_string(),
                wins: cell.wins,
                matches: cell.matches,
            })
            .collect();

        let champion_items = counters
            .items
            .iter()
            .map(|(key, cell)| ChampionItemRow {
                patch: key.patch.as_tag(),
                champion_id: key.champion_id,
                position: key.position.as_str().to_string(),
                item_id: key.item_id,
                wins: cell.wins,
                matches: cell.matches,
            })
            .collect();

        let champion_item_slots = counters
            .item_slots
            .iter()
            .map(|(key, cell)| ChampionItemSlotRow {
                patch: key.patch.as_tag(),
                champion_id: key.champion_id,
                position: key.position.as_str().to_string(),
                item_id: key.item_id,
                slot: key.slot,
                wins: cell.wins,
                matches: cell.matches,
            })
            .collect();

        let champion_matchups = counters
            .matchups
            .iter()
            .map(|(key, cell)| ChampionMatchupRow {
                patch: key.patch.as_tag(),
                champion_id: key.champion_id,
                position: key.position.as_str().to_string(),
                enemy_champion_id: key.enemy_champion_id,
                wins: cell.wins,
                matches: cell.matches,
            })
            .collect();

        Self {
            patch: current_patch.as_tag(),
            generated_at,
            champion_stats,
            champion_items,
            champion_item_slots,
            champion_matchups,
        }
    }

    /// SHA-256 over the canonical JSON encoding, hex-encoded. Used as the
    /// artifact's integrity token; any reordering of the four arrays is
    /// irrelevant since each row carries its own key.
    pub fn content_hash(&self) -> Result<String, serde_json::Error> {
        let canonical = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Small companion record describing the export: current patch, minimum
/// kept patch, and where the blob was delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub min_patch: String,
    pub data_url: String,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::{CounterCell, PositionKey};
    use crate::position::Position;

    #[test]
    fn content_hash_is_stable_for_equal_artifacts() {
        let counters = AggregateCounters::new();
        let patch = PatchTag { major: 14, minor: 3 };
        let timestamp = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        let a = ExportArtifact::from_counters(&counters, patch, timestamp);
        let b = ExportArtifact::from_counters(&counters, patch, timestamp);
        assert_eq!(a.content_hash().unwrap(), b.content_hash().unwrap());
    }

    #[test]
    fn from_counters_flattens_every_cell() {
        let mut counters = AggregateCounters::new();
        let patch = PatchTag { major: 14, minor: 3 };
        let key = PositionKey { patch, champion_id: 1, position: Position::Top };
        counters.champion_position.insert(key, CounterCell { wins: 5, matches: 9 });

        let artifact = ExportArtifact::from_counters(&counters, patch, Utc::now());
        assert_eq!(artifact.champion_stats.len(), 1);
        assert_eq!(artifact.champion_stats[0].matches, 9);
    }
}
