// [libs/domain/models/src/counters.rs]
use crate::patch::PatchTag;
use crate::position::Position;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single `{wins, matches}` cell. Merge is associative and commutative —
/// per-file/per-worker local accumulation followed by a single merge at
/// cycle end is always equivalent to one global accumulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterCell {
    pub wins: u64,
    pub matches: u64,
}

impl CounterCell {
    pub fn record(&mut self, won: bool) {
        self.matches += 1;
        if won {
            self.wins += 1;
        }
    }

    pub fn merge(&mut self, other: &Self) {
        self.wins += other.wins;
        self.matches += other.matches;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionKey {
    pub patch: PatchTag,
    pub champion_id: u32,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemKey {
    pub patch: PatchTag,
    pub champion_id: u32,
    pub position: Position,
    pub item_id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemSlotKey {
    pub patch: PatchTag,
    pub champion_id: u32,
    pub position: Position,
    pub item_id: u32,
    /// 1-based purchase order, capped at 6.
    pub slot: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchupKey {
    pub patch: PatchTag,
    pub champion_id: u32,
    pub position: Position,
    pub enemy_champion_id: u32,
}

/// The four keyed counter maps a reduce cycle produces, merged in from
/// per-file local accumulation. Never read concurrently with a write —
/// owned exclusively by the reducer for the duration of one cycle.
#[derive(Debug, Clone, Default)]
pub struct AggregateCounters {
    pub champion_position: HashMap<PositionKey, CounterCell>,
    pub items: HashMap<ItemKey, CounterCell>,
    pub item_slots: HashMap<ItemSlotKey, CounterCell>,
    pub matchups: HashMap<MatchupKey, CounterCell>,
}

impl AggregateCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds `other` into `self` cell-by-cell. Associative: the result of
    /// merging N local counter sets in any order is identical.
    pub fn merge(&mut self, other: Self) {
        for (key, cell) in other.champion_position {
            self.champion_position.entry(key).or_default().merge(&cell);
        }
        for (key, cell) in other.items {
            self.items.entry(key).or_default().merge(&cell);
        }
        for (key, cell) in other.item_slots {
            self.item_slots.entry(key).or_default().merge(&cell);
        }
        for (key, cell) in other.matchups {
            self.matchups.entry(key).or_default().merge(&cell);
        }
    }

    /// Total rows folded into `champion_position` — used by the testable
    /// invariant `sum(matches) == consumed participant rows with a position`.
    pub fn total_position_matches(&self) -> u64 {
        self.champion_position.values().map(|c| c.matches).sum()
    }

    /// Drops every cell keyed to a patch strictly older than `floor`.
    pub fn prune_patches_older_than(&mut self, floor: PatchTag) {
        self.champion_position.retain(|k, _| k.patch >= floor);
        self.items.retain(|k, _| k.patch >= floor);
        self.item_slots.retain(|k, _| k.patch >= floor);
        self.matchups.retain(|k, _| k.patch >= floor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch() -> PatchTag {
        PatchTag { major: 14, minor: 3 }
    }

    #[test]
    fn merge_is_associative_over_three_shards() {
        let mut a = AggregateCounters::new();
        let key = PositionKey { patch: patch(), champion_id: 1, position: Position::Top };
        a.champion_position.entry(key).or_default().record(true);

        let mut b = AggregateCounters::new();
        b.champion_position.entry(key).or_default().record(false);

        let mut c = AggregateCounters::new();
        c.champion_position.entry(key).or_default().record(true);

        let mut merged_left = AggregateCounters::new();
        merged_left.merge(a.clone());
        merged_left.merge(b.clone());
        merged_left.merge(c.clone());

        let mut merged_right = AggregateCounters::new();
        let mut bc = AggregateCounters::new();
        bc.merge(b);
        bc.merge(c);
        merged_right.merge(a);
        merged_right.merge(bc);

        assert_eq!(merged_left.champion_position[&key], merged_right.champion_position[&key]);
        assert_eq!(merged_left.champion_position[&key].matches, 3);
        assert_eq!(merged_left.champion_position[&key].wins, 2);
    }

    #[test]
    fn prune_drops_only_older_patches() {
        let mut counters = AggregateCounters::new();
        let old_key = PositionKey { patch: PatchTag { major: 14, minor: 1 }, champion_id: 1, position: Position::Top };
        let new_key = PositionKey { patch: PatchTag { major: 14, minor: 4 }, champion_id: 1, position: Position::Top };
        counters.champion_position.insert(old_key, CounterCell { wins: 1, matches: 1 });
        counters.champion_position.insert(new_key, CounterCell { wins: 1, matches: 1 });

        counters.prune_patches_older_than(PatchTag { major: 14, minor: 2 });

        assert!(!counters.champion_position.contains_key(&old_key));
        assert!(counters.champion_position.contains_key(&new_key));
    }
}
