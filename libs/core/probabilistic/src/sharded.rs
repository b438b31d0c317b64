// [libs/core/probabilistic/src/sharded.rs]
//! APARATO: SHARDED PROBABILISTIC ORCHESTRATOR
//! CLASIFICACIÓN: CORE INFRASTRUCTURE (ESTRATO L1)
//! RESPONSABILIDAD: COORDINACIÓN DE FILTROS DE BLOOM CONCURRENTE
//!
//! Generalized from the fixed 160-bit address-keyed filter to any hashable
//! id: the visited-match set keys on match id strings, the visited-player
//! set on player id strings. Routing is SipHash-1-3 over the id's `Hash`
//! impl, so adding a new id type to shard over needs no change here.

use crate::filter_wrapper::MembershipFilter;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use tracing::{error, warn};

/// A partitioned bloom filter over id type `T`. Each shard is guarded by
/// its own `RwLock` so multi-worker spider configurations don't serialize
/// on a single global lock.
pub struct ShardedFilter<T: Hash> {
    shards: Vec<RwLock<MembershipFilter<T>>>,
    shard_count: usize,
    total_indexed_count: AtomicUsize,
}

impl<T> ShardedFilter<T>
where
    T: Hash,
{
    #[must_use]
    pub fn new(shard_count: usize, expected_items: usize, false_positive_rate: f64) -> Self {
        let shard_count = shard_count.max(1);
        let items_per_shard = (expected_items / shard_count).max(100);

        let shards = (0..shard_count)
            .map(|_| RwLock::new(MembershipFilter::new(items_per_shard, false_positive_rate)))
            .collect();

        Self { shards, shard_count, total_indexed_count: AtomicUsize::new(0) }
    }

    #[inline(always)]
    fn route(&self, item: &T) -> usize {
        let mut hasher = siphasher::sip::SipHasher13::new_with_keys(0, 0);
        item.hash(&mut hasher);
        (hasher.finish() as usize) % self.shard_count
    }

    #[inline(always)]
    pub fn insert(&self, item: &T) {
        let shard_index = self.route(item);
        if let Some(lock) = self.shards.get(shard_index) {
            match lock.write() {
                Ok(mut filter) => {
                    filter.insert(item);
                    self.total_indexed_count.fetch_add(1, Ordering::Relaxed);
                }
                Err(poisoned) => error!("shard {shard_index} write lock poisoned: {poisoned}"),
            }
        }
    }

    #[must_use]
    #[inline(always)]
    pub fn contains(&self, item: &T) -> bool {
        let shard_index = self.route(item);
        match self.shards.get(shard_index) {
            Some(lock) => match lock.read() {
                Ok(filter) => filter.contains(item),
                Err(_) => {
                    warn!("shard {shard_index} read lock poisoned, defaulting to not-seen");
                    false
                }
            },
            None => false,
        }
    }

    /// Replaces every shard with a fresh empty filter of the same sizing,
    /// matching the spec's "reset replaces the filter with a fresh empty
    /// instance." Called every K reduce cycles by the supervisor via the
    /// spider's `reset()`.
    pub fn reset(&self, expected_items: usize, false_positive_rate: f64) {
        let items_per_shard = (expected_items / self.shard_count).max(100);
        for shard in &self.shards {
            match shard.write() {
                Ok(mut filter) => *filter = MembershipFilter::new(items_per_shard, false_positive_rate),
                Err(poisoned) => error!("shard reset found poisoned lock: {poisoned}"),
            }
        }
        self.total_indexed_count.store(0, Ordering::Relaxed);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.total_indexed_count.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_contains_is_always_true() {
        let filter: ShardedFilter<String> = ShardedFilter::new(4, 1000, 0.001);
        for id in ["NA1_1", "NA1_2", "NA1_3"] {
            filter.insert(&id.to_string());
            assert!(filter.contains(&id.to_string()));
        }
    }

    #[test]
    fn reset_clears_membership() {
        let filter: ShardedFilter<String> = ShardedFilter::new(4, 1000, 0.001);
        filter.insert(&"NA1_1".to_string());
        assert!(filter.contains(&"NA1_1".to_string()));

        filter.reset(1000, 0.001);
        assert_eq!(filter.len(), 0);
    }

    proptest::proptest! {
        #[test]
        fn no_false_negatives(ids in proptest::collection::vec("[a-zA-Z0-9_]{1,16}", 1..200)) {
            let filter: ShardedFilter<String> = ShardedFilter::new(8, ids.len().max(1), 0.001);
            for id in &ids {
                filter.insert(id);
            }
            for id in &ids {
                prop_assert!(filter.contains(id));
            }
        }
    }
}
