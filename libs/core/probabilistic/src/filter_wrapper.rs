// [libs/core/probabilistic/src/filter_wrapper.rs]
//! APARATO: PROBABILISTIC FILTER WRAPPER
//! CLASIFICACIÓN: CORE INFRASTRUCTURE (ESTRATO L1)
//! RESPONSABILIDAD: ABSTRACCIÓN DETERMINISTA SOBRE UN FILTRO DE BLOOM GENÉRICO
//!
//! Generic over the id type so the same shard mechanics serve both the
//! visited-match set (match id strings) and the visited-player set (player
//! id strings).

use bloomfilter::Bloom;
use std::hash::Hash;
use tracing::{debug, instrument};

/// A single bloom filter over id type `T`.
pub struct MembershipFilter<T: Hash> {
    bloom: Bloom<T>,
    total_indexed_count: usize,
}

impl<T> MembershipFilter<T>
where
    T: Hash,
{
    #[must_use]
    #[instrument(level = "debug", skip(expected_items, false_positive_rate))]
    pub fn new(expected_items: usize, false_positive_rate: f64) -> Self {
        let capacity = expected_items.max(1);
        let fp_rate = if false_positive_rate <= 0.0 { 0.0000001 } else { false_positive_rate };
        debug!("synthesizing bloom filter, capacity={capacity} fp_rate={fp_rate}");

        Self {
            bloom: Bloom::new_for_fp_rate(capacity, fp_rate),
            total_indexed_count: 0,
        }
    }

    #[inline(always)]
    pub fn insert(&mut self, item: &T) {
        self.bloom.set(item);
        self.total_indexed_count += 1;
    }

    #[must_use]
    #[inline(always)]
    pub fn contains(&self, item: &T) -> bool {
        self.bloom.check(item)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.total_indexed_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_indexed_count == 0
    }
}
