// [libs/core/probabilistic/src/lib.rs]
//! APARATO: PROBABILISTIC STRATUM ROOT
//! CLASIFICACIÓN: CORE INFRASTRUCTURE (ESTRATO L1)
//! RESPONSABILIDAD: ORQUESTACIÓN Y EXPOSICIÓN DEL MOTOR PROBABILÍSTICO
//!
//! Sharded, SipHash-routed bloom sets over generic hashable ids. Backs the
//! visited-match and visited-player membership sets guarding the crawl
//! frontier: both sets tolerate false positives (a handful of matches
//! silently skipped) but must never produce a false negative.

pub mod filter_wrapper;
pub mod sharded;

pub use filter_wrapper::MembershipFilter;
pub use sharded::ShardedFilter;

pub mod prelude {
    pub use crate::filter_wrapper::MembershipFilter;
    pub use crate::sharded::ShardedFilter;
}
