// [libs/infra/remote-store/src/repositories/mod.rs]
pub mod aggregate;

pub use aggregate::AggregateRepository;
