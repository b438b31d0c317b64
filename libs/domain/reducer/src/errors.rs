// [libs/domain/reducer/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReduceError {
    #[error("rotating log flush_and_rotate failed: {0}")]
    Log(#[from] harvester_infra_rotating_log::LogError),
    #[error("warm/cold tier I/O failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("export artifact failed to encode: {0}")]
    Encode(#[from] serde_json::Error),
}
