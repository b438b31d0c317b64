// [libs/infra/rotating-log/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogError {
    #[error("rotating log I/O failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("participant row failed to encode: {0}")]
    Encode(#[from] serde_json::Error),
}
