// [libs/domain/spider/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpiderError {
    #[error(transparent)]
    Upstream(#[from] harvester_infra_upstream_client::ClientError),
    #[error("rotating log write failed: {0}")]
    Log(#[from] harvester_infra_rotating_log::LogError),
}
