// [libs/infra/async-pusher/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PushError {
    /// The background worker task has already exited (channel closed).
    #[error("async pusher worker is no longer running")]
    WorkerStopped,
}
