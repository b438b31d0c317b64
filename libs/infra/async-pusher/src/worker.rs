// [libs/infra/async-pusher/src/worker.rs]
//! APARATO: ASYNC PUSHER WORKER
//! RESPONSABILIDAD: DESACOPLAMIENTO DE LA LATENCIA DE REDUCCIÓN Y DE SUBIDA
//!
//! A single background task drains a bounded channel of `PushJob`s and
//! pushes each to the remote aggregate store. Grounded on the archival
//! relay's spawn-a-loop-consume-a-queue shape, simplified from a polling
//! loop to a channel consumer since the reducer already knows exactly
//! when a job is ready — there is nothing to poll for.

use crate::errors::PushError;
use crate::job::PushJob;
use harvester_infra_remote_store::AggregateRepository;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

/// Bounded channel capacity. Back-pressure is acceptable — reduce cycles
/// are minutes apart, so the channel is never expected to fill.
const CHANNEL_CAPACITY: usize = 8;

/// Queues reduced export artifacts onto a single background worker.
/// Errors from the worker are logged and never block the next reduce
/// cycle — the caller treats push as best-effort.
pub struct AsyncPusher {
    sender: Option<mpsc::Sender<PushJob>>,
    worker: Option<JoinHandle<()>>,
}

impl AsyncPusher {
    pub fn spawn(repository: Arc<AggregateRepository>) -> Self {
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let worker = tokio::spawn(Self::run(receiver, repository));
        Self { sender: Some(sender), worker: Some(worker) }
    }

    /// Enqueues a reduce cycle's export artifact for upload. Never blocks
    /// the reducer waiting on the network — a full channel is the only
    /// back-pressure point, and the reduce cadence makes that unlikely.
    #[instrument(skip(self, job))]
    pub async fn push(&self, job: PushJob) -> Result<(), PushError> {
        match &self.sender {
            Some(sender) => sender.send(job).await.map_err(|_| PushError::WorkerStopped),
            None => Err(PushError::WorkerStopped),
        }
    }

    /// Drops the sender half so the worker's `recv()` observes the channel
    /// closing, then waits for the in-flight upload to finish. Idempotent:
    /// a second call finds both fields already taken and returns at once.
    #[instrument(skip(self))]
    pub async fn wait(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.await;
        }
    }

    #[instrument(skip(receiver, repository))]
    async fn run(mut receiver: mpsc::Receiver<PushJob>, repository: Arc<AggregateRepository>) {
        info!("async pusher worker online");
        while let Some(job) = receiver.recv().await {
            match repository.push(&job.artifact, &job.manifest, job.retention_floor).await {
                Ok(()) => info!(patch = %job.artifact.patch, "export artifact pushed"),
                Err(fault) => error!(patch = %job.artifact.patch, error = %fault, "export artifact push failed, will not block next reduce"),
            }
        }
        info!("async pusher worker drained and exiting");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use harvester_domain_models::{ExportArtifact, Manifest, PatchTag};
    use harvester_infra_remote_store::RemoteStoreClient;

    fn sample_job() -> PushJob {
        PushJob {
            artifact: ExportArtifact { patch: "14.3".into(), generated_at: Utc::now(), champion_stats: vec![], champion_items: vec![], champion_item_slots: vec![], champion_matchups: vec![] },
            manifest: Manifest { version: "14.3".into(), min_patch: "14.1".into(), data_url: "local".into(), updated_at: Utc::now() },
            retention_floor: PatchTag { major: 14, minor: 1 },
        }
    }

    #[tokio::test]
    async fn push_then_wait_drains_the_queue() {
        let client = RemoteStoreClient::connect(":memory:", None).await.unwrap();
        let repository = Arc::new(AggregateRepository::new(client));
        let mut pusher = AsyncPusher::spawn(repository);

        pusher.push(sample_job()).await.unwrap();
        pusher.wait().await;
    }
}
