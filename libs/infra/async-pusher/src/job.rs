// [libs/infra/async-pusher/src/job.rs]
use harvester_domain_models::{ExportArtifact, Manifest, PatchTag};

/// One reduce cycle's output, queued for the background worker to push.
#[derive(Debug, Clone)]
pub struct PushJob {
    pub artifact: ExportArtifact,
    pub manifest: Manifest,
    pub retention_floor: PatchTag,
}
