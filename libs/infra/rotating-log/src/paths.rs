// [libs/infra/rotating-log/src/paths.rs]
use std::path::{Path, PathBuf};

/// The three storage tiers, rooted under a single configurable base
/// directory. Shared with the Reducer, which reads `warm` and writes
/// `cold`, so the layout lives here rather than being duplicated.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub hot: PathBuf,
    pub warm: PathBuf,
    pub cold: PathBuf,
}

impl StoragePaths {
    pub fn new(base: &Path) -> Self {
        Self { hot: base.join("hot"), warm: base.join("warm"), cold: base.join("cold") }
    }

    pub fn ensure_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.hot)?;
        std::fs::create_dir_all(&self.warm)?;
        std::fs::create_dir_all(&self.cold)?;
        Ok(())
    }
}
