//! Per-run scratch directories

use std::path::{Path, PathBuf};
use tracing::debug;

/// Download and audio scratch directories owned by one run or job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub download_dir: PathBuf,
    pub audio_dir: PathBuf,
}

impl Workspace {
    pub fn new(download_dir: impl Into<PathBuf>, audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            download_dir: download_dir.into(),
            audio_dir: audio_dir.into(),
        }
    }

    /// Scratch directories for a web job: `{output_dir}/{job_id}_downloads`
    /// and `{output_dir}/{job_id}_audios`.
    pub fn for_job(output_dir: &Path, job_id: &str) -> Self {
        Self::new(
            output_dir.join(format!("{}_downloads", job_id)),
            output_dir.join(format!("{}_audios", job_id)),
        )
    }

    /// Start the run with both directories present and empty. Anything a
    /// previous run left behind is deleted first.
    pub async fn reset(&self) -> std::io::Result<()> {
        for dir in [&self.download_dir, &self.audio_dir] {
            match tokio::fs::remove_dir_all(dir).await {
                Ok(()) => debug!("Cleared {}", dir.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        tokio::fs::create_dir_all(&self.download_dir).await?;
        tokio::fs::create_dir_all(&self.audio_dir).await?;
        debug!(
            "Workspace ready: {}, {}",
            self.download_dir.display(),
            self.audio_dir.display()
        );
        Ok(())
    }

    /// Recursively delete both directories. Errors are logged and dropped.
    pub async fn remove(&self) {
        for dir in [&self.download_dir, &self.audio_dir] {
            if let Err(e) = tokio::fs::remove_dir_all(dir).await {
                debug!("Could not remove {}: {}", dir.display(), e);
            }
        }
    }
}
