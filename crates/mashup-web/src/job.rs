//! One web job: pipeline, packaging, cleanup, notification

use mashup_core::error::{MashupError, Stage, ValidationError};
use mashup_core::notifier::Delivery;
use mashup_core::packager;
use mashup_core::pipeline::{MashupReport, MashupRequest, Pipeline, PipelineStage};
use mashup_core::validate::{validate_web, WebRequest, WebSubmission};
use mashup_core::workspace::Workspace;
use std::fmt;
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::AppState;

/// Where a job is, or where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Received,
    Validated,
    Rejected,
    Fetched,
    FetchFailed,
    Transcoded,
    TranscodeFailed,
    Trimmed,
    TrimFailed,
    Merged,
    MergeFailed,
    Packaged,
    PackageFailed,
    Notified,
    Done,
}

impl JobState {
    /// State reached once the pipeline reports `stage`.
    pub fn advance(self, stage: &PipelineStage) -> Self {
        match stage {
            PipelineStage::Fetched { .. } => JobState::Fetched,
            PipelineStage::Transcoded { .. } => JobState::Transcoded,
            PipelineStage::Trimmed { .. } => JobState::Trimmed,
            PipelineStage::Complete { .. } => JobState::Merged,
            _ => self,
        }
    }

    /// Terminal state for a run that died in `stage`.
    pub fn failed_at(stage: Option<Stage>) -> Self {
        match stage {
            Some(Stage::Fetch) | None => JobState::FetchFailed,
            Some(Stage::Transcode) => JobState::TranscodeFailed,
            Some(Stage::Trim) => JobState::TrimFailed,
            Some(Stage::Merge) => JobState::MergeFailed,
            Some(Stage::Package) => JobState::PackageFailed,
        }
    }

}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Received => "received",
            JobState::Validated => "validated",
            JobState::Rejected => "rejected",
            JobState::Fetched => "fetched",
            JobState::FetchFailed => "fetch_failed",
            JobState::Transcoded => "transcoded",
            JobState::TranscodeFailed => "transcode_failed",
            JobState::Trimmed => "trimmed",
            JobState::TrimFailed => "trim_failed",
            JobState::Merged => "merged",
            JobState::MergeFailed => "merge_failed",
            JobState::Packaged => "packaged",
            JobState::PackageFailed => "package_failed",
            JobState::Notified => "notified",
            JobState::Done => "done",
        };
        f.write_str(name)
    }
}

/// Artifacts of a finished job.
#[derive(Debug)]
pub struct JobArtifacts {
    pub mp3_filename: String,
    pub zip_filename: String,
    pub report: MashupReport,
    pub delivery: Delivery,
}

impl JobArtifacts {
    pub fn audio_url(&self) -> String {
        format!("/output/{}", self.mp3_filename)
    }

    pub fn zip_url(&self) -> String {
        format!("/output/{}", self.zip_filename)
    }
}

#[derive(Debug)]
pub struct JobOutcome {
    pub job_id: String,
    pub state: JobState,
    pub result: Result<JobArtifacts, String>,
}

/// Short random hex id used to keep concurrent jobs apart on disk.
pub fn new_job_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

/// Move a received submission to `validated`, or stop it at `rejected`.
pub fn admit(job_id: &str, form: &WebSubmission) -> Result<WebRequest, ValidationError> {
    info!(job = job_id, "Job {}", JobState::Received);
    validate_web(form).map_err(|e| {
        info!(job = job_id, "Job {}: {}", JobState::Rejected, e);
        e
    })
}

/// Run a validated request to a terminal state. Scratch directories are
/// removed on every path out.
pub async fn run_job(state: &AppState, request: &WebRequest, job_id: &str) -> JobOutcome {
    let output_dir = state.config.output_dir();
    let workspace = Workspace::for_job(&output_dir, job_id);
    let mp3_filename = format!("{}-mashup.mp3", job_id);
    let zip_filename = format!("{}-mashup.zip", job_id);
    let mp3_path = output_dir.join(&mp3_filename);
    let zip_path = output_dir.join(&zip_filename);

    info!(job = job_id, "Job {} for '{}'", JobState::Validated, request.params.artist);

    let (tx, mut rx) = mpsc::channel(32);
    let job = job_id.to_string();
    let tracker = tokio::spawn(async move {
        let mut state = JobState::Validated;
        while let Some(stage) = rx.recv().await {
            let next = state.advance(&stage);
            if next != state {
                info!(job = %job, "Job {}", next);
                state = next;
            }
        }
        state
    });

    let pipeline_request = MashupRequest {
        params: request.params.clone(),
        output: mp3_path.clone(),
    };
    let pipeline = Pipeline::new(
        state.source.as_ref(),
        state.codec.as_ref(),
        state.config.fetch.search_suffix.clone(),
        tx,
    );
    let produced = match pipeline.run(&pipeline_request, &workspace).await {
        Ok(report) => package(report, &mp3_path, &zip_path).await,
        Err(e) => Err(e),
    };
    drop(pipeline);

    workspace.remove().await;
    let reached = tracker.await.unwrap_or(JobState::Validated);

    let report = match produced {
        Ok(report) => report,
        Err(e) => {
            let failed = JobState::failed_at(e.stage());
            warn!(job = job_id, "Job {} after {}: {}", failed, reached, e);
            return JobOutcome {
                job_id: job_id.to_string(),
                state: failed,
                result: Err(e.to_string()),
            };
        }
    };
    info!(job = job_id, "Job {}", JobState::Packaged);

    let delivery = state
        .notifier
        .send(&request.email, &zip_path, &request.params.artist)
        .await;
    info!(job = job_id, "Job {} (email {})", JobState::Notified, delivery);
    info!(job = job_id, "Job {}", JobState::Done);

    JobOutcome {
        job_id: job_id.to_string(),
        state: JobState::Done,
        result: Ok(JobArtifacts {
            mp3_filename,
            zip_filename,
            report,
            delivery,
        }),
    }
}

async fn package(
    report: MashupReport,
    mp3_path: &Path,
    zip_path: &Path,
) -> Result<MashupReport, MashupError> {
    packager::package(mp3_path, zip_path).await?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_job_id_is_short_hex() {
        let id = new_job_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, new_job_id());
    }

    #[test]
    fn test_advance_follows_pipeline() {
        let state = JobState::Validated
            .advance(&PipelineStage::Fetching {
                query: "ytsearch2:x".into(),
            })
            .advance(&PipelineStage::Fetched { files: 2 })
            .advance(&PipelineStage::Transcoded { kept: 2, skipped: 0 })
            .advance(&PipelineStage::Trimmed { kept: 2, skipped: 0 })
            .advance(&PipelineStage::Complete {
                output: PathBuf::from("o.mp3"),
                audio: Duration::from_secs(40),
                elapsed: Duration::from_secs(1),
            });
        assert_eq!(state, JobState::Merged);
    }

    #[test]
    fn test_failed_states_follow_stage() {
        assert_eq!(JobState::failed_at(Some(Stage::Fetch)), JobState::FetchFailed);
        assert_eq!(JobState::failed_at(Some(Stage::Trim)).to_string(), "trim_failed");
        assert_eq!(JobState::failed_at(Some(Stage::Merge)).to_string(), "merge_failed");
        assert_eq!(
            JobState::failed_at(Some(Stage::Package)).to_string(),
            "package_failed"
        );
        assert_eq!(JobState::failed_at(None), JobState::FetchFailed);
    }

    #[test]
    fn test_admit() {
        let mut form = WebSubmission {
            singer_name: "Test Artist".into(),
            email: "fan@example.com".into(),
            num_videos: "2".into(),
            duration: "20".into(),
        };
        assert_eq!(admit("a1b2c3d4", &form).unwrap().params.item_count, 2);

        form.num_videos = "1".into();
        let err = admit("a1b2c3d4", &form).unwrap_err();
        assert_eq!(err.reasons, ["Number of videos must be at least 2."]);
        assert_eq!(JobState::Rejected.to_string(), "rejected");
    }
}
