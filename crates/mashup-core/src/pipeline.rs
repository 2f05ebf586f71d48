//! Pipeline orchestration: fetch, transcode, trim, merge

use crate::codec::AudioCodec;
use crate::error::MashupError;
use crate::fetcher::{self, MediaSource, SearchQuery};
use crate::merger::{self, MergeSummary};
use crate::stage::ItemFailure;
use crate::transcoder;
use crate::trimmer;
use crate::validate::MashupParams;
use crate::workspace::Workspace;

use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// One pipeline run: what to fetch and where the mashup goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MashupRequest {
    pub params: MashupParams,
    pub output: PathBuf,
}

impl MashupRequest {
    pub fn clip_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.params.duration_secs))
    }
}

/// Pipeline progress stages
#[derive(Debug, Clone)]
pub enum PipelineStage {
    Fetching { query: String },
    Fetched { files: usize },
    Transcoding { files: usize },
    Transcoded { kept: usize, skipped: usize },
    Trimming { files: usize, clip_secs: u32 },
    Trimmed { kept: usize, skipped: usize },
    Merging { segments: usize },
    Complete { output: PathBuf, audio: Duration, elapsed: Duration },
    Failed { stage: String, error: String },
}

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct MashupReport {
    pub fetched: usize,
    pub converted: usize,
    pub skipped: Vec<ItemFailure>,
    pub merge: MergeSummary,
    pub elapsed: Duration,
}

/// Main processing pipeline
pub struct Pipeline<'a> {
    source: &'a dyn MediaSource,
    codec: &'a dyn AudioCodec,
    search_suffix: String,
    progress_tx: mpsc::Sender<PipelineStage>,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        source: &'a dyn MediaSource,
        codec: &'a dyn AudioCodec,
        search_suffix: impl Into<String>,
        progress_tx: mpsc::Sender<PipelineStage>,
    ) -> Self {
        Self {
            source,
            codec,
            search_suffix: search_suffix.into(),
            progress_tx,
        }
    }

    pub async fn run(
        &self,
        request: &MashupRequest,
        workspace: &Workspace,
    ) -> Result<MashupReport, MashupError> {
        let result = self.run_stages(request, workspace).await;

        if let Err(ref e) = result {
            let stage = e
                .stage()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "setup".to_string());
            self.emit(PipelineStage::Failed {
                stage,
                error: e.to_string(),
            })
            .await;
        }

        result
    }

    async fn run_stages(
        &self,
        request: &MashupRequest,
        workspace: &Workspace,
    ) -> Result<MashupReport, MashupError> {
        let start_time = Instant::now();
        let params = &request.params;

        info!(
            "Starting mashup: {} x {}s of '{}' -> {}",
            params.item_count,
            params.duration_secs,
            params.artist,
            request.output.display()
        );

        workspace.reset().await?;

        // 1. Fetch
        let query = SearchQuery::new(&params.artist, &self.search_suffix, params.item_count);
        self.emit(PipelineStage::Fetching {
            query: query.to_ytsearch(),
        })
        .await;

        let fetched = fetcher::fetch(self.source, &query, &workspace.download_dir).await?;
        self.emit(PipelineStage::Fetched {
            files: fetched.len(),
        })
        .await;

        // 2. Transcode
        self.emit(PipelineStage::Transcoding {
            files: fetched.len(),
        })
        .await;

        let converted = transcoder::transcode_all(self.codec, &fetched, &workspace.audio_dir).await?;
        self.emit(PipelineStage::Transcoded {
            kept: converted.kept.len(),
            skipped: converted.skipped.len(),
        })
        .await;

        // 3. Trim
        self.emit(PipelineStage::Trimming {
            files: converted.kept.len(),
            clip_secs: params.duration_secs,
        })
        .await;

        let trimmed = trimmer::trim_all(self.codec, &converted.kept, request.clip_duration()).await?;
        self.emit(PipelineStage::Trimmed {
            kept: trimmed.kept.len(),
            skipped: trimmed.skipped.len(),
        })
        .await;

        // 4. Merge
        self.emit(PipelineStage::Merging {
            segments: trimmed.kept.len(),
        })
        .await;

        let merge = merger::merge(self.codec, &trimmed.kept, &request.output).await?;

        let elapsed = start_time.elapsed();
        info!(
            "Pipeline complete: {} ({:.1}s of audio, {:.1}s elapsed)",
            merge.output.display(),
            merge.duration.as_secs_f32(),
            elapsed.as_secs_f32()
        );

        self.emit(PipelineStage::Complete {
            output: merge.output.clone(),
            audio: merge.duration,
            elapsed,
        })
        .await;

        let mut skipped = converted.skipped;
        skipped.extend(trimmed.skipped);

        Ok(MashupReport {
            fetched: fetched.len(),
            converted: converted.kept.len(),
            skipped,
            merge,
            elapsed,
        })
    }

    async fn emit(&self, stage: PipelineStage) {
        if self.progress_tx.send(stage).await.is_err() {
            debug!("Progress receiver dropped");
        }
    }
}
