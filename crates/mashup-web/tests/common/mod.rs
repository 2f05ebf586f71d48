//! Fake yt-dlp and ffmpeg for driving the router without the network.

#![allow(dead_code)]

use async_trait::async_trait;
use mashup_core::codec::AudioCodec;
use mashup_core::error::{DecodeError, EncodeError, FetchError};
use mashup_core::fetcher::{MediaSource, SearchQuery};
use mashup_core::segment::{PcmFormat, Segment};
use mashup_core::Config;
use mashup_web::{build_router, AppState};
use axum::Router;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const FORMAT: PcmFormat = PcmFormat {
    sample_rate: 1000,
    channels: 1,
};

/// Writes `count` files per search, each holding `secs=N` or `corrupt`.
pub struct FakeSource {
    pub contents: String,
    pub calls: AtomicUsize,
}

impl FakeSource {
    pub fn new(contents: &str) -> Self {
        Self {
            contents: contents.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaSource for FakeSource {
    async fn search_and_download(&self, query: &SearchQuery, dest: &Path) -> Result<(), FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        for i in 0..query.count {
            std::fs::write(dest.join(format!("{:02} clip.m4a", i)), &self.contents)?;
        }
        Ok(())
    }
}

/// Decodes `secs=N` files; `fail_export` makes every MP3 export fail.
#[derive(Default)]
pub struct FakeCodec {
    pub fail_export: bool,
}

#[async_trait]
impl AudioCodec for FakeCodec {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), EncodeError> {
        let contents = std::fs::read_to_string(input)?;
        if contents.starts_with("corrupt") {
            return Err(EncodeError::FfmpegFailed {
                code: Some(1),
                stderr: "Invalid data found when processing input".to_string(),
            });
        }
        std::fs::write(output, contents)?;
        Ok(())
    }

    async fn load_mp3(&self, input: &Path, _limit: Option<Duration>) -> Result<Segment, DecodeError> {
        let contents = std::fs::read_to_string(input)?;
        let secs: u64 = contents
            .trim()
            .strip_prefix("secs=")
            .and_then(|s| s.parse().ok())
            .ok_or(DecodeError::EmptyStream)?;
        Ok(Segment::new(FORMAT, vec![0; (secs * 1000) as usize]))
    }

    async fn export_mp3(&self, segment: &Segment, output: &Path) -> Result<(), EncodeError> {
        if self.fail_export {
            return Err(EncodeError::FfmpegFailed {
                code: Some(1),
                stderr: "Conversion failed!".to_string(),
            });
        }
        std::fs::write(output, format!("ID3 fake mp3 ms={}", segment.duration_ms()))?;
        Ok(())
    }
}

/// Router writing into `output_dir`, with SMTP left unconfigured.
pub fn app(output_dir: &Path, source: Arc<FakeSource>) -> Router {
    app_with_codec(output_dir, source, FakeCodec::default())
}

pub fn app_with_codec(output_dir: &Path, source: Arc<FakeSource>, codec: FakeCodec) -> Router {
    let mut config = Config::default();
    config.workspace.output_dir = output_dir.to_path_buf();
    config.smtp.sender_email = None;
    config.smtp.sender_password = None;
    build_router(AppState::new(config, source, Arc::new(codec)))
}
