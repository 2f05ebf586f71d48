//! In-process stand-ins for yt-dlp and ffmpeg.
//!
//! Fetched "media" files hold a line like `secs=45`; the fake codec decodes
//! that into silence of the given length at 1 kHz mono.

#![allow(dead_code)]

use async_trait::async_trait;
use mashup_core::codec::AudioCodec;
use mashup_core::error::{DecodeError, EncodeError, FetchError};
use mashup_core::fetcher::{MediaSource, SearchQuery};
use mashup_core::segment::{PcmFormat, Segment};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

pub const FORMAT: PcmFormat = PcmFormat {
    sample_rate: 1000,
    channels: 1,
};

#[derive(Default)]
pub struct FakeSource {
    /// (file name, contents) written per search
    pub items: Vec<(String, String)>,
    pub fail: bool,
    pub queries: Mutex<Vec<SearchQuery>>,
}

impl FakeSource {
    pub fn with_durations(durations: &[u64]) -> Self {
        let items = durations
            .iter()
            .enumerate()
            .map(|(i, secs)| (format!("{:02} track.webm", i), format!("secs={}", secs)))
            .collect();
        Self {
            items,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl MediaSource for FakeSource {
    async fn search_and_download(&self, query: &SearchQuery, dest: &Path) -> Result<(), FetchError> {
        self.queries.lock().unwrap().push(query.clone());
        if self.fail {
            return Err(FetchError::YtDlpFailed {
                code: Some(1),
                stderr: "ERROR: unable to download".to_string(),
            });
        }
        std::fs::write(dest.join("._resource_fork"), "junk")?;
        for (name, contents) in self.items.iter().take(query.count as usize) {
            std::fs::write(dest.join(name), contents)?;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeCodec {
    pub exported: Mutex<Vec<(PathBuf, u64)>>,
    pub fail_export: bool,
}

fn failed(reason: &str) -> EncodeError {
    EncodeError::FfmpegFailed {
        code: Some(1),
        stderr: reason.to_string(),
    }
}

#[async_trait]
impl AudioCodec for FakeCodec {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), EncodeError> {
        let contents = std::fs::read_to_string(input)?;
        if contents.starts_with("corrupt") {
            return Err(failed("Invalid data found when processing input"));
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
            return Err(failed("Conversion failed!"));
        }
        std::fs::write(output, format!("ms={}", segment.duration_ms()))?;
        self.exported
            .lock()
            .unwrap()
            .push((output.to_path_buf(), segment.duration_ms()));
        Ok(())
    }
}
