//! Audio decoder using FFmpeg

use crate::error::DecodeError;
use crate::segment::{PcmFormat, Segment};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug)]
pub struct Decoder {
    ffmpeg_path: PathBuf,
    format: PcmFormat,
}

impl Decoder {
    pub fn new(ffmpeg_path: PathBuf, format: PcmFormat) -> Self {
        Self { ffmpeg_path, format }
    }

    /// Decode an MP3 file to interleaved s16 PCM in memory. `limit` stops
    /// decoding early; the caller still owns exact trimming.
    pub async fn decode_mp3(
        &self,
        input: &Path,
        limit: Option<Duration>,
    ) -> Result<Segment, DecodeError> {
        debug!("Decoding {} to PCM ({})", input.display(), self.format);

        let output = Command::new(&self.ffmpeg_path)
            .args(pcm_args(input, limit, self.format))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => DecodeError::FfmpegNotFound,
                _ => DecodeError::Io(e),
            })?;

        if !output.status.success() {
            return Err(DecodeError::FfmpegFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let segment = Segment::from_le_bytes(self.format, &output.stdout);
        if segment.is_empty() {
            return Err(DecodeError::EmptyStream);
        }

        debug!("Decoded {} ms from {}", segment.duration_ms(), input.display());
        Ok(segment)
    }
}

fn pcm_args(input: &Path, limit: Option<Duration>, format: PcmFormat) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-hide_banner".into(),
        "-loglevel".into(),
        "error".into(),
        "-f".into(),
        "mp3".into(),
        "-i".into(),
        input.as_os_str().to_owned(),
    ];

    if let Some(limit) = limit {
        args.extend(["-t".into(), format!("{:.3}", limit.as_secs_f64()).into()]);
    }

    args.extend([
        "-vn".into(),
        "-f".into(),
        "s16le".into(),
        "-acodec".into(),
        "pcm_s16le".into(),
        "-ar".into(),
        format.sample_rate.to_string().into(),
        "-ac".into(),
        format.channels.to_string().into(),
        "-".into(),
    ]);
    args
}
