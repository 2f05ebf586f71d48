//! MP3 encoder using FFmpeg

use crate::error::EncodeError;
use crate::segment::Segment;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug)]
pub struct Encoder {
    ffmpeg_path: PathBuf,
    mp3_quality: u8,
}

impl Encoder {
    pub fn new(ffmpeg_path: PathBuf, mp3_quality: u8) -> Self {
        Self {
            ffmpeg_path,
            mp3_quality,
        }
    }

    /// Re-encode any container ffmpeg can probe into an MP3 file
    pub async fn transcode(&self, input: &Path, output: &Path) -> Result<(), EncodeError> {
        debug!("Transcoding {} -> {}", input.display(), output.display());

        let mut args: Vec<OsString> = vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-i".into(),
            input.as_os_str().to_owned(),
            "-vn".into(),
        ];
        args.extend(self.codec_args());
        args.extend(["-y".into(), output.as_os_str().to_owned()]);

        let output = Command::new(&self.ffmpeg_path)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(spawn_error)?;

        check(output)
    }

    /// Encode an in-memory segment to MP3 by piping raw PCM into ffmpeg
    pub async fn encode_segment(&self, segment: &Segment, output: &Path) -> Result<(), EncodeError> {
        let format = segment.format();
        debug!(
            "Encoding {} ms of PCM ({}) to {}",
            segment.duration_ms(),
            format,
            output.display()
        );

        let mut args: Vec<OsString> = vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-f".into(),
            "s16le".into(),
            "-ar".into(),
            format.sample_rate.to_string().into(),
            "-ac".into(),
            format.channels.to_string().into(),
            "-i".into(),
            "-".into(),
        ];
        args.extend(self.codec_args());
        args.extend(["-y".into(), output.as_os_str().to_owned()]);

        let mut child = Command::new(&self.ffmpeg_path)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        // Feed stdin from its own task so a chatty stderr cannot deadlock us
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| EncodeError::Io(std::io::Error::other("ffmpeg stdin unavailable")))?;
        let pcm = segment.to_le_bytes();
        let writer = tokio::spawn(async move {
            stdin.write_all(&pcm).await?;
            stdin.shutdown().await
        });

        let output = child.wait_with_output().await?;
        let written = writer
            .await
            .map_err(|e| EncodeError::Io(std::io::Error::other(e)))?;

        check(output)?;
        written?;
        Ok(())
    }

    fn codec_args(&self) -> [OsString; 4] {
        [
            "-c:a".into(),
            "libmp3lame".into(),
            "-q:a".into(),
            self.mp3_quality.to_string().into(),
        ]
    }
}

fn spawn_error(e: std::io::Error) -> EncodeError {
    match e.kind() {
        ErrorKind::NotFound => EncodeError::FfmpegNotFound,
        _ => EncodeError::Io(e),
    }
}

fn check(output: Output) -> Result<(), EncodeError> {
    if output.status.success() {
        Ok(())
    } else {
        Err(EncodeError::FfmpegFailed {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
