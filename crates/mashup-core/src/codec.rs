//! Audio codec seam used by the transcode, trim and merge stages

use crate::config::Config;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{ConfigError, DecodeError, EncodeError};
use crate::segment::{PcmFormat, Segment};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

#[async_trait]
pub trait AudioCodec: Send + Sync {
    /// Decode any supported container and write it out as MP3
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), EncodeError>;

    /// Load an MP3 file into memory, optionally stopping after `limit`
    async fn load_mp3(&self, input: &Path, limit: Option<Duration>) -> Result<Segment, DecodeError>;

    /// Write a segment to `output` as MP3
    async fn export_mp3(&self, segment: &Segment, output: &Path) -> Result<(), EncodeError>;
}

/// FFmpeg-backed codec
#[derive(Debug)]
pub struct Ffmpeg {
    decoder: Decoder,
    encoder: Encoder,
}

impl Ffmpeg {
    pub fn new(decoder: Decoder, encoder: Encoder) -> Self {
        Self { decoder, encoder }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let ffmpeg_path = config.ffmpeg_path()?;
        let format = PcmFormat {
            sample_rate: config.audio.sample_rate,
            channels: config.audio.channels,
        };
        Ok(Self::new(
            Decoder::new(ffmpeg_path.clone(), format),
            Encoder::new(ffmpeg_path, config.audio.mp3_quality),
        ))
    }
}

#[async_trait]
impl AudioCodec for Ffmpeg {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), EncodeError> {
        self.encoder.transcode(input, output).await
    }

    async fn load_mp3(&self, input: &Path, limit: Option<Duration>) -> Result<Segment, DecodeError> {
        self.decoder.decode_mp3(input, limit).await
    }

    async fn export_mp3(&self, segment: &Segment, output: &Path) -> Result<(), EncodeError> {
        self.encoder.encode_segment(segment, output).await
    }
}
