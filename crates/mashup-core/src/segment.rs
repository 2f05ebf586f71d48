//! In-memory PCM audio segments

use std::fmt;
use std::time::Duration;

/// Sample layout of a decoded segment (signed 16-bit interleaved).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl fmt::Display for PcmFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz/{} ch", self.sample_rate, self.channels)
    }
}

/// A decoded audio clip held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    format: PcmFormat,
    samples: Vec<i16>,
}

impl Segment {
    /// Build a segment from interleaved samples. Trailing samples that do not
    /// fill a whole frame are dropped.
    pub fn new(format: PcmFormat, mut samples: Vec<i16>) -> Self {
        let channels = usize::from(format.channels.max(1));
        samples.truncate(samples.len() - samples.len() % channels);
        Self { format, samples }
    }

    pub fn empty(format: PcmFormat) -> Self {
        Self {
            format,
            samples: Vec::new(),
        }
    }

    /// Parse raw little-endian `s16le` bytes as produced by ffmpeg.
    pub fn from_le_bytes(format: PcmFormat, bytes: &[u8]) -> Self {
        let samples = bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Self::new(format, samples)
    }

    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    pub fn format(&self) -> PcmFormat {
        self.format
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.format.channels.max(1))
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_ms(&self) -> u64 {
        if self.format.sample_rate == 0 {
            return 0;
        }
        self.frames() as u64 * 1000 / u64::from(self.format.sample_rate)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms())
    }

    /// Keep only the first `limit` of audio, measured in milliseconds from
    /// position 0. Shorter segments are returned unchanged.
    pub fn leading(mut self, limit: Duration) -> Self {
        let limit_ms = limit.as_millis() as u64;
        let max_frames = limit_ms * u64::from(self.format.sample_rate) / 1000;
        if (self.frames() as u64) > max_frames {
            let channels = usize::from(self.format.channels.max(1));
            self.samples.truncate(max_frames as usize * channels);
        }
        self
    }

    /// Append `other` sample-for-sample. Formats must match.
    pub fn append(&mut self, other: &Segment) -> Result<(), PcmFormat> {
        if other.format != self.format {
            return Err(other.format);
        }
        self.samples.extend_from_slice(&other.samples);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEREO_1K: PcmFormat = PcmFormat {
        sample_rate: 1000,
        channels: 2,
    };

    fn silence(format: PcmFormat, ms: u64) -> Segment {
        let frames = ms * u64::from(format.sample_rate) / 1000;
        Segment::new(format, vec![0; frames as usize * usize::from(format.channels)])
    }

    #[test]
    fn test_duration() {
        assert_eq!(silence(STEREO_1K, 1500).duration_ms(), 1500);
        assert_eq!(Segment::empty(STEREO_1K).duration_ms(), 0);
    }

    #[test]
    fn test_partial_frames_dropped() {
        let seg = Segment::new(STEREO_1K, vec![1, 2, 3]);
        assert_eq!(seg.samples(), &[1, 2]);
        assert_eq!(seg.frames(), 1);
    }

    #[test]
    fn test_leading_truncates_long_segments() {
        let seg = silence(STEREO_1K, 45_000).leading(Duration::from_secs(20));
        assert_eq!(seg.duration_ms(), 20_000);
    }

    #[test]
    fn test_leading_keeps_short_segments() {
        let seg = silence(STEREO_1K, 12_345).leading(Duration::from_secs(20));
        assert_eq!(seg.duration_ms(), 12_345);
    }

    #[test]
    fn test_leading_keeps_prefix_samples() {
        let seg = Segment::new(
            PcmFormat {
                sample_rate: 1000,
                channels: 1,
            },
            (0..3000).map(|i| i as i16).collect(),
        )
        .leading(Duration::from_secs(1));
        assert_eq!(seg.samples().len(), 1000);
        assert_eq!(seg.samples()[0], 0);
        assert_eq!(seg.samples()[999], 999);
    }

    #[test]
    fn test_append_sums_durations() {
        let mut merged = silence(STEREO_1K, 20_000);
        merged.append(&silence(STEREO_1K, 7_500)).unwrap();
        assert_eq!(merged.duration_ms(), 27_500);
    }

    #[test]
    fn test_append_rejects_format_mismatch() {
        let mut merged = silence(STEREO_1K, 100);
        let mono = PcmFormat {
            sample_rate: 1000,
            channels: 1,
        };
        assert_eq!(merged.append(&silence(mono, 100)), Err(mono));
        assert_eq!(merged.duration_ms(), 100);
    }

    #[test]
    fn test_le_bytes() {
        let seg = Segment::from_le_bytes(STEREO_1K, &[0x01, 0x00, 0xff, 0xff, 0x07]);
        assert_eq!(seg.samples(), &[1, -1]);
        assert_eq!(seg.to_le_bytes(), vec![0x01, 0x00, 0xff, 0xff]);
    }
}
