//! Concatenation of trimmed segments into the final mashup

use crate::codec::AudioCodec;
use crate::error::{MashupError, MergeError, Stage};
use crate::segment::Segment;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    pub output: PathBuf,
    pub segments: usize,
    pub duration: Duration,
}

/// Append `rest` after `first` in order. No cross-fade, no gain change.
pub fn concatenate(first: &Segment, rest: &[Segment]) -> Result<Segment, MergeError> {
    let mut merged = first.clone();
    for (offset, segment) in rest.iter().enumerate() {
        merged
            .append(segment)
            .map_err(|found| MergeError::FormatMismatch {
                index: offset + 1,
                expected: first.format().to_string(),
                found: found.to_string(),
            })?;
    }
    Ok(merged)
}

/// Concatenate and export the mashup to `output` as MP3.
pub async fn merge(
    codec: &dyn AudioCodec,
    segments: &[Segment],
    output: &Path,
) -> Result<MergeSummary, MashupError> {
    info!("Merging {} audio segments into a single file", segments.len());

    let (first, rest) = segments
        .split_first()
        .ok_or(MashupError::NoItems { stage: Stage::Merge })?;
    let merged = concatenate(first, rest)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(MergeError::from)?;
    }
    codec
        .export_mp3(&merged, output)
        .await
        .map_err(MergeError::from)?;

    info!("Mashup saved to: {}", output.display());
    Ok(MergeSummary {
        output: output.to_path_buf(),
        segments: segments.len(),
        duration: merged.duration(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::PcmFormat;

    const MONO_8K: PcmFormat = PcmFormat {
        sample_rate: 8000,
        channels: 1,
    };

    #[test]
    fn test_concatenate_in_order() {
        let merged = concatenate(
            &Segment::new(MONO_8K, vec![1; 8000]),
            &[Segment::new(MONO_8K, vec![2; 4000])],
        )
        .unwrap();
        assert_eq!(merged.duration_ms(), 1500);
        assert_eq!(merged.samples()[7999], 1);
        assert_eq!(merged.samples()[8000], 2);
    }

    struct Unused;

    #[async_trait::async_trait]
    impl AudioCodec for Unused {
        async fn transcode(&self, _: &Path, _: &Path) -> Result<(), crate::error::EncodeError> {
            unreachable!()
        }

        async fn load_mp3(
            &self,
            _: &Path,
            _: Option<Duration>,
        ) -> Result<Segment, crate::error::DecodeError> {
            unreachable!()
        }

        async fn export_mp3(&self, _: &Segment, _: &Path) -> Result<(), crate::error::EncodeError> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn test_merge_nothing_is_no_items() {
        let err = merge(&Unused, &[], Path::new("out.mp3")).await.unwrap_err();
        assert!(matches!(err, MashupError::NoItems { stage: Stage::Merge }));
        assert_eq!(err.to_string(), "No audio segments to merge.");
    }

    #[test]
    fn test_concatenate_reports_mismatch_index() {
        let stereo = PcmFormat {
            sample_rate: 8000,
            channels: 2,
        };
        let rest = vec![
            Segment::new(MONO_8K, vec![0; 10]),
            Segment::new(stereo, vec![0; 10]),
        ];
        match concatenate(&Segment::new(MONO_8K, vec![0; 10]), &rest) {
            Err(MergeError::FormatMismatch { index, .. }) => assert_eq!(index, 2),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
