//! Leading-slice extraction from transcoded audio

use crate::codec::AudioCodec;
use crate::error::{MashupError, Stage};
use crate::segment::Segment;
use crate::stage::{ItemFailure, Narrowed};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Load each file and keep its first `clip` of audio.
pub async fn trim_all(
    codec: &dyn AudioCodec,
    files: &[PathBuf],
    clip: Duration,
) -> Result<Narrowed<Segment>, MashupError> {
    info!("Cutting first {} seconds from each audio file", clip.as_secs());

    let mut outcomes = Vec::with_capacity(files.len());
    for path in files {
        match codec.load_mp3(path, Some(clip)).await {
            Ok(segment) => {
                let segment = segment.leading(clip);
                info!("  Cut: {} ({} ms)", path.display(), segment.duration_ms());
                outcomes.push(Ok(segment));
            }
            Err(e) => {
                warn!("  Could not cut {}: {}", path.display(), e);
                outcomes.push(Err(ItemFailure::new(path, e)));
            }
        }
    }

    let narrowed = outcomes
        .into_iter()
        .collect::<Narrowed<_>>()
        .require_any(Stage::Trim)?;
    info!("Successfully cut {} audio segments", narrowed.kept.len());
    Ok(narrowed)
}
