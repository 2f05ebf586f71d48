//! Conversion of fetched media into MP3 files

use crate::codec::AudioCodec;
use crate::error::{MashupError, Stage};
use crate::stage::{ItemFailure, Narrowed};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// `{audio_dir}/{stem}.mp3` for a fetched file.
pub fn audio_path_for(source: &Path, audio_dir: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "audio".into());
    let mut name = stem;
    name.push(".mp3");
    audio_dir.join(name)
}

/// Like [`audio_path_for`], but numbered `{stem} (2).mp3`, `{stem} (3).mp3`...
/// when an earlier file in this run already claimed the name.
fn claim_audio_path(source: &Path, audio_dir: &Path, taken: &mut HashSet<PathBuf>) -> PathBuf {
    let mut target = audio_path_for(source, audio_dir);
    if taken.contains(&target) {
        let stem = target
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut n = 2;
        while taken.contains(&target) {
            target = audio_dir.join(format!("{} ({}).mp3", stem, n));
            n += 1;
        }
        warn!(
            "  {} shares a name with an earlier download, writing {}",
            source.display(),
            target.display()
        );
    }
    taken.insert(target.clone());
    target
}

/// Transcode every file, skipping the ones ffmpeg cannot handle.
pub async fn transcode_all(
    codec: &dyn AudioCodec,
    files: &[PathBuf],
    audio_dir: &Path,
) -> Result<Narrowed<PathBuf>, MashupError> {
    info!("Converting {} downloaded files to audio (.mp3)", files.len());

    let mut taken = HashSet::new();
    let mut outcomes = Vec::with_capacity(files.len());
    for source in files {
        let target = claim_audio_path(source, audio_dir, &mut taken);
        match codec.transcode(source, &target).await {
            Ok(()) => {
                info!("  Converted: {}", target.display());
                outcomes.push(Ok(target));
            }
            Err(e) => {
                warn!("  Could not convert {}: {}", source.display(), e);
                outcomes.push(Err(ItemFailure::new(source, e)));
            }
        }
    }

    let narrowed = outcomes
        .into_iter()
        .collect::<Narrowed<_>>()
        .require_any(Stage::Transcode)?;
    info!("Successfully converted {} files to audio", narrowed.kept.len());
    Ok(narrowed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_path_replaces_extension() {
        assert_eq!(
            audio_path_for(Path::new("downloads/Song Title.webm"), Path::new("audios")),
            PathBuf::from("audios/Song Title.mp3")
        );
        assert_eq!(
            audio_path_for(Path::new("downloads/v1.2 live.m4a"), Path::new("audios")),
            PathBuf::from("audios/v1.2 live.mp3")
        );
    }

    #[test]
    fn test_same_stem_gets_distinct_targets() {
        let audio_dir = Path::new("audios");
        let mut taken = HashSet::new();
        let files = ["Song.m4a", "Song.webm", "Song.opus", "Other.webm"];
        let targets: Vec<_> = files
            .iter()
            .map(|f| claim_audio_path(&Path::new("downloads").join(f), audio_dir, &mut taken))
            .collect();

        assert_eq!(
            targets,
            [
                PathBuf::from("audios/Song.mp3"),
                PathBuf::from("audios/Song (2).mp3"),
                PathBuf::from("audios/Song (3).mp3"),
                PathBuf::from("audios/Other.mp3"),
            ]
        );
    }
}
