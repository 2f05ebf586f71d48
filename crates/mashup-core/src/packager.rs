//! Zip packaging of the finished mashup

use crate::error::{MashupError, PackageError, Stage};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Write `file` into a deflated zip at `archive`, stored under its base name.
/// A missing or empty `file` leaves nothing to package.
pub async fn package(file: &Path, archive: &Path) -> Result<PathBuf, MashupError> {
    let size = tokio::fs::metadata(file).await.map(|m| m.len()).unwrap_or(0);
    if size == 0 {
        return Err(MashupError::NoItems {
            stage: Stage::Package,
        });
    }

    let file = file.to_path_buf();
    let archive = archive.to_path_buf();

    let written = tokio::task::spawn_blocking(move || {
        write_archive(&file, &archive).map(|()| archive)
    })
    .await
    .map_err(|e| PackageError::Join(e.to_string()))??;
    Ok(written)
}

fn write_archive(file: &Path, archive: &Path) -> Result<(), PackageError> {
    let entry_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| PackageError::InvalidName(file.display().to_string()))?;

    let mut source = File::open(file)?;
    let mut zip = ZipWriter::new(File::create(archive)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file(entry_name, options)?;
    std::io::copy(&mut source, &mut zip)?;
    zip.finish()?;

    info!("Packaged {} into {}", entry_name, archive.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[tokio::test]
    async fn test_archive_roundtrips_file_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let mp3 = dir.path().join("a1b2c3d4-mashup.mp3");
        let bytes: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(&mp3, &bytes).unwrap();

        let zip_path = dir.path().join("a1b2c3d4-mashup.zip");
        let written = package(&mp3, &zip_path).await.unwrap();
        assert_eq!(written, zip_path);

        let mut archive = zip::ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 1);

        let mut entry = archive.by_index(0).unwrap();
        assert_eq!(entry.name(), "a1b2c3d4-mashup.mp3");
        let mut extracted = Vec::new();
        entry.read_to_end(&mut extracted).unwrap();
        assert_eq!(extracted, bytes);
    }

    #[tokio::test]
    async fn test_missing_or_empty_source_is_nothing_to_package() {
        let dir = tempfile::tempdir().unwrap();
        let err = package(&dir.path().join("nope.mp3"), &dir.path().join("nope.zip"))
            .await
            .unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Package));
        assert_eq!(err.to_string(), "Nothing to package.");

        let empty = dir.path().join("empty.mp3");
        std::fs::write(&empty, b"").unwrap();
        let err = package(&empty, &dir.path().join("empty.zip")).await.unwrap_err();
        assert!(matches!(err, MashupError::NoItems { stage: Stage::Package }));
        assert!(!dir.path().join("empty.zip").exists());
    }

    #[tokio::test]
    async fn test_unwritable_archive_is_package_error() {
        let dir = tempfile::tempdir().unwrap();
        let mp3 = dir.path().join("a-mashup.mp3");
        std::fs::write(&mp3, b"ID3").unwrap();

        let err = package(&mp3, &dir.path().join("missing/dir/a.zip"))
            .await
            .unwrap_err();
        assert!(matches!(err, MashupError::Package(PackageError::Io(_))));
    }
}
