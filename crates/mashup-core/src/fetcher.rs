//! Search-and-download of artist media using yt-dlp

use crate::config::Config;
use crate::error::{ConfigError, FetchError, MashupError, Stage};
use async_trait::async_trait;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Files starting with this prefix are metadata droppings, not media.
const HIDDEN_PREFIX: &str = "._";

/// One "top N results for term" request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub count: u32,
}

impl SearchQuery {
    pub fn new(artist: &str, suffix: &str, count: u32) -> Self {
        let term = if suffix.is_empty() {
            artist.to_string()
        } else {
            format!("{} {}", artist, suffix)
        };
        Self { term, count }
    }

    /// yt-dlp search URL, e.g. `ytsearch10:Sharry Maan songs`
    pub fn to_ytsearch(&self) -> String {
        format!("ytsearch{}:{}", self.count, self.term)
    }
}

#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Download every result for `query` into `dest`.
    async fn search_and_download(&self, query: &SearchQuery, dest: &Path) -> Result<(), FetchError>;
}

#[derive(Debug)]
pub struct YtDlp {
    yt_dlp_path: PathBuf,
    format: String,
}

impl YtDlp {
    pub fn new(yt_dlp_path: PathBuf, format: impl Into<String>) -> Self {
        Self {
            yt_dlp_path,
            format: format.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(config.yt_dlp_path()?, config.fetch.format.clone()))
    }

    fn args(&self, query: &SearchQuery, dest: &Path) -> Vec<OsString> {
        vec![
            "-f".into(),
            self.format.clone().into(),
            "-o".into(),
            dest.join("%(title)s.%(ext)s").into_os_string(),
            "--no-playlist".into(),
            "--quiet".into(),
            "--no-warnings".into(),
            query.to_ytsearch().into(),
        ]
    }
}

#[async_trait]
impl MediaSource for YtDlp {
    async fn search_and_download(&self, query: &SearchQuery, dest: &Path) -> Result<(), FetchError> {
        let args = self.args(query, dest);
        debug!("yt-dlp args: {:?}", args);

        let output = Command::new(&self.yt_dlp_path)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => FetchError::YtDlpNotFound,
                _ => FetchError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);
            return Err(FetchError::YtDlpFailed {
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(())
    }
}

/// Run one search-and-download for `query` and return the media now present
/// in `dest`, sorted by file name.
pub async fn fetch(
    source: &dyn MediaSource,
    query: &SearchQuery,
    dest: &Path,
) -> Result<Vec<PathBuf>, MashupError> {
    info!(
        "Searching and downloading {} videos of '{}'",
        query.count, query.term
    );

    source.search_and_download(query, dest).await?;

    let files = list_media(dest).await?;
    if files.is_empty() {
        return Err(MashupError::NoItems {
            stage: Stage::Fetch,
        });
    }

    info!("Successfully downloaded {} files", files.len());
    Ok(files)
}

/// Regular files in `dir`, skipping hidden metadata files.
pub async fn list_media(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let hidden = entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with(HIDDEN_PREFIX))
            .unwrap_or(false);
        if !hidden {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}
