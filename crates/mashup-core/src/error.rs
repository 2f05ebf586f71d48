//! Error types for mashup-core

use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MashupError>;

/// Pipeline stage, used to attribute run-level failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Transcode,
    Trim,
    Merge,
    Package,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Fetch => write!(f, "fetch"),
            Stage::Transcode => write!(f, "transcode"),
            Stage::Trim => write!(f, "trim"),
            Stage::Merge => write!(f, "merge"),
            Stage::Package => write!(f, "package"),
        }
    }
}

#[derive(Error, Debug)]
pub enum MashupError {
    #[error("Error downloading videos: {0}")]
    Fetch(#[from] FetchError),

    #[error("{}", no_items_message(.stage))]
    NoItems { stage: Stage },

    #[error("Error merging audio files: {0}")]
    Merge(#[from] MergeError),

    #[error("Error packaging mashup: {0}")]
    Package(#[from] PackageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MashupError {
    /// Stage the run died in, if it got past validation.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            MashupError::Fetch(_) => Some(Stage::Fetch),
            MashupError::NoItems { stage } => Some(*stage),
            MashupError::Merge(_) => Some(Stage::Merge),
            MashupError::Package(_) => Some(Stage::Package),
            _ => None,
        }
    }
}

fn no_items_message(stage: &Stage) -> &'static str {
    match stage {
        Stage::Fetch => "No videos were downloaded. Check the singer name and try again.",
        Stage::Transcode => "No files could be converted to audio.",
        Stage::Trim => "No audio segments could be cut.",
        Stage::Merge => "No audio segments to merge.",
        Stage::Package => "Nothing to package.",
    }
}

/// Every rule an input set failed, in rule order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .reasons.join(" "))]
pub struct ValidationError {
    pub reasons: Vec<String>,
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("yt-dlp not found. Install with: pip install yt-dlp")]
    YtDlpNotFound,

    #[error("yt-dlp failed with exit code {code:?}: {stderr}")]
    YtDlpFailed { code: Option<i32>, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("FFmpeg not found. Install with: apt install ffmpeg")]
    FfmpegNotFound,

    #[error("FFmpeg failed with exit code {code:?}: {stderr}")]
    FfmpegFailed { code: Option<i32>, stderr: String },

    #[error("Decoded stream is empty")]
    EmptyStream,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("FFmpeg not found")]
    FfmpegNotFound,

    #[error("FFmpeg encoding failed with exit code {code:?}: {stderr}")]
    FfmpegFailed { code: Option<i32>, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("Segment {index} is {found}, expected {expected}")]
    FormatMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("Export failed: {0}")]
    Export(#[from] EncodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum PackageError {
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("Packaging task failed: {0}")]
    Join(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(String),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
