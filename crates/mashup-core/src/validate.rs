//! Input validation for the CLI and the web form

use crate::error::ValidationError;
use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

pub const CLI_MIN_ITEMS: u32 = 10;
pub const WEB_MIN_ITEMS: u32 = 2;
pub const MIN_DURATION_SECS: u32 = 20;
pub const OUTPUT_EXTENSION: &str = ".mp3";

/// Validated parameters shared by both front ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MashupParams {
    pub artist: String,
    pub item_count: u32,
    pub duration_secs: u32,
}

/// Validated CLI invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliRequest {
    pub params: MashupParams,
    pub output: PathBuf,
}

/// Raw web form, exactly as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct WebSubmission {
    pub singer_name: String,
    pub email: String,
    pub num_videos: String,
    pub duration: String,
}

/// Validated web submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebRequest {
    pub params: MashupParams,
    pub email: String,
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+$").expect("valid email regex")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// Integer parse without coercion: no decimals, no blanks.
fn parse_count(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Check a number against a floor, pushing the matching message on failure.
fn check_min(
    raw: &str,
    min: u32,
    not_integer: &str,
    too_small: &str,
    reasons: &mut Vec<String>,
) -> Option<u32> {
    match parse_count(raw) {
        None => {
            reasons.push(not_integer.to_string());
            None
        }
        Some(n) if n < i64::from(min) => {
            reasons.push(too_small.to_string());
            None
        }
        Some(n) => u32::try_from(n).ok().or_else(|| {
            reasons.push(not_integer.to_string());
            None
        }),
    }
}

/// `<SingerName> <NumberOfVideos> <AudioDuration> <OutputFileName>`
pub fn validate_cli(
    artist: &str,
    item_count: &str,
    duration: &str,
    output: &str,
) -> Result<CliRequest, ValidationError> {
    let mut reasons = Vec::new();

    let artist = artist.trim();
    if artist.is_empty() {
        reasons.push("SingerName must not be empty.".to_string());
    }

    let item_count = check_min(
        item_count,
        CLI_MIN_ITEMS,
        "NumberOfVideos must be a positive integer.",
        &format!("NumberOfVideos must be at least {}.", CLI_MIN_ITEMS),
        &mut reasons,
    );
    let duration_secs = check_min(
        duration,
        MIN_DURATION_SECS,
        "AudioDuration must be a positive integer.",
        &format!("AudioDuration must be at least {} seconds.", MIN_DURATION_SECS),
        &mut reasons,
    );

    if !output.ends_with(OUTPUT_EXTENSION) {
        reasons.push(format!("OutputFileName must end with {}", OUTPUT_EXTENSION));
    }

    match (item_count, duration_secs) {
        (Some(item_count), Some(duration_secs)) if reasons.is_empty() => Ok(CliRequest {
            params: MashupParams {
                artist: artist.to_string(),
                item_count,
                duration_secs,
            },
            output: PathBuf::from(output),
        }),
        _ => Err(ValidationError { reasons }),
    }
}

pub fn validate_web(form: &WebSubmission) -> Result<WebRequest, ValidationError> {
    let mut reasons = Vec::new();

    let artist = form.singer_name.trim();
    if artist.is_empty() {
        reasons.push("Singer name is required.".to_string());
    }

    let item_count = check_min(
        &form.num_videos,
        WEB_MIN_ITEMS,
        "Number of videos must be an integer.",
        &format!("Number of videos must be at least {}.", WEB_MIN_ITEMS),
        &mut reasons,
    );
    let duration_secs = check_min(
        &form.duration,
        MIN_DURATION_SECS,
        "Duration must be an integer.",
        &format!("Duration must be at least {} seconds.", MIN_DURATION_SECS),
        &mut reasons,
    );

    let email = form.email.trim();
    if !is_valid_email(email) {
        reasons.push("Please enter a valid email address.".to_string());
    }

    match (item_count, duration_secs) {
        (Some(item_count), Some(duration_secs)) if reasons.is_empty() => Ok(WebRequest {
            params: MashupParams {
                artist: artist.to_string(),
                item_count,
                duration_secs,
            },
            email: email.to_string(),
        }),
        _ => Err(ValidationError { reasons }),
    }
}
