//! Configuration management for mashup

use crate::error::ConfigError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Deployment variables read without the `MASHUP_` prefix.
const LEGACY_ENV_KEYS: [&str; 5] = [
    "SENDER_EMAIL",
    "SENDER_PASSWORD",
    "SMTP_SERVER",
    "SMTP_PORT",
    "PORT",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    pub workspace: WorkspaceConfig,
    pub fetch: FetchConfig,
    pub audio: AudioConfig,
    pub smtp: SmtpConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Path to yt-dlp binary (auto-detected if not set)
    pub yt_dlp: Option<PathBuf>,
    /// Path to FFmpeg binary (auto-detected if not set)
    pub ffmpeg: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Base directory for CLI scratch directories
    pub root: PathBuf,
    /// CLI download directory, relative to `root`
    pub download_dir: PathBuf,
    /// CLI transcoded-audio directory, relative to `root`
    pub audio_dir: PathBuf,
    /// Web job artifacts and per-job scratch directories
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// yt-dlp format selector
    pub format: String,
    /// Appended to the artist name in the search query
    pub search_suffix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// PCM sample rate segments are decoded to
    pub sample_rate: u32,
    /// PCM channel count segments are decoded to
    pub channels: u16,
    /// LAME VBR quality (0 = best, 9 = smallest)
    pub mp3_quality: u8,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub sender_email: Option<String>,
    pub sender_password: Option<String>,
    pub server: String,
    pub port: u16,
}

impl SmtpConfig {
    /// Sender address and password, if both are present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let email = self.sender_email.as_deref().filter(|s| !s.is_empty())?;
        let password = self.sender_password.as_deref().filter(|s| !s.is_empty())?;
        Some((email, password))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig {
                yt_dlp: None,
                ffmpeg: None,
            },
            workspace: WorkspaceConfig {
                root: PathBuf::from("."),
                download_dir: PathBuf::from("downloads"),
                audio_dir: PathBuf::from("audios"),
                output_dir: PathBuf::from("output"),
            },
            fetch: FetchConfig {
                format: "bestaudio/best".to_string(),
                search_suffix: "songs".to_string(),
            },
            audio: AudioConfig {
                sample_rate: 44_100,
                channels: 2,
                mp3_quality: 2,
            },
            smtp: SmtpConfig {
                sender_email: None,
                sender_password: None,
                server: "smtp.gmail.com".to_string(),
                port: 587,
            },
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::figment(config_file)
            .extract()
            .map_err(|e| ConfigError::LoadError(e.to_string()))
    }

    fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Load from default config directory
        if let Some(config_dir) = dirs::config_dir() {
            let default_config = config_dir.join("mashup/config.toml");
            if default_config.exists() {
                figment = figment.merge(Toml::file(&default_config));
            }
        }

        // Load from specified config file
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }

        figment
            .merge(Env::prefixed("MASHUP_").split("__"))
            .merge(Env::raw().only(&LEGACY_ENV_KEYS).map(|key| {
                match key.as_str().to_ascii_lowercase().as_str() {
                    "sender_email" => "smtp.sender_email".into(),
                    "sender_password" => "smtp.sender_password".into(),
                    "smtp_server" => "smtp.server".into(),
                    "smtp_port" => "smtp.port".into(),
                    "port" => "server.port".into(),
                    other => other.to_string().into(),
                }
            }))
    }

    /// Get yt-dlp path, auto-detecting if not configured
    pub fn yt_dlp_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.paths.yt_dlp {
            Ok(path.clone())
        } else {
            which::which("yt-dlp")
                .map_err(|_| ConfigError::InvalidValue("yt-dlp not found in PATH".to_string()))
        }
    }

    /// Get FFmpeg path, auto-detecting if not configured
    pub fn ffmpeg_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.paths.ffmpeg {
            Ok(path.clone())
        } else {
            which::which("ffmpeg")
                .map_err(|_| ConfigError::InvalidValue("ffmpeg not found in PATH".to_string()))
        }
    }

    pub fn download_dir(&self) -> PathBuf {
        self.workspace.root.join(&self.workspace.download_dir)
    }

    pub fn audio_dir(&self) -> PathBuf {
        self.workspace.root.join(&self.workspace.audio_dir)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.workspace.root.join(&self.workspace.output_dir)
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }
}
