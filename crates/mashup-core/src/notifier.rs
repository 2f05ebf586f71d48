//! Email delivery of packaged mashups over SMTP

use crate::config::SmtpConfig;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

pub const SUBJECT: &str = "Your Mashup is Ready!";
pub const NOT_CONFIGURED: &str = "SMTP credentials not configured on the server.";

/// Outcome of a delivery attempt. Never fatal to the job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    NotConfigured,
    Failed(String),
}

impl Delivery {
    pub fn is_sent(&self) -> bool {
        matches!(self, Delivery::Sent)
    }

    /// Human-readable reason the mail did not go out
    pub fn reason(&self) -> Option<&str> {
        match self {
            Delivery::Sent => None,
            Delivery::NotConfigured => Some(NOT_CONFIGURED),
            Delivery::Failed(reason) => Some(reason),
        }
    }
}

impl fmt::Display for Delivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delivery::Sent => write!(f, "sent"),
            Delivery::NotConfigured => write!(f, "not configured"),
            Delivery::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notifier {
    smtp: SmtpConfig,
}

impl Notifier {
    pub fn new(smtp: SmtpConfig) -> Self {
        Self { smtp }
    }

    pub fn is_configured(&self) -> bool {
        self.smtp.credentials().is_some()
    }

    /// Mail `archive` to `to`. Every failure is folded into the returned
    /// [`Delivery`].
    pub async fn send(&self, to: &str, archive: &Path, artist: &str) -> Delivery {
        let Some((sender, password)) = self.smtp.credentials() else {
            info!("SMTP not configured, skipping email to {}", to);
            return Delivery::NotConfigured;
        };

        match self.try_send(sender, password, to, archive, artist).await {
            Ok(()) => {
                info!("Mashup emailed to {}", to);
                Delivery::Sent
            }
            Err(reason) => {
                warn!("Email to {} failed: {}", to, reason);
                Delivery::Failed(reason)
            }
        }
    }

    async fn try_send(
        &self,
        sender: &str,
        password: &str,
        to: &str,
        archive: &Path,
        artist: &str,
    ) -> Result<(), String> {
        let bytes = tokio::fs::read(archive).await.map_err(|e| e.to_string())?;
        let filename = archive
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "mashup.zip".to_string());

        let message = build_message(sender, to, artist, &filename, bytes)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.smtp.server)
            .map_err(|e| e.to_string())?
            .port(self.smtp.port)
            .credentials(Credentials::new(sender.to_string(), password.to_string()))
            .build();

        transport.send(message).await.map_err(|e| e.to_string())?;
        Ok(())
    }
}

/// Compose the notification with the archive attached. Binary attachment
/// bodies are base64 transfer-encoded by lettre.
pub fn build_message(
    from: &str,
    to: &str,
    artist: &str,
    filename: &str,
    archive: Vec<u8>,
) -> Result<Message, String> {
    let from: Mailbox = from.parse().map_err(|e| format!("invalid sender: {}", e))?;
    let to: Mailbox = to.parse().map_err(|e| format!("invalid recipient: {}", e))?;
    let zip = ContentType::parse("application/zip").map_err(|e| e.to_string())?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(SUBJECT)
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(format!(
                    "Your {} mashup is attached as {}.",
                    artist, filename
                )))
                .singlepart(Attachment::new(filename.to_string()).body(archive, zip)),
        )
        .map_err(|e| e.to_string())
}
