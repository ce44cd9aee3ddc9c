use std::fmt;

use anyhow::{anyhow, Context, Result};
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use super::AlertDigest;
use crate::config::AppConfig;
use crate::utils::mask_email;

pub type RelayTransport = AsyncSmtpTransport<Tokio1Executor>;

/// Sends the digest as one multipart email. Generic over the transport so
/// tests can swap in lettre's stub.
pub struct EmailNotifier<T = RelayTransport> {
    sender: Mailbox,
    recipient: Mailbox,
    transport: T,
}

impl EmailNotifier<RelayTransport> {
    /// STARTTLS relay with LOGIN/PLAIN auth. Built without pooling, so every
    /// send opens and closes its own connection.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let transport = RelayTransport::starttls_relay(&config.smtp_host)
            .with_context(|| format!("invalid SMTP relay {}", config.smtp_host))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_secret.clone(),
            ))
            .authentication(vec![Mechanism::Login, Mechanism::Plain])
            .build();

        info!(
            "📧 Mail relay {}:{} as {}",
            config.smtp_host,
            config.smtp_port,
            mask_email(&config.smtp_username)
        );

        Self::new(&config.sender, &config.recipient, transport)
    }
}

impl<T> EmailNotifier<T>
where
    T: AsyncTransport + Sync,
    T::Error: fmt::Display,
{
    pub fn new(sender: &str, recipient: &str, transport: T) -> Result<Self> {
        let sender = sender
            .parse::<Mailbox>()
            .with_context(|| format!("SENDER is not a valid address: {sender}"))?;
        let recipient = recipient
            .parse::<Mailbox>()
            .with_context(|| format!("RECIPIENT is not a valid address: {recipient}"))?;

        Ok(Self {
            sender,
            recipient,
            transport,
        })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// One `multipart/mixed` message holding a plain/HTML alternative per coin.
    pub fn build_message(&self, digest: &AlertDigest) -> Result<Message> {
        let mut parts = digest
            .sections()
            .iter()
            .map(|s| MultiPart::alternative_plain_html(s.text.clone(), s.html.clone()));
        let first = parts
            .next()
            .ok_or_else(|| anyhow!("alert digest has no ticker sections"))?;
        let body = parts.fold(MultiPart::mixed().multipart(first), |body, part| {
            body.multipart(part)
        });

        Message::builder()
            .from(self.sender.clone())
            .to(self.recipient.clone())
            .subject(digest.subject())
            .multipart(body)
            .context("failed to build alert email")
    }

    pub async fn send(&self, digest: &AlertDigest) -> Result<()> {
        let message = self.build_message(digest)?;
        let recipient = mask_email(&self.recipient.email.to_string());
        self.transport
            .send(message)
            .await
            .map_err(|e| anyhow!("SMTP delivery to {recipient} failed: {e}"))?;
        Ok(())
    }
}
