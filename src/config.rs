use std::env;

use anyhow::{anyhow, Context, Result};

pub const DEFAULT_TICKER_URL: &str = "https://api.coinmarketcap.com/v1/ticker";
pub const DEFAULT_SMTP_HOST: &str = "smtp.mail.yahoo.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub sender: String,
    pub recipient: String,
    pub smtp_username: String,
    pub smtp_secret: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub ticker_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("{key} must be set in the environment or .env"))
        };

        let sender = required("SENDER")?;
        let recipient = required("RECIPIENT")?;
        let smtp_secret = required("SECRET")?;

        let smtp_username = lookup("SMTP_USERNAME")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| sender.clone());
        let smtp_host = lookup("SMTP_HOST")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string());
        let smtp_port = match lookup("SMTP_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("SMTP_PORT is not a valid port: {raw}"))?,
            None => DEFAULT_SMTP_PORT,
        };
        let ticker_url = lookup("TICKER_URL")
            .filter(|v| !v.is_empty())
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_TICKER_URL.to_string());

        Ok(Self {
            sender,
            recipient,
            smtp_username,
            smtp_secret,
            smtp_host,
            smtp_port,
            ticker_url,
        })
    }
}
