use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::api::client::DEFAULT_API_URL;
use crate::claims::view::DEFAULT_PAGE_SIZE;

/// Default seconds between background refreshes.
pub const DEFAULT_POLL_SECS: u64 = 15;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the detection backend (CLAIMDESK_API_URL).
    pub api_url: String,
    /// Claims per page in the claims table (CLAIMDESK_PAGE_SIZE).
    pub page_size: usize,
    /// Interval between background refreshes (CLAIMDESK_POLL_SECS).
    pub poll_interval: Duration,
    /// Where exports are written (CLAIMDESK_EXPORT_DIR). Defaults to the
    /// user's download directory, falling back to the working directory.
    pub export_dir: PathBuf,
    /// Socket.IO server for push events (CLAIMDESK_SOCKET_URL). Defaults
    /// to the API URL, which is where the backend serves both.
    pub socket_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default; only malformed numeric values are errors.
    pub fn load() -> Result<Self> {
        let page_size = match env::var("CLAIMDESK_PAGE_SIZE") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("CLAIMDESK_PAGE_SIZE must be a number, got '{raw}'"))?,
            Err(_) => DEFAULT_PAGE_SIZE,
        };

        let poll_secs = match env::var("CLAIMDESK_POLL_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("CLAIMDESK_POLL_SECS must be a number, got '{raw}'"))?,
            Err(_) => DEFAULT_POLL_SECS,
        };

        let export_dir = env::var("CLAIMDESK_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_export_dir());

        let api_url =
            env::var("CLAIMDESK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let socket_url = env::var("CLAIMDESK_SOCKET_URL").unwrap_or_else(|_| api_url.clone());

        let config = Self {
            api_url,
            page_size,
            poll_interval: Duration::from_secs(poll_secs),
            export_dir,
            socket_url,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the views or poller misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            anyhow::bail!("CLAIMDESK_PAGE_SIZE must be at least 1.");
        }
        if self.poll_interval.is_zero() {
            anyhow::bail!("CLAIMDESK_POLL_SECS must be at least 1.");
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            anyhow::bail!(
                "CLAIMDESK_API_URL must start with http:// or https://, got '{}'.\n\
                 See .env.example for the expected variables.",
                self.api_url
            );
        }
        if !self.socket_url.starts_with("http://") && !self.socket_url.starts_with("https://") {
            anyhow::bail!(
                "CLAIMDESK_SOCKET_URL must start with http:// or https://, got '{}'.",
                self.socket_url
            );
        }
        Ok(())
    }
}

/// The user's download directory, or the working directory if there isn't one.
pub fn default_export_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}
