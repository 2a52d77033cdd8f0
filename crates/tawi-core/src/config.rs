//! Configuration module
//!
//! Client configuration loaded from the environment (and an optional `.env`
//! file). The auth token is deliberately not part of it: callers hand the
//! credential to the API client explicitly.

use std::env;
use std::path::PathBuf;

const DEFAULT_API_URL: &str = "https://tawi-xh85.onrender.com/api";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_CURRENCY: &str = "KES";

/// Settings shared by every API call and by the CLI session store.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout_secs: u64,
    pub session_file: PathBuf,
    pub currency: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            session_file: default_session_file(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

fn default_session_file() -> PathBuf {
    env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".tawi")
        .join("session")
}

impl ClientConfig {
    /// Session file location alone (TAWI_SESSION_FILE, else ~/.tawi/session).
    /// Needs no other setting to be valid.
    pub fn session_file_from_env() -> PathBuf {
        dotenvy::dotenv().ok();

        env::var("TAWI_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_session_file())
    }

    /// Load from TAWI_API_URL (or API_URL), TAWI_TIMEOUT_SECS, TAWI_SESSION_FILE, TAWI_CURRENCY.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let api_url = env::var("TAWI_API_URL")
            .or_else(|_| env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let timeout_secs = env::var("TAWI_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let session_file = Self::session_file_from_env();

        let currency = env::var("TAWI_CURRENCY")
            .map(|c| c.trim().to_uppercase())
            .unwrap_or_else(|_| DEFAULT_CURRENCY.to_string());

        let config = Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            timeout_secs,
            session_file,
            currency,
        };
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "TAWI_API_URL must start with http:// or https:// (got {})",
                self.api_url
            ));
        }

        if self.timeout_secs == 0 {
            return Err(anyhow::anyhow!("TAWI_TIMEOUT_SECS must be greater than 0"));
        }

        if self.currency.is_empty() {
            return Err(anyhow::anyhow!("TAWI_CURRENCY cannot be empty"));
        }

        Ok(())
    }
}
