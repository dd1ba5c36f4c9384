//! Environment-sourced configuration

use anyhow::{bail, Context, Result};

/// Minimum length for the cookie-signing secret. The signing key is
/// derived from this material, which needs at least 32 bytes.
const MIN_SECRET_LENGTH: usize = 32;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,

    /// Path to the SQLite user database
    pub database_path: String,

    /// Secret used to derive the session-cookie signing key
    pub secret_key: String,

    /// Twilio credentials for OTP delivery
    pub twilio: TwilioConfig,
}

#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

impl Config {
    /// Load configuration from the environment. Missing required variables
    /// are fatal here rather than at first use.
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(value) => value.parse::<u16>().context("PORT is not a valid port number")?,
            Err(_) => 8080,
        };

        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| "users.db".to_string());

        let secret_key = require_var("SECRET_KEY")?;
        if secret_key.len() < MIN_SECRET_LENGTH {
            bail!("SECRET_KEY must be at least {MIN_SECRET_LENGTH} bytes");
        }

        let twilio = TwilioConfig {
            account_sid: require_var("TWILIO_ACCOUNT_SID")?,
            auth_token: require_var("TWILIO_AUTH_TOKEN")?,
            from_number: require_var("TWILIO_PHONE_NUMBER")?,
        };

        Ok(Self {
            port,
            database_path,
            secret_key,
            twilio,
        })
    }
}

fn require_var(name: &str) -> Result<String> {
    let value =
        std::env::var(name).with_context(|| format!("required environment variable {name} is not set"))?;
    if value.is_empty() {
        bail!("required environment variable {name} is empty");
    }
    Ok(value)
}
