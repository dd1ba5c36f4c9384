//! SMS delivery abstractions

pub mod twilio;

pub use twilio::TwilioSmsSender;

use async_trait::async_trait;
use thiserror::Error;

/// Delivery failures the flow layer must distinguish
#[derive(Debug, Clone, Error)]
pub enum SmsError {
    /// The recipient number is unverified or blocked at the provider
    /// (Twilio error code 21608)
    #[error("recipient phone number is unverified")]
    UnverifiedRecipient,

    /// Any other provider failure, with the raw provider error text
    #[error("{0}")]
    Provider(String),
}

/// Trait for delivering a one-time passcode over SMS
#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Send a message to a phone number. A single failed attempt is
    /// surfaced immediately; there is no retry or backoff.
    async fn send(&self, phone: &str, body: &str) -> Result<(), SmsError>;
}
