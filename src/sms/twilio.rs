//! Twilio Messages API sender

use async_trait::async_trait;
use serde::Deserialize;

use super::{SmsError, SmsSender};
use crate::config::TwilioConfig;

/// Twilio error code for an unverified/blocked recipient
const UNVERIFIED_RECIPIENT_CODE: i64 = 21608;

/// SMS sender backed by the Twilio REST API
pub struct TwilioSmsSender {
    http: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

/// Error body returned by the Twilio API on failure
#[derive(Debug, Default, Deserialize)]
struct TwilioErrorBody {
    code: Option<i64>,
    message: Option<String>,
}

impl TwilioSmsSender {
    pub fn new(config: &TwilioConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_number: config.from_number.clone(),
        }
    }
}

#[async_trait]
impl SmsSender for TwilioSmsSender {
    async fn send(&self, phone: &str, body: &str) -> Result<(), SmsError> {
        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        );

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[
                ("To", phone),
                ("From", self.from_number.as_str()),
                ("Body", body),
            ])
            .send()
            .await
            .map_err(|e| SmsError::Provider(e.to_string()))?;

        if response.status().is_success() {
            tracing::info!(to = %phone, "SMS delivered to provider");
            return Ok(());
        }

        let status = response.status();
        let error: TwilioErrorBody = response.json().await.unwrap_or_default();

        if error.code == Some(UNVERIFIED_RECIPIENT_CODE) {
            tracing::warn!(to = %phone, "recipient unverified at provider");
            return Err(SmsError::UnverifiedRecipient);
        }

        Err(SmsError::Provider(error.message.unwrap_or_else(|| {
            format!("Twilio returned HTTP {status}")
        })))
    }
}
