//! Twilio channel: send one SMS via the Messages API.

use crate::config::ProviderConfig;
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

const TWILIO_API_BASE: &str = "https://api.twilio.com";

/// Why an outbound send failed. The Display text is surfaced verbatim to the
/// panel; there is no retry.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("twilio credentials not configured")]
    NotConfigured,
    /// Provider-side rejection (auth, bad number, quota). Carries Twilio's
    /// own error message.
    #[error("twilio send rejected ({status}): {message}")]
    Provider { status: u16, message: String },
    #[error("twilio request failed: {0}")]
    Transport(String),
}

/// Outbound SMS seam. The gateway holds this as a trait object so tests can
/// substitute a recording sender.
#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Deliver one message to `to`. Blocks on the provider call and
    /// propagates its failure synchronously.
    async fn send(&self, to: &str, body: &str) -> Result<(), SendError>;
}

/// Success body of the Messages API (subset).
#[derive(Debug, Deserialize)]
struct TwilioMessageBody {
    sid: Option<String>,
}

/// Error body of the Messages API (subset).
#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    message: Option<String>,
}

/// Twilio REST client. Credentials are optional at construction; a send with
/// missing credentials fails with `SendError::NotConfigured`.
pub struct TwilioClient {
    account_sid: Option<String>,
    auth_token: Option<String>,
    from_number: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl TwilioClient {
    pub fn new(provider: &ProviderConfig) -> Self {
        Self {
            account_sid: provider.account_sid.clone(),
            auth_token: provider.auth_token.clone(),
            from_number: provider.from_number.clone(),
            base_url: provider
                .api_base
                .clone()
                .unwrap_or_else(|| TWILIO_API_BASE.to_string()),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SmsSender for TwilioClient {
    async fn send(&self, to: &str, body: &str) -> Result<(), SendError> {
        let (Some(sid), Some(token), Some(from)) = (
            self.account_sid.as_ref(),
            self.auth_token.as_ref(),
            self.from_number.as_ref(),
        ) else {
            return Err(SendError::NotConfigured);
        };
        let url = format!("{}/2010-04-01/Accounts/{}/Messages.json", self.base_url, sid);
        let params = [("To", to), ("From", from.as_str()), ("Body", body)];
        let res = self
            .client
            .post(&url)
            .basic_auth(sid, Some(token))
            .form(&params)
            .send()
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;
        let status = res.status();
        if !status.is_success() {
            let message = match res.json::<TwilioErrorBody>().await {
                Ok(b) => b
                    .message
                    .unwrap_or_else(|| "unknown provider error".to_string()),
                Err(_) => "unknown provider error".to_string(),
            };
            return Err(SendError::Provider {
                status: status.as_u16(),
                message,
            });
        }
        let message_sid = res
            .json::<TwilioMessageBody>()
            .await
            .ok()
            .and_then(|b| b.sid)
            .unwrap_or_default();
        log::debug!("twilio accepted message to {} (sid {})", to, message_sid);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_credentials_fail_without_a_network_call() {
        let client = TwilioClient::new(&ProviderConfig::default());
        let err = client.send("+15550001111", "hello").await.unwrap_err();
        assert!(matches!(err, SendError::NotConfigured));
        assert_eq!(err.to_string(), "twilio credentials not configured");
    }
}
