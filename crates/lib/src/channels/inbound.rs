//! Inbound SMS delivered by the provider's reply webhook.

use serde::Deserialize;

/// Form-encoded webhook payload. Field names match Twilio's parameters;
/// anything the provider sends beyond these two is ignored, and a missing
/// field decodes as empty rather than failing the webhook.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundSms {
    #[serde(default, rename = "From")]
    pub from: String,
    #[serde(default, rename = "Body")]
    pub body: String,
}
