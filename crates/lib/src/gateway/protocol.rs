//! Gateway HTTP wire types (JSON bodies of the panel-facing API).

use crate::store::Reply;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/send-sms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSmsRequest {
    pub caregiver_id: String,
    pub caregiver_name: String,
    pub shift_time: String,
}

/// Result of a send: `{ok:true, sentTo}` or `{ok:false, error}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSmsResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendSmsResponse {
    pub fn sent(to: impl Into<String>) -> Self {
        Self {
            ok: true,
            sent_to: Some(to.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            sent_to: None,
            error: Some(error.into()),
        }
    }
}

/// Body of `POST /api/track-sent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSentRequest {
    pub caregiver_id: String,
}

/// Plain `{ok:true}` acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Acknowledged {
    pub ok: bool,
}

impl Acknowledged {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// Body of `GET /api/reply/:caregiverId`; `reply` is null until a webhook
/// has been attributed to the caregiver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyEnvelope {
    pub reply: Option<Reply>,
}
