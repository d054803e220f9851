//! Notification gateway: HTTP bridge between the conversation panel, the SMS
//! provider, and the in-memory reply store.

mod protocol;
mod server;

pub use protocol::{Acknowledged, ReplyEnvelope, SendSmsRequest, SendSmsResponse, TrackSentRequest};
pub use server::{router, run_gateway, GatewayState};
