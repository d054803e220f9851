//! SMS channel: outbound provider client and inbound webhook payloads.
//!
//! The sender sits behind a trait so the gateway can be exercised in tests
//! with a recording sender instead of live provider calls.

mod inbound;
mod sms;

pub use inbound::InboundSms;
pub use sms::{SendError, SmsSender, TwilioClient};
