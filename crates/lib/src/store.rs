//! In-memory gateway state: the reply store and the last-sent pointer.
//!
//! Everything here lives only in process memory and is reset on restart.
//! There is deliberately no cross-request locking beyond the per-store
//! `RwLock`: demo traffic is one request at a time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A caregiver's latest inbound reply. Overwritten by newer webhooks and
/// cleared by the next send for the same caregiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub ts: DateTime<Utc>,
}

/// An outbound reminder as handed to the provider. Created on send, never
/// mutated; only the most recent one is retained.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub caregiver_id: String,
    pub body: String,
    pub ts: DateTime<Utc>,
}

/// Latest reply per caregiver id, plus the most recent outbound reminder.
pub struct ReplyStore {
    replies: RwLock<HashMap<String, Reply>>,
    last_outbound: RwLock<Option<OutboundMessage>>,
}

impl Default for ReplyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplyStore {
    pub fn new() -> Self {
        Self {
            replies: RwLock::new(HashMap::new()),
            last_outbound: RwLock::new(None),
        }
    }

    /// Store a reply for a caregiver, unconditionally overwriting any prior one.
    pub async fn store(&self, caregiver_id: &str, reply: Reply) {
        self.replies
            .write()
            .await
            .insert(caregiver_id.to_string(), reply);
    }

    /// The stored reply, if any. Does not clear; polling is idempotent.
    pub async fn get(&self, caregiver_id: &str) -> Option<Reply> {
        self.replies.read().await.get(caregiver_id).cloned()
    }

    /// Drop any stored reply for a caregiver (called on each successful send).
    pub async fn clear(&self, caregiver_id: &str) {
        self.replies.write().await.remove(caregiver_id);
    }

    /// Record the most recent outbound reminder.
    pub async fn record_outbound(&self, msg: OutboundMessage) {
        *self.last_outbound.write().await = Some(msg);
    }

    /// The most recent outbound reminder, if any send has happened.
    pub async fn last_outbound(&self) -> Option<OutboundMessage> {
        self.last_outbound.read().await.clone()
    }
}

/// Process-wide pointer to the caregiver most recently texted. This is the
/// only mechanism tying an inbound webhook (which carries no caregiver
/// identity) back to a caregiver, so there is at most one in-flight
/// conversation: every send overwrites it, with no queueing.
pub struct LastSentPointer {
    inner: RwLock<Option<String>>,
}

impl Default for LastSentPointer {
    fn default() -> Self {
        Self::new()
    }
}

impl LastSentPointer {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    /// Point at a caregiver, unconditionally replacing any previous value.
    pub async fn set(&self, caregiver_id: &str) {
        *self.inner.write().await = Some(caregiver_id.to_string());
    }

    pub async fn get(&self) -> Option<String> {
        self.inner.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(text: &str) -> Reply {
        Reply {
            text: text.to_string(),
            ts: Utc::now(),
        }
    }

    #[tokio::test]
    async fn replies_overwrite_and_clear() {
        let store = ReplyStore::new();
        assert_eq!(store.get("liam").await, None);

        store.store("liam", reply("1")).await;
        let first = store.get("liam").await.expect("stored reply");
        assert_eq!(first.text, "1");

        store.store("liam", reply("2")).await;
        assert_eq!(store.get("liam").await.unwrap().text, "2");

        store.clear("liam").await;
        assert_eq!(store.get("liam").await, None);
        // Clearing an absent key is a no-op.
        store.clear("liam").await;
    }

    #[tokio::test]
    async fn polling_does_not_consume_the_reply() {
        let store = ReplyStore::new();
        store.store("grace", reply("3")).await;
        assert_eq!(store.get("grace").await.unwrap().text, "3");
        assert_eq!(store.get("grace").await.unwrap().text, "3");
    }

    #[tokio::test]
    async fn pointer_holds_at_most_one_caregiver() {
        let pointer = LastSentPointer::new();
        assert_eq!(pointer.get().await, None);

        pointer.set("grace").await;
        pointer.set("liam").await;
        assert_eq!(pointer.get().await.as_deref(), Some("liam"));
    }

    #[tokio::test]
    async fn only_the_latest_outbound_is_retained() {
        let store = ReplyStore::new();
        assert_eq!(store.last_outbound().await, None);

        store
            .record_outbound(OutboundMessage {
                caregiver_id: "grace".to_string(),
                body: "first".to_string(),
                ts: Utc::now(),
            })
            .await;
        store
            .record_outbound(OutboundMessage {
                caregiver_id: "liam".to_string(),
                body: "second".to_string(),
                ts: Utc::now(),
            })
            .await;

        let last = store.last_outbound().await.expect("outbound recorded");
        assert_eq!(last.caregiver_id, "liam");
        assert_eq!(last.body, "second");
    }
}
