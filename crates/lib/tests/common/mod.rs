//! Shared helpers for the gateway integration tests: a recording SMS sender
//! and a gateway spawned on a free port.

#![allow(dead_code)]

use async_trait::async_trait;
use lib::channels::{SendError, SmsSender};
use lib::config::Config;
use lib::gateway::{router, GatewayState};
use std::sync::{Arc, Mutex};

pub const DEMO_NUMBER: &str = "+15550009999";

/// Records sends instead of calling Twilio; can be armed to reject the next
/// sends with a provider-style error.
#[derive(Default)]
pub struct RecordingSms {
    sent: Mutex<Vec<(String, String)>>,
    reject_with: Mutex<Option<String>>,
}

impl RecordingSms {
    /// Every send from now on fails with the given provider message.
    pub fn arm_failure(&self, message: &str) {
        *self.reject_with.lock().unwrap() = Some(message.to_string());
    }

    /// All accepted (to, body) pairs, in send order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SmsSender for RecordingSms {
    async fn send(&self, to: &str, body: &str) -> Result<(), SendError> {
        if let Some(message) = self.reject_with.lock().unwrap().clone() {
            return Err(SendError::Provider {
                status: 401,
                message,
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), body.to_string()));
        Ok(())
    }
}

/// Serve the real gateway router on an ephemeral port; returns the base URL.
pub async fn spawn_gateway(sms: Arc<RecordingSms>) -> String {
    let mut config = Config::default();
    config.provider.demo_number = Some(DEMO_NUMBER.to_string());
    let state = GatewayState::new(config, sms);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind free port");
    let addr = listener.local_addr().expect("local_addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{}", addr)
}
