//! Conversation panel: client-side state machine over the gateway API.
//!
//! `ready → sending → waiting → replied`, with `sending → ready` on a failed
//! send. While `waiting`, a fixed-interval poll loop queries the gateway for
//! the caregiver's reply; the loop stops on the first reply and must never
//! outlive the panel (closing or dropping the panel cancels it).

use crate::gateway::{ReplyEnvelope, SendSmsRequest, SendSmsResponse, TrackSentRequest};
use crate::reminder;
use crate::store::Reply;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// How often the panel re-polls the gateway while waiting for a reply.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Typed HTTP client for the gateway's panel-facing API.
#[derive(Clone)]
pub struct GatewayClient {
    base_url: String,
    http: reqwest::Client,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// POST /api/track-sent — tell the gateway who is about to be texted.
    pub async fn track_sent(&self, caregiver_id: &str) -> Result<(), String> {
        let url = format!("{}/api/track-sent", self.base_url);
        let res = self
            .http
            .post(&url)
            .json(&TrackSentRequest {
                caregiver_id: caregiver_id.to_string(),
            })
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !res.status().is_success() {
            return Err(format!("track-sent failed: {}", res.status()));
        }
        Ok(())
    }

    /// POST /api/send-sms — originate the reminder. Returns the number it was
    /// sent to, or the gateway's error message.
    pub async fn send_sms(
        &self,
        caregiver_id: &str,
        caregiver_name: &str,
        shift_time: &str,
    ) -> Result<String, String> {
        let url = format!("{}/api/send-sms", self.base_url);
        let res = self
            .http
            .post(&url)
            .json(&SendSmsRequest {
                caregiver_id: caregiver_id.to_string(),
                caregiver_name: caregiver_name.to_string(),
                shift_time: shift_time.to_string(),
            })
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let body: SendSmsResponse = res.json().await.map_err(|e| e.to_string())?;
        if !body.ok {
            return Err(body.error.unwrap_or_else(|| "send failed".to_string()));
        }
        Ok(body.sent_to.unwrap_or_default())
    }

    /// GET /api/reply/:caregiverId — the stored reply, or None while waiting.
    pub async fn poll_reply(&self, caregiver_id: &str) -> Result<Option<Reply>, String> {
        let url = format!("{}/api/reply/{}", self.base_url, caregiver_id);
        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !res.status().is_success() {
            return Err(format!("poll failed: {}", res.status()));
        }
        let body: ReplyEnvelope = res.json().await.map_err(|e| e.to_string())?;
        Ok(body.reply)
    }
}

/// Panel lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPhase {
    Ready,
    Sending,
    Waiting,
    Replied,
}

/// Who a transcript entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Us,
    Them,
}

/// One visible message in the panel.
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
    pub ts: DateTime<Utc>,
}

struct PanelShared {
    client: GatewayClient,
    caregiver_id: String,
    caregiver_name: String,
    shift_time: String,
    phase: Mutex<PanelPhase>,
    transcript: Mutex<Vec<TranscriptEntry>>,
    /// Cleared on reply and on close; the poll loop checks it before every
    /// request so no poll is issued after teardown.
    polling: AtomicBool,
}

impl PanelShared {
    fn set_phase(&self, phase: PanelPhase) {
        if let Ok(mut g) = self.phase.lock() {
            *g = phase;
        }
    }

    fn push_entry(&self, speaker: Speaker, text: String, ts: DateTime<Utc>) {
        if let Ok(mut g) = self.transcript.lock() {
            g.push(TranscriptEntry { speaker, text, ts });
        }
    }
}

/// A single open conversation with one caregiver. Holds no authority over the
/// gateway's last-sent pointer: opening a second panel and sending while this
/// one is waiting silently redirects the next inbound reply to the newer
/// caregiver (the documented single-conversation limitation).
pub struct Panel {
    shared: Arc<PanelShared>,
    poll_interval: Duration,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

impl Panel {
    pub fn open(
        client: GatewayClient,
        caregiver_id: impl Into<String>,
        caregiver_name: impl Into<String>,
        shift_time: impl Into<String>,
    ) -> Self {
        Self {
            shared: Arc::new(PanelShared {
                client,
                caregiver_id: caregiver_id.into(),
                caregiver_name: caregiver_name.into(),
                shift_time: shift_time.into(),
                phase: Mutex::new(PanelPhase::Ready),
                transcript: Mutex::new(Vec::new()),
                polling: AtomicBool::new(false),
            }),
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_task: Mutex::new(None),
        }
    }

    /// Override the poll period (tests use a short one).
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn phase(&self) -> PanelPhase {
        self.shared
            .phase
            .lock()
            .map(|g| *g)
            .unwrap_or(PanelPhase::Ready)
    }

    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.shared
            .transcript
            .lock()
            .map(|g| g.clone())
            .unwrap_or_default()
    }

    /// Originate the reminder: track-sent, then send. On success the outbound
    /// body joins the transcript, the panel enters `waiting`, and the poll
    /// loop starts; the returned receiver resolves with the caregiver's
    /// reply. On failure the panel returns to `ready` with the error surfaced
    /// to the caller and the transcript untouched.
    pub async fn send(&self) -> Result<oneshot::Receiver<Reply>, String> {
        self.shared.set_phase(PanelPhase::Sending);

        if let Err(e) = self.shared.client.track_sent(&self.shared.caregiver_id).await {
            self.shared.set_phase(PanelPhase::Ready);
            return Err(e);
        }
        if let Err(e) = self
            .shared
            .client
            .send_sms(
                &self.shared.caregiver_id,
                &self.shared.caregiver_name,
                &self.shared.shift_time,
            )
            .await
        {
            self.shared.set_phase(PanelPhase::Ready);
            return Err(e);
        }

        let body = reminder::render(&self.shared.caregiver_name, &self.shared.shift_time);
        self.shared.push_entry(Speaker::Us, body, Utc::now());
        self.shared.set_phase(PanelPhase::Waiting);

        let (tx, rx) = oneshot::channel();
        self.shared.polling.store(true, Ordering::SeqCst);
        let shared = self.shared.clone();
        let interval = self.poll_interval;
        let handle = tokio::spawn(async move {
            run_poll_loop(shared, interval, tx).await;
        });
        if let Ok(mut g) = self.poll_task.lock() {
            *g = Some(handle);
        }
        Ok(rx)
    }

    /// Tear the panel down: stop the poll loop immediately. Safe to call more
    /// than once; also runs on drop so an abandoned panel cannot leak a
    /// recurring timer.
    pub fn close(&self) {
        self.shared.polling.store(false, Ordering::SeqCst);
        if let Ok(mut g) = self.poll_task.lock() {
            if let Some(handle) = g.take() {
                handle.abort();
            }
        }
    }
}

impl Drop for Panel {
    fn drop(&mut self) {
        self.close();
    }
}

async fn run_poll_loop(
    shared: Arc<PanelShared>,
    interval: Duration,
    tx: oneshot::Sender<Reply>,
) {
    loop {
        tokio::time::sleep(interval).await;
        if !shared.polling.load(Ordering::SeqCst) {
            return;
        }
        match shared.client.poll_reply(&shared.caregiver_id).await {
            Ok(Some(reply)) => {
                shared.polling.store(false, Ordering::SeqCst);
                shared.push_entry(Speaker::Them, reply.text.clone(), reply.ts);
                shared.set_phase(PanelPhase::Replied);
                let _ = tx.send(reply);
                return;
            }
            Ok(None) => {}
            Err(e) => {
                // Transient poll failures keep the loop alive; the next tick retries.
                log::debug!("panel poll failed: {}", e);
            }
        }
    }
}
