//! Gateway HTTP server: originate sends, receive the provider webhook, and
//! answer reply polling.

use crate::channels::{InboundSms, SmsSender, TwilioClient};
use crate::config::Config;
use crate::fixtures;
use crate::gateway::protocol::{
    Acknowledged, ReplyEnvelope, SendSmsRequest, SendSmsResponse, TrackSentRequest,
};
use crate::reminder;
use crate::store::{LastSentPointer, OutboundMessage, Reply, ReplyStore};
use anyhow::{Context, Result};
use axum::extract::{Form, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

/// Empty TwiML acknowledgement. Twilio treats anything other than a 200 with
/// well-formed TwiML as a webhook failure.
const TWIML_EMPTY: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Response></Response>"#;

/// Shared state for the gateway (config, provider client, reply store,
/// last-sent pointer).
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<Config>,
    pub sms: Arc<dyn SmsSender>,
    pub replies: Arc<ReplyStore>,
    pub last_sent: Arc<LastSentPointer>,
}

impl GatewayState {
    pub fn new(config: Config, sms: Arc<dyn SmsSender>) -> Self {
        Self {
            config: Arc::new(config),
            sms,
            replies: Arc::new(ReplyStore::new()),
            last_sent: Arc::new(LastSentPointer::new()),
        }
    }
}

/// Build the gateway router over the given state.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/send-sms", post(send_sms))
        .route("/api/track-sent", post(track_sent))
        .route("/api/reply/:caregiver_id", get(poll_reply))
        .route("/api/caregivers", get(caregivers))
        .route("/webhook/reply", post(webhook_reply))
        .with_state(state)
}

/// Run the gateway; binds to config.gateway.bind:config.gateway.port and
/// blocks until shutdown (Ctrl+C or SIGTERM).
pub async fn run_gateway(config: Config) -> Result<()> {
    let sms: Arc<dyn SmsSender> = Arc::new(TwilioClient::new(&config.provider));
    let bind_addr = format!("{}:{}", config.gateway.bind, config.gateway.port);
    let state = GatewayState::new(config, sms);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("alden gateway listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server exited")?;
    log::info!("gateway stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received");
}

/// GET / returns a simple health JSON (for probes).
async fn health(State(state): State<GatewayState>) -> Json<serde_json::Value> {
    Json(json!({
        "service": "alden-gateway",
        "runtime": "running",
        "port": state.config.gateway.port,
    }))
}

/// POST /api/send-sms — render the reminder and send it via the provider to
/// the demo inbox. Success clears any stored reply for the caregiver so a
/// stale reply can never satisfy the next poll; failure surfaces the
/// provider's message and leaves prior state untouched.
async fn send_sms(
    State(state): State<GatewayState>,
    Json(req): Json<SendSmsRequest>,
) -> (StatusCode, Json<SendSmsResponse>) {
    let Some(demo_number) = state.config.provider.demo_number.clone() else {
        log::warn!("send requested but DEMO_PHONE_NUMBER is not set");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(SendSmsResponse::failed("demo phone number not configured")),
        );
    };
    let body = reminder::render(&req.caregiver_name, &req.shift_time);
    // Demo constraint: every reminder goes to the one controlled inbox, not
    // the caregiver's real number.
    match state.sms.send(&demo_number, &body).await {
        Ok(()) => {
            state.replies.clear(&req.caregiver_id).await;
            state
                .replies
                .record_outbound(OutboundMessage {
                    caregiver_id: req.caregiver_id.clone(),
                    body,
                    ts: Utc::now(),
                })
                .await;
            log::info!(
                "reminder sent for caregiver {} to {}",
                req.caregiver_id,
                demo_number
            );
            (StatusCode::OK, Json(SendSmsResponse::sent(demo_number)))
        }
        Err(e) => {
            log::warn!("twilio send error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SendSmsResponse::failed(e.to_string())),
            )
        }
    }
}

/// POST /api/track-sent — record which caregiver is about to be texted. Kept
/// separate from the send so the pointer is set regardless of whether the
/// provider call later succeeds; the panel calls this first.
async fn track_sent(
    State(state): State<GatewayState>,
    Json(req): Json<TrackSentRequest>,
) -> Json<Acknowledged> {
    state.last_sent.set(&req.caregiver_id).await;
    Json(Acknowledged::ok())
}

/// GET /api/reply/:caregiver_id — the stored reply or null. Idempotent; the
/// client decides when to stop polling.
async fn poll_reply(
    State(state): State<GatewayState>,
    Path(caregiver_id): Path<String>,
) -> Json<ReplyEnvelope> {
    let reply = state.replies.get(&caregiver_id).await;
    Json(ReplyEnvelope { reply })
}

/// GET /api/caregivers — the static clock-in roster.
async fn caregivers() -> Json<Vec<fixtures::Caregiver>> {
    Json(fixtures::roster().to_vec())
}

/// POST /webhook/reply — provider-originated, fires on any inbound message to
/// the demo number. The payload carries no caregiver identity, so the reply
/// is attributed to the last caregiver texted; with no pointer on record the
/// message is dropped. Always acks with the empty TwiML document, even for a
/// payload that failed to decode.
async fn webhook_reply(
    State(state): State<GatewayState>,
    form: Option<Form<InboundSms>>,
) -> impl IntoResponse {
    let inbound = form.map(|Form(f)| f).unwrap_or_default();
    let text = inbound.body.trim().to_string();
    log::info!("inbound reply from {}: {:?}", inbound.from, text);
    match state.last_sent.get().await {
        Some(caregiver_id) => {
            state
                .replies
                .store(&caregiver_id, Reply { text, ts: Utc::now() })
                .await;
        }
        None => {
            log::debug!("inbound reply with no caregiver on record, dropping");
        }
    }
    ([(header::CONTENT_TYPE, "text/xml")], TWIML_EMPTY)
}
