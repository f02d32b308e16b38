//! HTTP request handlers

use super::types::{
    AliveResponse, ErrorResponse, HealthResponse, QueuedResponse, StatusResponse, VersionResponse,
};
use super::AppState;
use crate::bridge::payload::UpsertEvent;
use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Probes
        .route("/", get(alive))
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/version", get(version))
        // Inbound messages from the bridge
        .route("/webhook/messages", post(receive_messages))
        .with_state(state)
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ============================================================
// Probes
// ============================================================

async fn alive(State(state): State<AppState>) -> Json<AliveResponse> {
    Json(AliveResponse {
        status: "WhatsApp bot is alive!",
        timestamp: now(),
        sessions: state.store.len().await,
    })
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "WhatsApp bot is running",
        timestamp: now(),
        active_sessions: state.store.len().await,
    })
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let steps = state
        .store
        .step_counts()
        .await
        .into_iter()
        .map(|(step, count)| (step.as_str(), count))
        .collect();

    Json(StatusResponse {
        bot_status: "running",
        active_sessions: state.store.len().await,
        uptime: state.started_at.elapsed().as_secs(),
        timestamp: now(),
        steps,
    })
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============================================================
// Webhook
// ============================================================

async fn receive_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(event): Json<UpsertEvent>,
) -> Result<(StatusCode, Json<QueuedResponse>), AppError> {
    // `fromMe` in the payload grants operator authority
    let provided = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match provided {
        Some(token) if constant_time_eq(token.as_bytes(), state.webhook_token.as_bytes()) => {}
        Some(_) => {
            tracing::warn!("Webhook rejected: bad bearer token");
            return Err(AppError::Unauthorized("Invalid bearer token".to_string()));
        }
        None => {
            tracing::warn!("Webhook rejected: missing bearer token");
            return Err(AppError::Unauthorized("Missing bearer token".to_string()));
        }
    }

    let kind = event.kind.clone();
    let Some(message) = event.into_inbound() else {
        tracing::debug!(kind = %kind, "Dropping event with no live message or sender");
        return Ok((StatusCode::ACCEPTED, Json(QueuedResponse { queued: false })));
    };

    tracing::debug!(sender = %message.sender, "Queueing inbound message");
    state
        .inbound_tx
        .send(message)
        .await
        .map_err(|_| AppError::Unavailable("Dispatcher is not running".to_string()))?;

    Ok((StatusCode::ACCEPTED, Json(QueuedResponse { queued: true })))
}

/// Compare without short-circuiting on the first differing byte
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    Unauthorized(String),
    Unavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
