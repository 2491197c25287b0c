//! HTTP endpoints for the intake conversation, speech and reports.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Multipart, State},
    http::{HeaderMap, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use base64::Engine;
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use uuid::Uuid;

use super::catalog::TIERS;
use super::orchestrator::{IntakeOrchestrator, IntakeSnapshot};
use super::profile::Profile;
use super::session::SessionStore;
use crate::error::{Error, IntakeError, SpeechError};
use crate::speech::{
    DEFAULT_AUDIO_FILENAME, DEFAULT_AUDIO_MIME, SPEECH_FORMAT, SpeechToText, TextToSpeech,
};

/// Request/response header carrying the session id.
pub const SESSION_HEADER: &str = "x-session-id";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub orchestrator: Arc<IntakeOrchestrator>,
    pub stt: Arc<dyn SpeechToText>,
    pub tts: Arc<dyn TextToSpeech>,
}

/// Build the Axum router with every intake route.
pub fn intake_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(SESSION_HEADER)]);

    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .route("/api/reset", post(reset))
        .route("/api/progress", get(progress))
        .route("/api/tiers", get(tiers))
        .route("/api/send-report", post(send_report))
        .route("/api/transcribe", post(transcribe))
        .route("/api/tts", post(tts))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state)
}

fn error_json(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({"error": message.into()}))).into_response()
}

fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
}

fn with_session_header(id: Uuid, body: impl IntoResponse) -> Response {
    (
        [(HeaderName::from_static(SESSION_HEADER), id.to_string())],
        body,
    )
        .into_response()
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "intake-assist"
    }))
}

// ── Conversation ────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: String,
}

async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ChatRequest>,
) -> Response {
    if body.message.trim().is_empty() {
        return error_json(StatusCode::BAD_REQUEST, IntakeError::EmptyMessage.to_string());
    }

    let (id, session) = state.sessions.get_or_create(session_id(&headers)).await;
    let mut session = session.lock().await;
    match state.orchestrator.handle_turn(&mut session, &body.message).await {
        Ok(turn) => with_session_header(id, Json(turn)),
        Err(e) => error_json(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

async fn reset(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (id, _) = state.sessions.get_or_create(session_id(&headers)).await;
    state.sessions.reset(id).await;
    with_session_header(
        id,
        Json(serde_json::json!({
            "status": "reset",
            "session_id": id
        })),
    )
}

async fn progress(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = match session_id(&headers) {
        Some(id) => state.sessions.get(id).await,
        None => None,
    };
    let snapshot = match session {
        Some(session) => IntakeSnapshot::of(&session.lock().await.profile),
        None => IntakeSnapshot::of(&Profile::new()),
    };
    Json(snapshot).into_response()
}

async fn tiers() -> impl IntoResponse {
    Json(&TIERS)
}

// ── Reports ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
struct SendReportRequest {
    #[serde(default)]
    email: Option<String>,
}

async fn send_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // The body is optional; without one the profile's address is used.
    let body: SendReportRequest = if body.iter().all(u8::is_ascii_whitespace) {
        SendReportRequest::default()
    } else {
        match serde_json::from_slice(&body) {
            Ok(parsed) => parsed,
            Err(e) => return error_json(StatusCode::BAD_REQUEST, format!("Invalid JSON: {e}")),
        }
    };
    let (id, session) = state.sessions.get_or_create(session_id(&headers)).await;
    let mut session = session.lock().await;

    match state
        .orchestrator
        .send_report_now(&mut session, body.email.as_deref())
        .await
    {
        Ok(address) => with_session_header(
            id,
            Json(serde_json::json!({
                "success": true,
                "message": format!("Report sent successfully to {address}")
            })),
        ),
        Err(Error::Intake(e)) => error_json(StatusCode::BAD_REQUEST, e.to_string()),
        Err(e) => {
            warn!(session_id = %id, error = %e, "Manual report failed");
            error_json(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to send report: {e}"),
            )
        }
    }
}

// ── Speech ──────────────────────────────────────────────────────────────

fn speech_error(e: SpeechError) -> Response {
    match e {
        SpeechError::EmptyInput => error_json(StatusCode::BAD_REQUEST, e.to_string()),
        other => {
            warn!(error = %other, "Speech request failed");
            error_json(StatusCode::BAD_GATEWAY, other.to_string())
        }
    }
}

async fn transcribe(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut audio = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return error_json(StatusCode::BAD_REQUEST, e.to_string()),
        };
        if field.name() != Some("audio") {
            continue;
        }
        let filename = field
            .file_name()
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_AUDIO_FILENAME)
            .to_string();
        let mime = field
            .content_type()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_AUDIO_MIME)
            .to_string();
        match field.bytes().await {
            Ok(bytes) => audio = Some((bytes.to_vec(), filename, mime)),
            Err(e) => return error_json(StatusCode::BAD_REQUEST, e.to_string()),
        }
    }

    let Some((bytes, filename, mime)) = audio else {
        return error_json(StatusCode::BAD_REQUEST, "No audio file provided");
    };
    if bytes.is_empty() {
        return error_json(StatusCode::BAD_REQUEST, "Audio file is empty");
    }

    info!(bytes = bytes.len(), "Transcription requested");
    match state.stt.transcribe(bytes, &filename, &mime).await {
        Ok(text) => Json(serde_json::json!({"text": text})).into_response(),
        Err(e) => speech_error(e),
    }
}

#[derive(Deserialize)]
struct TtsRequest {
    #[serde(default)]
    text: String,
}

async fn tts(State(state): State<AppState>, Json(body): Json<TtsRequest>) -> Response {
    if body.text.trim().is_empty() {
        return error_json(StatusCode::BAD_REQUEST, "Text is required");
    }

    match state.tts.synthesize(&body.text).await {
        Ok(audio) => Json(serde_json::json!({
            "audio": base64::engine::general_purpose::STANDARD.encode(audio),
            "format": SPEECH_FORMAT
        }))
        .into_response(),
        Err(e) => speech_error(e),
    }
}
