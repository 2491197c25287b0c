//! Integration tests for the intake HTTP surface.
//!
//! Each test spins up an Axum server on a random port with stub
//! collaborators and drives the real JSON contract over reqwest.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use intake_assist::config::IntakeConfig;
use intake_assist::error::{LlmError, ReportError, SpeechError};
use intake_assist::intake::{
    AppState, FieldKey, IntakeOrchestrator, Profile, SESSION_HEADER, SessionStore, intake_routes,
};
use intake_assist::llm::{CompletionRequest, CompletionResponse, LlmProvider};
use intake_assist::report::ReportSender;
use intake_assist::speech::{SpeechToText, TextToSpeech};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Stub LLM: approves every answer and replies with a fixed line.
struct StubLlm;

#[async_trait]
impl LlmProvider for StubLlm {
    fn model_name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let validating = request
            .system_prompt()
            .is_some_and(|p| p.starts_with("You are validating"));
        Ok(CompletionResponse {
            content: if validating { "YES" } else { "stub reply" }.to_string(),
            input_tokens: 0,
            output_tokens: 0,
        })
    }
}

#[derive(Default)]
struct RecordingReports {
    sent: Mutex<Vec<(String, Option<String>)>>,
}

#[async_trait]
impl ReportSender for RecordingReports {
    async fn send(&self, recipient: &str, profile: &Profile) -> Result<(), ReportError> {
        self.sent.lock().unwrap().push((
            recipient.to_string(),
            profile.get(FieldKey::CompanyName).map(str::to_string),
        ));
        Ok(())
    }
}

struct StubSpeech;

#[async_trait]
impl SpeechToText for StubSpeech {
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        filename: &str,
        mime_type: &str,
    ) -> Result<String, SpeechError> {
        Ok(format!("{} bytes from {filename} ({mime_type})", audio.len()))
    }
}

#[async_trait]
impl TextToSpeech for StubSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        Ok(text.as_bytes().to_vec())
    }
}

/// Start an Axum server on a random port, return (base url, reports).
async fn start_server() -> (String, Arc<RecordingReports>) {
    let config = IntakeConfig::default();
    let reports = Arc::new(RecordingReports::default());
    let speech = Arc::new(StubSpeech);
    let state = AppState {
        sessions: Arc::new(SessionStore::new(config.history_turns, config.session_idle_timeout)),
        orchestrator: Arc::new(IntakeOrchestrator::new(
            Arc::new(StubLlm),
            reports.clone(),
            &config,
        )),
        stt: speech.clone(),
        tts: speech,
    };
    let app = intake_routes(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    (format!("http://127.0.0.1:{port}"), reports)
}

/// POST a chat message, returning (status, session header, body).
async fn chat(
    client: &reqwest::Client,
    base: &str,
    session: Option<&str>,
    message: &str,
) -> (u16, Option<String>, Value) {
    let mut req = client
        .post(format!("{base}/api/chat"))
        .json(&json!({"message": message}));
    if let Some(id) = session {
        req = req.header(SESSION_HEADER, id);
    }
    let resp = req.send().await.unwrap();
    let status = resp.status().as_u16();
    let header = resp
        .headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    (status, header, resp.json().await.unwrap())
}

#[tokio::test]
async fn health_and_tiers() {
    timeout(TEST_TIMEOUT, async {
        let (base, _) = start_server().await;
        let client = reqwest::Client::new();

        let health: Value = client
            .get(format!("{base}/health"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health["status"], "ok");

        let tiers: Value = client
            .get(format!("{base}/api/tiers"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let tiers = tiers.as_array().unwrap();
        assert_eq!(tiers.len(), 5);
        assert_eq!(tiers[0]["points_required"], 0);
        assert_eq!(tiers[4]["id"], "master_entrepreneur");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn empty_message_is_bad_request() {
    timeout(TEST_TIMEOUT, async {
        let (base, _) = start_server().await;
        let client = reqwest::Client::new();
        let (status, _, body) = chat(&client, &base, None, "   ").await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Message is required");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn preliminary_flow_over_http() {
    timeout(TEST_TIMEOUT, async {
        let (base, _) = start_server().await;
        let client = reqwest::Client::new();

        let (status, header, body) = chat(&client, &base, None, "Acme Bakery").await;
        assert_eq!(status, 200);
        let session = body["session_id"].as_str().unwrap().to_string();
        assert_eq!(header.as_deref(), Some(session.as_str()));
        assert_eq!(body["response"], "stub reply");
        assert_eq!(body["points"], 1);
        assert_eq!(body["validation"], "accepted");
        assert_eq!(body["llm_degraded"], false);

        for answer in ["Spanish", "Retail", "High school", "3"] {
            let (status, _, _) = chat(&client, &base, Some(&session), answer).await;
            assert_eq!(status, 200);
        }
        let (_, _, body) = chat(&client, &base, Some(&session), "Madrid").await;
        assert_eq!(body["points"], 6);
        assert_eq!(body["initial_form_complete"], true);
        assert_eq!(body["current_tier"], "growing_entrepreneur");
        assert_eq!(body["completed_steps"].as_array().unwrap().len(), 6);
        assert_eq!(body["form_data"]["location"], "Madrid");

        let progress: Value = client
            .get(format!("{base}/api/progress"))
            .header(SESSION_HEADER, &session)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(progress["points"], 6);
        assert_eq!(progress["current_tier"], "growing_entrepreneur");
        assert_eq!(progress["business_plan_progress"][0]["core_total"], 6);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn sessions_are_isolated_and_resettable() {
    timeout(TEST_TIMEOUT, async {
        let (base, _) = start_server().await;
        let client = reqwest::Client::new();

        let (_, _, a) = chat(&client, &base, None, "Acme Bakery").await;
        let (_, _, b) = chat(&client, &base, None, "Globex").await;
        let a = a["session_id"].as_str().unwrap().to_string();
        let b = b["session_id"].as_str().unwrap().to_string();
        assert_ne!(a, b);

        let (_, _, body) = chat(&client, &base, Some(&a), "English").await;
        assert_eq!(body["form_data"]["company_name"], "Acme Bakery");
        assert_eq!(body["points"], 2);

        let reset: Value = client
            .post(format!("{base}/api/reset"))
            .header(SESSION_HEADER, &a)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(reset["status"], "reset");

        let (_, _, body) = chat(&client, &base, Some(&b), "French").await;
        assert_eq!(body["form_data"]["company_name"], "Globex");
        assert_eq!(body["form_data"]["language"], "French");

        let (_, _, body) = chat(&client, &base, Some(&a), "Initech").await;
        assert_eq!(body["points"], 1);
        assert_eq!(body["form_data"]["company_name"], "Initech");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn manual_report_validates_address() {
    timeout(TEST_TIMEOUT, async {
        let (base, reports) = start_server().await;
        let client = reqwest::Client::new();
        let (_, _, body) = chat(&client, &base, None, "Acme Bakery").await;
        let session = body["session_id"].as_str().unwrap().to_string();

        let resp = client
            .post(format!("{base}/api/send-report"))
            .header(SESSION_HEADER, &session)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 400);

        let resp = client
            .post(format!("{base}/api/send-report"))
            .header(SESSION_HEADER, &session)
            .json(&json!({"email": "not-an-email"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "Invalid email address format.");
        assert!(reports.sent.lock().unwrap().is_empty());

        let resp = client
            .post(format!("{base}/api/send-report"))
            .header(SESSION_HEADER, &session)
            .json(&json!({"email": "owner@acme.com"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["success"], true);

        let sent = reports.sent.lock().unwrap().clone();
        assert_eq!(
            sent,
            vec![("owner@acme.com".to_string(), Some("Acme Bakery".to_string()))]
        );
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn speech_endpoints() {
    timeout(TEST_TIMEOUT, async {
        let (base, _) = start_server().await;
        let client = reqwest::Client::new();

        let form = reqwest::multipart::Form::new()
            .part("audio", reqwest::multipart::Part::bytes(vec![1u8, 2, 3, 4]));
        let body: Value = client
            .post(format!("{base}/api/transcribe"))
            .multipart(form)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["text"], "4 bytes from audio.webm (audio/webm)");

        let resp = client
            .post(format!("{base}/api/transcribe"))
            .multipart(reqwest::multipart::Form::new().text("other", "x"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 400);

        let body: Value = client
            .post(format!("{base}/api/tts"))
            .json(&json!({"text": "hi"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["audio"], "aGk=");
        assert_eq!(body["format"], "mp3");

        let resp = client
            .post(format!("{base}/api/tts"))
            .json(&json!({"text": ""}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 400);
    })
    .await
    .expect("test timed out");
}
