//! Speech collaborators: audio transcription and speech synthesis.
//!
//! Both are stateless and never touch intake state. The bundled
//! implementation talks to any OpenAI-compatible `/audio` API.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::SpeechError;

pub const DEFAULT_AUDIO_FILENAME: &str = "audio.webm";
pub const DEFAULT_AUDIO_MIME: &str = "audio/webm";

/// Audio format produced by synthesis.
pub const SPEECH_FORMAT: &str = "mp3";

/// Turns recorded audio into text.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        filename: &str,
        mime_type: &str,
    ) -> Result<String, SpeechError>;
}

/// Turns text into encoded audio bytes.
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError>;
}

// ── Configuration ───────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SpeechConfig {
    pub base_url: String,
    pub api_key: SecretString,
    pub stt_model: String,
    pub tts_model: String,
    pub voice: String,
}

impl SpeechConfig {
    /// Build from environment variables, authenticating with `api_key`.
    pub fn from_env(api_key: SecretString) -> Self {
        let var = |key: &str, default: &str| {
            std::env::var(key)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            base_url: var("INTAKE_SPEECH_BASE_URL", "https://api.openai.com/v1"),
            api_key,
            stt_model: var("INTAKE_STT_MODEL", "whisper-1"),
            tts_model: var("INTAKE_TTS_MODEL", "tts-1"),
            voice: var("INTAKE_TTS_VOICE", "alloy"),
        }
    }
}

// ── OpenAI-compatible client ────────────────────────────────────────

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'a str,
}

pub struct OpenAiSpeech {
    client: reqwest::Client,
    config: SpeechConfig,
}

impl OpenAiSpeech {
    pub fn new(config: SpeechConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, SpeechError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(SpeechError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl SpeechToText for OpenAiSpeech {
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        filename: &str,
        mime_type: &str,
    ) -> Result<String, SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::EmptyInput);
        }
        debug!(bytes = audio.len(), mime_type, "Transcribing audio");

        let part = Part::bytes(audio)
            .file_name(filename.to_string())
            .mime_str(mime_type)
            .map_err(|e| SpeechError::RequestFailed(format!("invalid mime type: {e}")))?;
        let form = Form::new()
            .text("model", self.config.stt_model.clone())
            .part("file", part);

        let resp = self
            .client
            .post(self.endpoint("audio/transcriptions"))
            .bearer_auth(self.config.api_key.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(|e| SpeechError::RequestFailed(e.to_string()))?;

        let parsed: TranscriptionResponse = Self::check(resp)
            .await?
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(e.to_string()))?;

        info!(chars = parsed.text.chars().count(), "Audio transcribed");
        Ok(parsed.text)
    }
}

#[async_trait]
impl TextToSpeech for OpenAiSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SpeechError::EmptyInput);
        }

        let body = SpeechRequest {
            model: &self.config.tts_model,
            voice: &self.config.voice,
            input: text,
            response_format: SPEECH_FORMAT,
        };

        let resp = self
            .client
            .post(self.endpoint("audio/speech"))
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechError::RequestFailed(e.to_string()))?;

        let audio = Self::check(resp)
            .await?
            .bytes()
            .await
            .map_err(|e| SpeechError::InvalidResponse(e.to_string()))?;

        if audio.is_empty() {
            return Err(SpeechError::InvalidResponse("empty audio body".to_string()));
        }
        info!(bytes = audio.len(), "Speech synthesized");
        Ok(audio.to_vec())
    }
}
