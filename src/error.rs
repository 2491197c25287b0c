//! Error types for Intake Assist.

use std::time::Duration;

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),

    #[error("Intake error: {0}")]
    Intake(#[from] IntakeError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Provider {provider} timed out after {timeout:?}")]
    Timeout { provider: String, timeout: Duration },
}

/// Report generation and dispatch errors.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Report sender is not configured (missing SMTP credentials)")]
    NotConfigured,

    #[error("Profile has no recipient email address")]
    MissingRecipient,

    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build report email: {0}")]
    Build(String),

    #[error("SMTP send failed: {0}")]
    SendFailed(String),

    #[error("Report dispatch timed out after {0:?}")]
    Timeout(Duration),
}

/// Speech-to-text and text-to-speech errors.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("Speech request failed: {0}")]
    RequestFailed(String),

    #[error("Speech API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid speech response: {0}")]
    InvalidResponse(String),

    #[error("Empty speech input")]
    EmptyInput,
}

/// Errors scoped to a single intake request.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("Message is required")]
    EmptyMessage,

    #[error("Invalid email address format.")]
    InvalidEmail(String),

    #[error("Email address is required. Please provide your email first.")]
    MissingEmail,
}

