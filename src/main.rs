use std::sync::Arc;

use anyhow::Context;
use intake_assist::config::{IntakeConfig, ServerConfig};
use intake_assist::intake::{
    AppState, IntakeOrchestrator, SessionStore, intake_routes, spawn_expiry_task,
};
use intake_assist::llm::{LlmConfig, create_provider};
use intake_assist::report::{SmtpConfig, SmtpReportSender};
use intake_assist::speech::{OpenAiSpeech, SpeechConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let llm_config = LlmConfig::from_env().context("LLM configuration")?;
    let intake_config = IntakeConfig::from_env().context("intake configuration")?;
    let server_config = ServerConfig::from_env().context("server configuration")?;
    let smtp_config = SmtpConfig::from_env();

    // Speech always goes through the OpenAI-compatible API.
    let speech_key = std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
        .context("OPENAI_API_KEY must be set for speech")?;
    let speech_config = SpeechConfig::from_env(secrecy::SecretString::from(speech_key));

    eprintln!("Intake Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", llm_config.model);
    eprintln!("   HTTP: http://{}", server_config.addr());
    eprintln!(
        "   Semantic validation: {}",
        if intake_config.semantic_validation { "on" } else { "off" }
    );
    if smtp_config.is_configured() {
        eprintln!("   Reports: SMTP via {}:{}", smtp_config.server, smtp_config.port);
    } else {
        eprintln!("   Reports: disabled (SMTP_USERNAME/SMTP_PASSWORD not set)");
    }

    // ── Collaborators ────────────────────────────────────────────────────
    let llm = create_provider(&llm_config)?;
    let reports = Arc::new(SmtpReportSender::new(smtp_config, intake_config.report_timeout));
    let speech = Arc::new(OpenAiSpeech::new(speech_config));

    // ── Sessions ─────────────────────────────────────────────────────────
    let sessions = Arc::new(SessionStore::new(
        intake_config.history_turns,
        intake_config.session_idle_timeout,
    ));
    let _expiry_handle = spawn_expiry_task(Arc::clone(&sessions));

    // ── HTTP ─────────────────────────────────────────────────────────────
    let state = AppState {
        sessions,
        orchestrator: Arc::new(IntakeOrchestrator::new(llm, reports, &intake_config)),
        stt: speech.clone(),
        tts: speech,
    };
    let app = intake_routes(state);

    let listener = tokio::net::TcpListener::bind(server_config.addr())
        .await
        .with_context(|| format!("Failed to bind {}", server_config.addr()))?;
    tracing::info!(addr = %server_config.addr(), "Intake server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Ctrl+C received, shutting down...");
        })
        .await?;

    Ok(())
}
