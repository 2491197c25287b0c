//! Configuration types.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::intake::history::DEFAULT_HISTORY_LEN;

/// Intake engine configuration.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Number of history entries passed to the model as context.
    pub history_turns: usize,
    /// Deadline for each completion or validation call.
    pub llm_timeout: Duration,
    /// Deadline for dispatching a report.
    pub report_timeout: Duration,
    /// Whether questionnaire answers get the model-backed semantic check.
    pub semantic_validation: bool,
    /// Sessions idle for longer than this are pruned.
    pub session_idle_timeout: Duration,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            history_turns: DEFAULT_HISTORY_LEN,
            llm_timeout: Duration::from_secs(30),
            report_timeout: Duration::from_secs(30),
            semantic_validation: true,
            session_idle_timeout: Duration::from_secs(2 * 60 * 60), // 2 hours
        }
    }
}

impl IntakeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            history_turns: env_or("INTAKE_HISTORY_TURNS", defaults.history_turns)?,
            llm_timeout: Duration::from_secs(env_or(
                "INTAKE_LLM_TIMEOUT_SECS",
                defaults.llm_timeout.as_secs(),
            )?),
            report_timeout: Duration::from_secs(env_or(
                "INTAKE_REPORT_TIMEOUT_SECS",
                defaults.report_timeout.as_secs(),
            )?),
            semantic_validation: env_flag(
                "INTAKE_SEMANTIC_VALIDATION",
                defaults.semantic_validation,
            )?,
            session_idle_timeout: minutes(
                "INTAKE_SESSION_IDLE_MINUTES",
                env_or(
                    "INTAKE_SESSION_IDLE_MINUTES",
                    defaults.session_idle_timeout.as_secs() / 60,
                )?,
            )?,
        })
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 5001,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            bind: env_or("INTAKE_BIND", defaults.bind)?,
            port: env_or("INTAKE_PORT", defaults.port)?,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

/// Read `key` and parse it, falling back to `default` when unset or blank.
pub(crate) fn env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => parse_value(key, &raw),
        _ => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn minutes(key: &str, minutes: u64) -> Result<Duration, ConfigError> {
    minutes
        .checked_mul(60)
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{minutes} minutes is out of range"),
        })
}

fn env_flag(key: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => parse_flag(key, &raw),
        _ => Ok(default),
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got '{other}'"),
        }),
    }
}
