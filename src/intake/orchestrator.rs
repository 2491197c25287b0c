//! Per-turn driver for the intake conversation.
//!
//! A turn resolves the active question from the profile, validates the reply,
//! stores it, picks up any email address, recomputes progress, fires the
//! one-time report and finally asks the model for the next assistant message.
//! The caller holds the session lock for the whole turn.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::catalog::{FieldKey, PreliminaryStep, TIERS, Tier};
use super::contact;
use super::profile::Profile;
use super::progress;
use super::prompts::{self, ReplyOutcome};
use super::sequencer;
use super::session::Session;
use super::traversal::{self, ActiveQuestion, SectionProgress};
use super::validator::{AnswerValidator, Verdict};
use crate::config::IntakeConfig;
use crate::error::{Error, IntakeError, ReportError};
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider, complete_with_timeout};
use crate::report::ReportSender;

const COMPLETION_TEMPERATURE: f32 = 0.7;
const COMPLETION_MAX_TOKENS: u32 = 200;

/// Shown to the user when the model cannot produce a reply.
pub const APOLOGY: &str = "I apologize, but I encountered an error. Please try again.";

/// Where the conversation stands, derived from the profile alone.
#[derive(Debug, Clone, Copy)]
pub enum Stage {
    Preliminary(&'static PreliminaryStep),
    Questionnaire(ActiveQuestion),
    Complete,
}

impl Stage {
    pub fn resolve(profile: &Profile) -> Self {
        if let Some(step) = sequencer::next_step(profile) {
            return Self::Preliminary(step);
        }
        match traversal::current_question(profile) {
            Some(active) => Self::Questionnaire(active),
            None => Self::Complete,
        }
    }

    /// The field an answer at this stage would fill.
    pub fn field(&self) -> Option<FieldKey> {
        match self {
            Self::Preliminary(step) => Some(step.key),
            Self::Questionnaire(active) => Some(active.question.key),
            Self::Complete => None,
        }
    }
}

/// Derived view of a profile. Recomputed from scratch on every request.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeSnapshot {
    pub completed_steps: Vec<FieldKey>,
    pub business_plan_progress: Vec<SectionProgress>,
    pub initial_form_complete: bool,
    pub form_data: Profile,
    pub email_collected: bool,
    pub points: u32,
    /// Id of the highest tier reached.
    pub current_tier: &'static str,
    pub tiers: &'static [Tier],
}

impl IntakeSnapshot {
    pub fn of(profile: &Profile) -> Self {
        let points = progress::points(profile);
        Self {
            completed_steps: sequencer::completed_steps(profile),
            business_plan_progress: traversal::progress(profile),
            initial_form_complete: profile.preliminary_complete(),
            form_data: profile.clone(),
            email_collected: profile.email().is_some(),
            points,
            current_tier: progress::tier(points).id,
            tiers: &TIERS,
        }
    }
}

/// Result of one turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnResponse {
    pub session_id: Uuid,
    pub response: String,
    #[serde(flatten)]
    pub snapshot: IntakeSnapshot,
    /// True only on the turn that dispatched the report.
    pub report_sent: bool,
    /// `None` when there was no open question to answer.
    #[serde(skip)]
    pub verdict: Option<Verdict>,
    pub validation: Option<&'static str>,
    pub llm_degraded: bool,
}

pub struct IntakeOrchestrator {
    llm: Arc<dyn LlmProvider>,
    validator: AnswerValidator,
    reports: Arc<dyn ReportSender>,
    llm_timeout: Duration,
    report_timeout: Duration,
}

impl IntakeOrchestrator {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        reports: Arc<dyn ReportSender>,
        config: &IntakeConfig,
    ) -> Self {
        let validator = if config.semantic_validation {
            AnswerValidator::new(Arc::clone(&llm), config.llm_timeout)
        } else {
            AnswerValidator::heuristic_only()
        };
        Self {
            llm,
            validator,
            reports,
            llm_timeout: config.llm_timeout,
            report_timeout: config.report_timeout,
        }
    }

    /// Process one user message against `session`.
    pub async fn handle_turn(
        &self,
        session: &mut Session,
        message: &str,
    ) -> Result<TurnResponse, IntakeError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(IntakeError::EmptyMessage);
        }
        session.touch();
        let session_id = session.id;
        debug!(session_id = %session_id, chars = message.chars().count(), "Turn received");

        // Resolve, validate, store.
        let stage = Stage::resolve(&session.profile);
        let verdict = match &stage {
            Stage::Preliminary(step) => Some(self.validator.validate_step(step, message)),
            Stage::Questionnaire(active) => {
                Some(self.validator.validate(message, active.question).await)
            }
            Stage::Complete => None,
        };

        let outcome = match (stage.field(), verdict) {
            (Some(field), Some(v)) if v.is_accepted() => {
                let value = match &stage {
                    Stage::Preliminary(step) => sequencer::normalize(step, message),
                    _ => message.to_string(),
                };
                if session.profile.set(field, value) {
                    info!(
                        session_id = %session_id,
                        field = %field,
                        validation = v.label(),
                        "Answer stored"
                    );
                }
                if field == FieldKey::Location && session.profile.preliminary_complete() {
                    info!(session_id = %session_id, "Initial form complete");
                }
                ReplyOutcome::Stored(field)
            }
            (Some(field), Some(v)) => {
                debug!(session_id = %session_id, field = %field, ?v, "Answer rejected");
                ReplyOutcome::Rejected
            }
            _ => ReplyOutcome::Unanswerable,
        };

        // Contact address, independent of validation.
        if let Some(email) = contact::extract_email(message) {
            if session.profile.set_email_if_empty(email) {
                info!(session_id = %session_id, "Email collected");
            }
        }

        let report_sent = self.maybe_send_report(session).await;

        // Projections see every write of this turn, report flag included.
        let snapshot = IntakeSnapshot::of(&session.profile);

        // Next assistant message.
        let next = Stage::resolve(&session.profile);
        let system = prompts::system_prompt(&next, &session.profile, outcome);
        let (response, llm_degraded) = self.complete(session, system, message).await;

        Ok(TurnResponse {
            session_id,
            response,
            snapshot,
            report_sent,
            verdict,
            validation: verdict.map(|v| v.label()),
            llm_degraded,
        })
    }

    /// Fire the report if everything is collected and it has not gone out
    /// yet. Returns whether it was sent on this call.
    async fn maybe_send_report(&self, session: &mut Session) -> bool {
        let profile = &session.profile;
        if profile.report_sent()
            || !profile.preliminary_complete()
            || !traversal::is_complete(profile)
        {
            return false;
        }
        let Some(recipient) = profile.email().map(str::to_string) else {
            return false;
        };
        // The stored address is write-once, so a malformed one blocks the
        // automatic report for the rest of the session.
        if !contact::is_valid_email(&recipient) {
            warn!(
                session_id = %session.id,
                email = %recipient,
                "Stored email is not a deliverable address, report not sent"
            );
            return false;
        }

        let snapshot = profile.clone();
        match self.dispatch(&recipient, &snapshot).await {
            Ok(()) => {
                session.profile.mark_report_sent();
                info!(session_id = %session.id, "Report sent");
                true
            }
            Err(e) => {
                warn!(session_id = %session.id, error = %e, "Report dispatch failed");
                false
            }
        }
    }

    async fn dispatch(&self, recipient: &str, profile: &Profile) -> Result<(), ReportError> {
        let send = self.reports.send(recipient, profile);
        match tokio::time::timeout(self.report_timeout, send).await {
            Ok(result) => result,
            Err(_) => Err(ReportError::Timeout(self.report_timeout)),
        }
    }

    /// Ask the model for the next reply. Failures become the apology text.
    async fn complete(
        &self,
        session: &mut Session,
        system: String,
        message: &str,
    ) -> (String, bool) {
        let mut messages = Vec::with_capacity(session.history.len() + 2);
        messages.push(ChatMessage::system(system));
        messages.extend(session.history.messages());
        messages.push(ChatMessage::user(message));

        let request = CompletionRequest::new(messages)
            .with_temperature(COMPLETION_TEMPERATURE)
            .with_max_tokens(COMPLETION_MAX_TOKENS);

        match complete_with_timeout(self.llm.as_ref(), request, self.llm_timeout).await {
            Ok(resp) => {
                let reply = resp.content.trim().to_string();
                session.history.record_exchange(message, &reply);
                debug!(
                    session_id = %session.id,
                    input_tokens = resp.input_tokens,
                    output_tokens = resp.output_tokens,
                    "Completion received"
                );
                (reply, false)
            }
            Err(e) => {
                warn!(session_id = %session.id, error = %e, "Completion failed");
                (APOLOGY.to_string(), true)
            }
        }
    }

    /// Send the report on request, to `email` or to the profile's address.
    ///
    /// The address is checked before dispatch. On success it is stored as the
    /// profile email if none was set. The automatic `report_sent` flag is not
    /// touched. Returns the address used.
    pub async fn send_report_now(
        &self,
        session: &mut Session,
        email: Option<&str>,
    ) -> Result<String, Error> {
        session.touch();
        let recipient = match email.map(str::trim).filter(|e| !e.is_empty()) {
            Some(address) => address.to_string(),
            None => session
                .profile
                .email()
                .map(str::to_string)
                .ok_or(IntakeError::MissingEmail)?,
        };
        if !contact::is_valid_email(&recipient) {
            return Err(IntakeError::InvalidEmail(recipient).into());
        }

        let snapshot = session.profile.with_email(&recipient);
        self.dispatch(&recipient, &snapshot).await?;
        session.profile.set_email_if_empty(recipient.as_str());
        info!(session_id = %session.id, "Report sent on request");
        Ok(recipient)
    }
}
