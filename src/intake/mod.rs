//! The conversational intake engine.
//!
//! Pure functions over the static catalog decide what is asked next; the
//! orchestrator applies one turn at a time to a session's profile.

pub mod catalog;
pub mod contact;
pub mod history;
pub mod orchestrator;
pub mod profile;
pub mod progress;
pub mod prompts;
pub mod routes;
pub mod sequencer;
pub mod session;
pub mod traversal;
pub mod validator;

pub use catalog::{FieldKey, PRELIMINARY_STEPS, SECTIONS, TIERS};
pub use orchestrator::{IntakeOrchestrator, IntakeSnapshot, Stage, TurnResponse};
pub use profile::Profile;
pub use routes::{AppState, SESSION_HEADER, intake_routes};
pub use session::{Session, SessionStore, spawn_expiry_task};
pub use validator::{AnswerValidator, RejectReason, Verdict};
