//! Intake Assist: a conversational business intake service.

pub mod config;
pub mod error;
pub mod intake;
pub mod llm;
pub mod report;
pub mod speech;
