//! Summary report for a finished intake: rendering and delivery.

mod render;
mod smtp;

pub use render::{REPORT_SUBJECT, render_report};
pub use smtp::{SmtpConfig, SmtpReportSender};

use async_trait::async_trait;

use crate::error::ReportError;
use crate::intake::Profile;

/// Delivers a rendered report for a profile snapshot.
#[async_trait]
pub trait ReportSender: Send + Sync {
    /// Send the report for `profile` to `recipient`.
    async fn send(&self, recipient: &str, profile: &Profile) -> Result<(), ReportError>;
}
