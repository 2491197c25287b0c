//! Per-session profile: the accumulated answers plus contact and report state.

use std::collections::BTreeMap;

use serde::Serialize;

use super::catalog::{FieldKey, PRELIMINARY_STEPS};

/// Answers collected for one session.
///
/// Keys are restricted to [`FieldKey`], so only fields known to the catalog
/// can be stored. Each field is written at most once until [`Profile::clear`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Profile {
    #[serde(flatten)]
    answers: BTreeMap<FieldKey, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    report_sent: bool,
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored answer for `key`, if any.
    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.answers.get(&key).map(String::as_str)
    }

    pub fn has(&self, key: FieldKey) -> bool {
        self.answers.contains_key(&key)
    }

    /// Store an answer. Returns `false` (and leaves the profile untouched)
    /// when the field is already answered or the value is blank.
    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.trim().is_empty() || self.has(key) {
            return false;
        }
        self.answers.insert(key, value);
        true
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Store the contact address unless one is already present.
    pub fn set_email_if_empty(&mut self, email: impl Into<String>) -> bool {
        if self.email.is_some() {
            return false;
        }
        let email = email.into();
        if email.trim().is_empty() {
            return false;
        }
        self.email = Some(email);
        true
    }

    /// A copy addressed to `email`, for rendering a report sent there.
    pub fn with_email(&self, email: &str) -> Profile {
        Profile {
            email: Some(email.to_string()),
            ..self.clone()
        }
    }

    pub fn report_sent(&self) -> bool {
        self.report_sent
    }

    pub fn mark_report_sent(&mut self) {
        self.report_sent = true;
    }

    /// Whether all six preliminary facts are present.
    pub fn preliminary_complete(&self) -> bool {
        PRELIMINARY_STEPS.iter().all(|s| self.has(s.key))
    }

    /// Answered fields in key order.
    pub fn answers(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.answers.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Number of answered fields (email excluded).
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty() && self.email.is_none()
    }

    /// Drop every answer, the email and the report flag.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
