//! Preliminary phase: six fixed facts collected in order.

use super::catalog::{FieldKey, PRELIMINARY_STEPS, PreliminaryStep};
use super::profile::Profile;

/// Canonical names for languages the assistant recognises inside a reply.
const KNOWN_LANGUAGES: [(&str, &str); 4] = [
    ("english", "English"),
    ("spanish", "Spanish"),
    ("french", "French"),
    ("german", "German"),
];

/// The earliest step whose field is still missing, or `None` when the
/// preliminary phase is done.
pub fn next_step(profile: &Profile) -> Option<&'static PreliminaryStep> {
    PRELIMINARY_STEPS.iter().find(|step| !profile.has(step.key))
}

/// The step that follows `key` in the fixed order.
pub fn step_after(key: FieldKey) -> Option<&'static PreliminaryStep> {
    let idx = PRELIMINARY_STEPS.iter().position(|s| s.key == key)?;
    PRELIMINARY_STEPS.get(idx + 1)
}

/// Keys of the preliminary steps already answered, in catalog order.
pub fn completed_steps(profile: &Profile) -> Vec<FieldKey> {
    PRELIMINARY_STEPS
        .iter()
        .filter(|s| profile.has(s.key))
        .map(|s| s.key)
        .collect()
}

/// Minimum-content policy for a preliminary reply.
pub fn meets_minimum(step: &PreliminaryStep, text: &str) -> bool {
    text.trim().chars().count() >= step.min_chars
}

/// The value to store for an accepted reply.
///
/// For the language step, a reply mentioning a known language is stored as
/// that language's canonical name; everything else is stored trimmed.
pub fn normalize(step: &PreliminaryStep, text: &str) -> String {
    let trimmed = text.trim();
    if step.key == FieldKey::Language {
        let lower = trimmed.to_lowercase();
        if let Some((_, canonical)) = KNOWN_LANGUAGES.iter().find(|(k, _)| lower.contains(k)) {
            return (*canonical).to_string();
        }
    }
    trimmed.to_string()
}
