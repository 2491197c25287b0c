//! Contact address extraction from free text.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
        .expect("email pattern is valid")
});

static STRICT_EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("strict email pattern is valid")
});

/// Find an email address anywhere in `text`.
///
/// The first pattern match wins. Without a match, a message that contains
/// `@`, is longer than five characters and has a `.` after the `@` is taken
/// whole as the address.
pub fn extract_email(text: &str) -> Option<String> {
    if let Some(m) = EMAIL_RE.find(text) {
        return Some(m.as_str().to_string());
    }

    let trimmed = text.trim();
    if trimmed.contains('@') && trimmed.chars().count() > 5 {
        let domain = trimmed.split('@').nth(1).unwrap_or_default();
        if domain.contains('.') {
            return Some(trimmed.to_string());
        }
    }
    None
}

/// Strict check for a manually supplied report recipient.
pub fn is_valid_email(address: &str) -> bool {
    STRICT_EMAIL_RE.is_match(address.trim())
}
