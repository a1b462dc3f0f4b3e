//! Request validation utilities

use crate::error::{H2Error, H2Result};
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Maximum length of a title (projects, threads, reports)
pub const MAX_TITLE_LENGTH: usize = 200;

/// Trimmed value of a required string field, or `Validation(message)`
pub fn require_non_empty(value: Option<&str>, message: &str) -> H2Result<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(H2Error::Validation(message.to_string())),
    }
}

/// Validate a user supplied title
pub fn validate_title(title: &str, what: &str) -> H2Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(H2Error::Validation(format!("{} is required", what)));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(H2Error::Validation(format!(
            "{} must be at most {} characters",
            what, MAX_TITLE_LENGTH
        )));
    }
    Ok(title.to_string())
}

/// Lowercase, trim and check the shape of an email address
pub fn validate_and_normalize_email(email: &str) -> H2Result<String> {
    let email = email.trim().to_lowercase();
    if email.len() > 254 || !EMAIL_REGEX.is_match(&email) {
        return Err(H2Error::Validation("Invalid email format".to_string()));
    }
    Ok(email)
}
