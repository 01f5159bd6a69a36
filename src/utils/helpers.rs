//! Helper functions and utilities
//!
//! Input validation and small formatting helpers shared by the handlers.

use std::sync::OnceLock;

use chrono::NaiveDate;
use rand::{distributions::Alphanumeric, Rng};
use regex::Regex;
use uuid::Uuid;

use crate::utils::errors::{BakeshopError, Result};

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^\+?[0-9 ()\-]{6,20}$").expect("phone pattern is valid"))
}

/// Generate a new UUID v4
pub fn generate_uuid() -> Uuid {
    Uuid::new_v4()
}

/// Require a non-blank string field, returning it trimmed
pub fn require_field(name: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BakeshopError::InvalidInput(format!("{} is required", name)));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional string, mapping blanks to `None`
pub fn optional_field(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Lower-case and validate an email address
pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    if !email_regex().is_match(&email) {
        return Err(BakeshopError::InvalidInput(format!("Invalid email address: {}", email)));
    }
    Ok(email)
}

/// Validate a phone number loosely (digits, spaces, dashes, parentheses, leading +)
pub fn validate_phone(phone: &str) -> Result<String> {
    let phone = phone.trim();
    if !phone_regex().is_match(phone) {
        return Err(BakeshopError::InvalidInput(format!("Invalid phone number: {}", phone)));
    }
    Ok(phone.to_string())
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| BakeshopError::InvalidInput(format!("Invalid date (expected YYYY-MM-DD): {}", value)))
}

/// Truncate text to a maximum length with ellipsis
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Build a storage-safe file name: random prefix plus the sanitized original name
pub fn storage_file_name(original: &str) -> String {
    let prefix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect();

    let sanitized: String = original
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c.to_ascii_lowercase() } else { '_' })
        .collect();
    let sanitized = sanitized.trim_matches('_');

    if sanitized.is_empty() {
        prefix.to_lowercase()
    } else {
        format!("{}_{}", prefix.to_lowercase(), sanitized)
    }
}
