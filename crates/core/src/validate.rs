//! Field-level validators shared by the entity payloads.
//!
//! Each check names the offending field so the caller can surface it.

use core::fmt::Display;

use crate::error::{DomainError, DomainResult};

/// Require a trimmed string whose length (in characters) lies in `min..=max`.
pub fn text_length(field: &str, value: &str, min: usize, max: usize) -> DomainResult<()> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err(DomainError::validation(field, "is required"));
    }
    if len < min || len > max {
        return Err(DomainError::validation(
            field,
            format!("must be between {min} and {max} characters"),
        ));
    }
    Ok(())
}

/// Require a non-blank string of at most `max` characters.
pub fn required_text(field: &str, value: &str, max: usize) -> DomainResult<()> {
    text_length(field, value, 1, max)
}

/// Require `min <= value <= max`.
pub fn in_range<T>(field: &str, value: T, min: T, max: T) -> DomainResult<()>
where
    T: PartialOrd + Display,
{
    if value < min || value > max {
        return Err(DomainError::validation(
            field,
            format!("must be between {min} and {max} (got {value})"),
        ));
    }
    Ok(())
}

/// Minimal syntactic email check: `local@domain.tld`, no whitespace.
pub fn email(field: &str, value: &str) -> DomainResult<()> {
    let value = value.trim();
    let invalid = || DomainError::validation(field, format!("'{value}' is not a valid email address"));

    if value.is_empty() {
        return Err(DomainError::validation(field, "is required"));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    let mut labels = domain.split('.');
    let valid_domain = domain.contains('.') && labels.all(|label| !label.is_empty());
    if !valid_domain {
        return Err(invalid());
    }
    Ok(())
}
