//! Catalog field rules: comment bodies, rating scores, release dates and
//! the scalar movie fields.
//!
//! Every check returns [`CoreError::Validation`] with a message that can be
//! shown to the client as-is.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::CoreError;

/// Maximum length of a comment body, in characters.
pub const COMMENT_MAX_LENGTH: usize = 200;

/// Lowest accepted rating score (inclusive).
pub const RATING_MIN: i32 = 1;

/// Highest accepted rating score (inclusive).
pub const RATING_MAX: i32 = 10;

/// Date-only formats accepted for a release date, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Date-time formats accepted for a release date; only the date part is kept.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Validate a comment body and return it trimmed.
///
/// The body must contain at least one non-whitespace character and be at
/// most [`COMMENT_MAX_LENGTH`] characters long after trimming.
pub fn validate_comment_body(body: &str) -> Result<String, CoreError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Comment must not be empty".into()));
    }
    let len = trimmed.chars().count();
    if len > COMMENT_MAX_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment must be at most {COMMENT_MAX_LENGTH} characters (got {len})"
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate that a rating score lies within `[RATING_MIN, RATING_MAX]`.
pub fn validate_rating_score(score: i32) -> Result<(), CoreError> {
    if (RATING_MIN..=RATING_MAX).contains(&score) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Rating must be between {RATING_MIN} and {RATING_MAX} (got {score})"
        )))
    }
}

/// Parse a client-supplied release date.
///
/// Accepts plain dates (`2010-07-16`, `07/16/2010`, `16.07.2010`), RFC 3339
/// timestamps and naive date-times. Time-of-day information is discarded.
pub fn parse_release_date(raw: &str) -> Result<NaiveDate, CoreError> {
    let raw = raw.trim();

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Ok(date);
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.date_naive());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(ts.date());
        }
    }

    Err(CoreError::Validation(format!(
        "Invalid release date '{raw}'. Expected a date such as 2010-07-16"
    )))
}

/// Validate a movie runtime length (minutes). Negative values are rejected.
pub fn validate_length(length: i32) -> Result<(), CoreError> {
    if length < 0 {
        return Err(CoreError::Validation(format!(
            "Length must not be negative (got {length})"
        )));
    }
    Ok(())
}

/// Return the trimmed value of a required text field, or a validation error
/// naming the field when it is missing or blank.
pub fn require_text<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, CoreError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CoreError::Validation(format!("{field} is required"))),
    }
}

/// Treat blank strings as "not provided" for partial updates.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
