//! Structural validation of drafts.
//!
//! Runs entirely on the client and must pass before any request leaves the
//! process. Each field reports at most one violation, the first rule it fails.

use chrono::NaiveDate;

use crate::error::{DraftField, FieldViolation, ValidationError};
use crate::types::SessionNoteDraft;

/// Longest accepted `notes` text, in characters.
pub const MAX_NOTES_CHARS: usize = 500;

/// Longest accepted session, in minutes.
pub const MAX_DURATION_MINUTES: i32 = 300;

/// Accepted `session_date` input format.
pub const SESSION_DATE_FORMAT: &str = "%Y-%m-%d";

/// Check every field of `draft`, collecting all violations.
pub fn validate_draft(draft: &SessionNoteDraft) -> Result<(), ValidationError> {
    let mut violations = Vec::new();

    if draft.client_name.trim().is_empty() {
        violations.push(violation(DraftField::ClientName, "Client name is required"));
    }

    if draft.notes.trim().is_empty() {
        violations.push(violation(DraftField::Notes, "Notes are required"));
    } else if draft.notes.chars().count() > MAX_NOTES_CHARS {
        violations.push(violation(
            DraftField::Notes,
            format!("Notes must not exceed {MAX_NOTES_CHARS} characters"),
        ));
    }

    if draft.duration_minutes <= 0 {
        violations.push(violation(
            DraftField::Duration,
            "Duration must be greater than 0",
        ));
    } else if draft.duration_minutes > MAX_DURATION_MINUTES {
        violations.push(violation(
            DraftField::Duration,
            format!("Duration must not exceed {MAX_DURATION_MINUTES} minutes"),
        ));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

/// Parse a `YYYY-MM-DD` session date from user input.
///
/// Blank input counts as a missing date.
pub fn parse_session_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::single(
            DraftField::SessionDate,
            "Session date is required",
        ));
    }
    NaiveDate::parse_from_str(trimmed, SESSION_DATE_FORMAT).map_err(|_| {
        ValidationError::single(
            DraftField::SessionDate,
            format!("Session date must be a valid YYYY-MM-DD date, got '{trimmed}'"),
        )
    })
}

fn violation(field: DraftField, message: impl Into<String>) -> FieldViolation {
    FieldViolation {
        field,
        message: message.into(),
    }
}
