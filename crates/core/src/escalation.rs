//! Escalation eligibility and audit-comment formatting.
//!
//! Two paths move an issue to `escalated`: a manual request by the filing
//! citizen (any time while `created` or `in_progress`), and a category
//! timeout that only opens once the category's waiting period has elapsed
//! since the issue was filed.

use crate::error::CoreError;
use crate::types::Timestamp;

/// Waiting period used when a category does not configure one.
pub const DEFAULT_ESCALATE_AFTER_HOURS: i32 = 72;

/// Minimum length of the explanatory note on a manual escalation (characters).
pub const MIN_NOTE_LENGTH: usize = 10;

/// Maximum length of the escalation note (characters).
pub const MAX_NOTE_LENGTH: usize = 5_000;

/// Maximum length of the escalation reason (characters).
pub const MAX_REASON_LENGTH: usize = 200;

/// Audit-comment tag for manual escalations.
pub const TAG_MANUAL: &str = "[ESCALATION]";

/// Reason recorded when a timeout escalation is requested without one.
pub const DEFAULT_TIMEOUT_REASON: &str = "Category escalation threshold exceeded";

/// Reason recorded by the background sweep.
pub const AUTOMATIC_REASON: &str = "Automatic escalation";

/// Validated manual escalation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualEscalation {
    pub reason: String,
    pub note: String,
}

/// Validate the reason and note of a manual escalation request.
///
/// Both are trimmed. The reason must be non-empty; the note must be at least
/// [`MIN_NOTE_LENGTH`] characters.
pub fn validate_manual_request(reason: &str, note: &str) -> Result<ManualEscalation, CoreError> {
    let reason = reason.trim();
    let note = note.trim();

    if reason.is_empty() {
        return Err(CoreError::validation("reason", "Escalation reason is required"));
    }
    if reason.chars().count() > MAX_REASON_LENGTH {
        return Err(CoreError::validation(
            "reason",
            format!("Escalation reason cannot exceed {MAX_REASON_LENGTH} characters"),
        ));
    }
    let note_len = note.chars().count();
    if note_len < MIN_NOTE_LENGTH {
        return Err(CoreError::validation(
            "note",
            format!("Escalation note must be at least {MIN_NOTE_LENGTH} characters"),
        ));
    }
    if note_len > MAX_NOTE_LENGTH {
        return Err(CoreError::validation(
            "note",
            format!("Escalation note cannot exceed {MAX_NOTE_LENGTH} characters"),
        ));
    }

    Ok(ManualEscalation {
        reason: reason.to_string(),
        note: note.to_string(),
    })
}

/// Outcome of a successful timeout eligibility check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscalationWindow {
    pub threshold_hours: i32,
    pub elapsed_hours: f64,
}

/// Resolve the configured waiting period, falling back to the default.
///
/// Non-positive values are treated as unset.
pub fn effective_threshold(escalate_after_hours: Option<i32>) -> i32 {
    match escalate_after_hours {
        Some(h) if h > 0 => h,
        _ => DEFAULT_ESCALATE_AFTER_HOURS,
    }
}

/// Hours elapsed between `created_at` and `now` (fractional, never negative).
pub fn elapsed_hours(created_at: Timestamp, now: Timestamp) -> f64 {
    let millis = (now - created_at).num_milliseconds().max(0);
    millis as f64 / 3_600_000.0
}

/// Hours still to wait, rounded to one decimal place.
///
/// Any wait at all reports at least 0.1, so a caller that is too early is
/// never told to wait 0.0 hours.
pub fn hours_remaining(threshold_hours: i32, elapsed_hours: f64) -> f64 {
    let remaining = (f64::from(threshold_hours) - elapsed_hours).max(0.0);
    let rounded = (remaining * 10.0).round() / 10.0;
    if remaining > 0.0 {
        rounded.max(0.1)
    } else {
        0.0
    }
}

/// Check whether the category timeout has elapsed.
///
/// Succeeds when `elapsed >= threshold`; otherwise fails with
/// [`CoreError::EscalationTooEarly`].
pub fn check_timeout_eligibility(
    created_at: Timestamp,
    now: Timestamp,
    escalate_after_hours: Option<i32>,
) -> Result<EscalationWindow, CoreError> {
    let threshold_hours = effective_threshold(escalate_after_hours);
    let elapsed = elapsed_hours(created_at, now);

    if elapsed < f64::from(threshold_hours) {
        return Err(CoreError::EscalationTooEarly {
            hours_remaining: hours_remaining(threshold_hours, elapsed),
        });
    }

    Ok(EscalationWindow {
        threshold_hours,
        elapsed_hours: elapsed,
    })
}

/// Body of the audit comment for a manual escalation.
pub fn format_manual_comment(request: &ManualEscalation) -> String {
    format!("{TAG_MANUAL} Reason: {}\n{}", request.reason, request.note)
}

/// Tag for category escalations, e.g. `[CATEGORY ESCALATION - HIGH]`.
pub fn category_tag(priority: &str) -> String {
    format!("[CATEGORY ESCALATION - {}]", priority.to_uppercase())
}

/// Body of the audit comment for a category timeout escalation.
///
/// A blank reason falls back to [`DEFAULT_TIMEOUT_REASON`]; a blank note is
/// omitted.
pub fn format_category_comment(priority: &str, reason: Option<&str>, note: Option<&str>) -> String {
    let reason = reason
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_TIMEOUT_REASON);
    let tag = category_tag(priority);

    match note.map(str::trim).filter(|n| !n.is_empty()) {
        Some(note) => format!("{tag} Reason: {reason}\n{note}"),
        None => format!("{tag} Reason: {reason}"),
    }
}

/// Validate the optional free text on a timeout escalation request.
pub fn validate_timeout_request(reason: Option<&str>, note: Option<&str>) -> Result<(), CoreError> {
    if let Some(r) = reason {
        if r.trim().chars().count() > MAX_REASON_LENGTH {
            return Err(CoreError::validation(
                "reason",
                format!("Escalation reason cannot exceed {MAX_REASON_LENGTH} characters"),
            ));
        }
    }
    if let Some(n) = note {
        if n.trim().chars().count() > MAX_NOTE_LENGTH {
            return Err(CoreError::validation(
                "note",
                format!("Escalation note cannot exceed {MAX_NOTE_LENGTH} characters"),
            ));
        }
    }
    Ok(())
}
