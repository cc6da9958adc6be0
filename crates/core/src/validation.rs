//! Input validation for issues, comments, attachments and registration.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum issue description length (characters).
pub const MAX_DESCRIPTION_LENGTH: usize = 2_000;

/// Maximum issue title length (characters).
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum comment length (characters).
pub const MAX_COMMENT_LENGTH: usize = 5_000;

/// Maximum number of files in one upload.
pub const MAX_ATTACHMENTS_PER_REQUEST: usize = 10;

/// Maximum stored filename length (characters).
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Minimum password length for self-registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("valid regex"));
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Issues and comments
// ---------------------------------------------------------------------------

/// Trim and validate an issue description. Returns the trimmed text.
pub fn validate_description(description: &str) -> Result<String, CoreError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation("description", "Description is required"));
    }
    if trimmed.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(CoreError::validation(
            "description",
            format!("Description cannot exceed {MAX_DESCRIPTION_LENGTH} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Trim and validate an optional title. Blank titles become `None`.
pub fn validate_title(title: Option<&str>) -> Result<Option<String>, CoreError> {
    let Some(trimmed) = title.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::validation(
            "title",
            format!("Title cannot exceed {MAX_TITLE_LENGTH} characters"),
        ));
    }
    Ok(Some(trimmed.to_string()))
}

/// Trim and validate optional comment text. Blank text becomes `None`.
pub fn validate_comment(text: Option<&str>) -> Result<Option<String>, CoreError> {
    let Some(trimmed) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > MAX_COMMENT_LENGTH {
        return Err(CoreError::validation(
            "comment",
            format!("Comment cannot exceed {MAX_COMMENT_LENGTH} characters"),
        ));
    }
    Ok(Some(trimmed.to_string()))
}

/// Validate one uploaded file against the size limit.
pub fn validate_attachment(filename: &str, size: usize, max_bytes: usize) -> Result<(), CoreError> {
    if filename.trim().is_empty() {
        return Err(CoreError::validation("attachments", "Attachment filename is required"));
    }
    if filename.chars().count() > MAX_FILENAME_LENGTH {
        return Err(CoreError::validation(
            "attachments",
            format!("Attachment filename cannot exceed {MAX_FILENAME_LENGTH} characters"),
        ));
    }
    if size == 0 {
        return Err(CoreError::validation(
            "attachments",
            format!("Attachment '{filename}' is empty"),
        ));
    }
    if size > max_bytes {
        return Err(CoreError::validation(
            "attachments",
            format!("Attachment '{filename}' exceeds the {max_bytes} byte limit"),
        ));
    }
    Ok(())
}

/// Validate the number of files in one upload.
pub fn validate_attachment_count(count: usize) -> Result<(), CoreError> {
    if count > MAX_ATTACHMENTS_PER_REQUEST {
        return Err(CoreError::validation(
            "attachments",
            format!("At most {MAX_ATTACHMENTS_PER_REQUEST} attachments are allowed per request"),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.len() > 255 {
        return Err(CoreError::validation("email", "Email must be less than 255 characters"));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(CoreError::validation(
            "email",
            "Invalid email format (e.g., user@example.com)",
        ));
    }
    Ok(())
}

/// At least [`MIN_PASSWORD_LENGTH`] characters with upper, lower and digit.
pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::validation(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(CoreError::validation(
            "password",
            "Password must contain at least one lowercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(CoreError::validation(
            "password",
            "Password must contain at least one uppercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(CoreError::validation(
            "password",
            "Password must contain at least one number",
        ));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), CoreError> {
    if !PHONE_RE.is_match(phone) {
        return Err(CoreError::validation(
            "phone",
            "Phone must be exactly 10 digits (no spaces or dashes)",
        ));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), CoreError> {
    let len = name.chars().count();
    if !(2..=255).contains(&len) {
        return Err(CoreError::validation("name", "Name must be between 2-255 characters"));
    }
    if !NAME_RE.is_match(name) {
        return Err(CoreError::validation(
            "name",
            "Name can only contain letters and spaces",
        ));
    }
    Ok(())
}

pub fn validate_address(address: &str) -> Result<(), CoreError> {
    let len = address.chars().count();
    if !(10..=500).contains(&len) {
        return Err(CoreError::validation(
            "address",
            "Address must be between 10-500 characters",
        ));
    }
    Ok(())
}
