use validator::ValidateEmail;
use crate::core::library::{LibraryError, LibraryResult};

// Returns the trimmed value or a validation error naming the blank field.
pub(crate) fn require_non_blank(field: &str, value: &str) -> LibraryResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LibraryError::validation(
            format!("{} is required", field).as_str(), Some("blank_field".to_string())));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn require_email(value: &str) -> LibraryResult<String> {
    let email = require_non_blank("email", value)?;
    if !email.validate_email() {
        return Err(LibraryError::validation(
            format!("email {} is malformed", email).as_str(), Some("invalid_email".to_string())));
    }
    Ok(email)
}
