//! Form validation run before any request is dispatched
//!
//! These mirror the rules the API enforces so obviously bad input never costs
//! a round-trip. Messages are meant to be shown next to the offending field.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Minimum length of a display name
pub const MIN_NAME_LEN: usize = 2;
/// Minimum length of a signup or login password
pub const MIN_PASSWORD_LEN: usize = 6;
/// Minimum length of a password chosen through the reset flow
pub const MIN_RESET_PASSWORD_LEN: usize = 8;
/// Number of digits in an email verification code
pub const VERIFICATION_CODE_LEN: usize = 6;
/// Maximum length of a comment body
pub const MAX_COMMENT_LEN: usize = 500;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// A single field that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::new("name", "Full name is required"));
    }
    if name.chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::new(
            "name",
            format!("Full name must be at least {MIN_NAME_LEN} characters"),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::new("email", "Email is required"));
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Err(ValidationError::new(
            "email",
            "Please enter a valid email address",
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    validate_password_len(password, MIN_PASSWORD_LEN)
}

/// Validate a password chosen through the reset flow
pub fn validate_new_password(password: &str) -> Result<(), ValidationError> {
    validate_password_len(password, MIN_RESET_PASSWORD_LEN)
}

/// Validate the reset form: the new password and its confirmation
pub fn validate_password_confirmation(
    password: &str,
    confirmation: &str,
) -> Result<(), ValidationError> {
    validate_new_password(password)?;
    if password != confirmation {
        return Err(ValidationError::new(
            "confirmPassword",
            "Passwords do not match",
        ));
    }
    Ok(())
}

fn validate_password_len(password: &str, min: usize) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::new("password", "Password is required"));
    }
    if password.chars().count() < min {
        return Err(ValidationError::new(
            "password",
            format!("Password must be at least {min} characters"),
        ));
    }
    Ok(())
}

pub fn validate_verification_code(code: &str) -> Result<(), ValidationError> {
    if code.len() != VERIFICATION_CODE_LEN || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new(
            "verificationToken",
            format!("Enter the {VERIFICATION_CODE_LEN}-digit code from your email"),
        ));
    }
    Ok(())
}

/// Validate a comment body, returning the trimmed text to send
pub fn validate_comment(content: &str) -> Result<&str, ValidationError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ValidationError::new("content", "Comment cannot be empty"));
    }
    if content.chars().count() > MAX_COMMENT_LEN {
        return Err(ValidationError::new(
            "content",
            format!("Comment must be at most {MAX_COMMENT_LEN} characters"),
        ));
    }
    Ok(content)
}

/// Validate the signup form as a whole, reporting the first failing field
pub fn validate_signup(name: &str, email: &str, password: &str) -> Result<(), ValidationError> {
    validate_name(name)?;
    validate_email(email)?;
    validate_password(password)
}

/// Login only checks presence; length rules apply when a password is chosen
pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    validate_email(email)?;
    if password.is_empty() {
        return Err(ValidationError::new("password", "Password is required"));
    }
    Ok(())
}
