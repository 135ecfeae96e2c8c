//! Form rules checked before any network call.

use std::fmt;

use crate::models::{Credentials, RootAdminRequest};

/// Shortest password accepted for a new root administrator.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A form field that failed its rule.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ValidationError {
    /// Username left blank.
    UsernameRequired,
    /// Password left blank.
    PasswordRequired,
    /// Mobile number left blank.
    MobileNumberRequired,
    /// Confirmation differs from the password.
    PasswordsDoNotMatch,
    /// Shorter than [`MIN_PASSWORD_LENGTH`].
    PasswordTooShort,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UsernameRequired => "Username is required.",
            Self::PasswordRequired => "Password is required.",
            Self::MobileNumberRequired => "Mobile number is required.",
            Self::PasswordsDoNotMatch => "Passwords do not match!",
            Self::PasswordTooShort => "Password must be at least 6 characters long!",
        })
    }
}

impl std::error::Error for ValidationError {}

/// Validate the login form and build the credentials to submit.
///
/// The username is trimmed; the password is taken as typed.
///
/// # Errors
/// The first rule the input breaks.
pub fn validate_login(username: &str, password: &str) -> Result<Credentials, ValidationError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ValidationError::UsernameRequired);
    }
    if password.is_empty() {
        return Err(ValidationError::PasswordRequired);
    }
    Ok(Credentials::new(username, password))
}

/// Validate the root administrator registration form.
///
/// # Errors
/// The first rule the input breaks. A mismatch is reported before a short password.
pub fn validate_root_admin(
    username: &str,
    mobile_number: &str,
    password: &str,
    confirm_password: &str,
) -> Result<RootAdminRequest, ValidationError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ValidationError::UsernameRequired);
    }
    let mobile_number = mobile_number.trim();
    if mobile_number.is_empty() {
        return Err(ValidationError::MobileNumberRequired);
    }
    if password != confirm_password {
        return Err(ValidationError::PasswordsDoNotMatch);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(RootAdminRequest {
        username: username.to_string(),
        password: password.to_string(),
        mobile_number: mobile_number.to_string(),
    })
}
