pub mod auth;
pub mod bootcamps;
pub mod courses;
pub mod reviews;
pub mod users;

use crate::error::ServerError;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Shared account validation, used by self-service registration and the
/// admin user routes alike.
pub fn validate_password(password: &str) -> Result<(), ServerError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ServerError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ServerError> {
    if !email.contains('@') {
        return Err(ServerError::Validation(
            "Please add a valid email".to_string(),
        ));
    }
    Ok(())
}
