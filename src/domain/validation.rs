use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

const MIN_NAME_LENGTH: usize = 2;
const MIN_PASSWORD_LENGTH: usize = 6;

pub static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex compiles"));

fn error(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("required", "Please fill in all fields".to_string()));
    }
    Ok(())
}

/// Names are checked after trimming, so `" A "` is still too short.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    validate_required(name)?;
    if name.trim().chars().count() < MIN_NAME_LENGTH {
        return Err(error(
            "name_length",
            format!("Name must be at least {} characters", MIN_NAME_LENGTH),
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(error("required", "Please fill in all fields".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(error(
            "password_length",
            format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
        ));
    }
    Ok(())
}
