use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidateEmail;

use crate::error::{AppError, Result};

/// Input validation for signup requests

// Hardcoded pattern, always valid
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{10}$").expect("hardcoded phone regex is invalid - fix source code")
});

const MIN_STRONG_PASSWORD_LEN: usize = 8;

/// Characters that count as a password symbol
const PASSWORD_SYMBOLS: &str = "-#!$@£%^&*()_+|~=`{}[]:\";'<>?,./\\ ";

/// Check the raw signup fields, failing on the first violated rule.
///
/// Order: name presence, email presence, email format, password presence,
/// password strength, role presence. Empty strings count as missing.
pub fn validate_signup(
    name: Option<&str>,
    email: Option<&str>,
    password: Option<&str>,
    role: Option<&str>,
) -> Result<()> {
    if is_blank(name) {
        return Err(AppError::BadRequest("Name is required".into()));
    }
    let email = match email {
        Some(e) if !e.is_empty() => e,
        _ => return Err(AppError::BadRequest("Email is required".into())),
    };
    if !validate_email(email) {
        return Err(AppError::BadRequest("Email is not valid".into()));
    }
    let password = match password {
        Some(p) if !p.is_empty() => p,
        _ => return Err(AppError::BadRequest("Password is required".into())),
    };
    if !is_strong_password(password) {
        return Err(AppError::BadRequest("Password must be strong".into()));
    }
    if is_blank(role) {
        return Err(AppError::BadRequest("Role is required".into()));
    }
    Ok(())
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, str::is_empty)
}

pub fn validate_email(email: &str) -> bool {
    email.to_string().validate_email()
}

/// Strong password:
/// - At least 8 characters
/// - At least one ASCII uppercase letter
/// - At least one ASCII lowercase letter
/// - At least one digit
/// - At least one symbol from `PASSWORD_SYMBOLS`
pub fn is_strong_password(password: &str) -> bool {
    if password.chars().count() < MIN_STRONG_PASSWORD_LEN {
        return false;
    }

    let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| PASSWORD_SYMBOLS.contains(c));

    has_uppercase && has_lowercase && has_digit && has_symbol
}

/// Phone numbers are exactly 10 ASCII digits
pub fn validate_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}
