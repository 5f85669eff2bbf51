use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::security::hash_password;
use crate::validators::{is_strong_password, validate_email, validate_phone};

const NAME_LENGTH: std::ops::RangeInclusive<usize> = 3..=30;
const PASSWORD_LENGTH: std::ops::RangeInclusive<usize> = 6..=100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserRole {
    Patient,
    Doctor,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Patient => "Patient",
            UserRole::Doctor => "Doctor",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Patient" => Some(UserRole::Patient),
            "Doctor" => Some(UserRole::Doctor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> UserRole {
        match self.role.as_str() {
            "Doctor" => UserRole::Doctor,
            _ => UserRole::Patient,
        }
    }
}

/// Raw signup fields as received from the client
#[derive(Debug, Clone, Default)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
    pub phone: Option<String>,
}

/// A user that passed field validation but has not been hashed yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    password: String,
    pub role: UserRole,
    pub phone: String,
}

/// Insert-ready user; the plaintext password is gone.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub phone: String,
}

impl NewUser {
    /// Normalize and validate signup input.
    ///
    /// Name and email are trimmed and lowercased, password and phone trimmed.
    /// A missing role falls back to `Patient`.
    pub fn new(input: SignupInput) -> Result<Self> {
        let name = normalize_name(&input.name)?;

        let email = input.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AppError::BadRequest("email is required".into()));
        }
        if !validate_email(&email) {
            return Err(AppError::BadRequest("Please enter a valid email".into()));
        }

        let password = normalize_password(&input.password)?;

        let role = match input.role.as_deref().map(str::trim) {
            None | Some("") => UserRole::Patient,
            Some(value) => UserRole::parse(value).ok_or_else(|| {
                AppError::BadRequest(format!("`{}` is not a valid role", value))
            })?,
        };

        let phone = normalize_phone(input.phone.as_deref())?;

        Ok(Self { name, email, password, role, phone })
    }

    /// Hash the password, producing the record to persist.
    pub async fn into_record(self, cost: u32) -> Result<NewUserRecord> {
        let password_hash = hash_password(self.password, cost).await?;
        Ok(NewUserRecord {
            name: self.name,
            email: self.email,
            password_hash,
            role: self.role,
            phone: self.phone,
        })
    }
}

/// Profile changes requested by a user. Absent fields stay as stored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

/// Validated column updates; `password_hash` is only set when the password changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.password_hash.is_none()
    }
}

impl UserChanges {
    pub async fn into_patch(self, cost: u32) -> Result<UserPatch> {
        let name = self.name.as_deref().map(normalize_name).transpose()?;
        let phone = match self.phone.as_deref() {
            Some(p) => Some(normalize_phone(Some(p))?),
            None => None,
        };
        let password_hash = match self.password.as_deref() {
            Some(p) => {
                let password = normalize_password(p)?;
                if !is_strong_password(&password) {
                    return Err(AppError::BadRequest("Password must be strong".into()));
                }
                Some(hash_password(password, cost).await?)
            }
            None => None,
        };
        Ok(UserPatch { name, phone, password_hash })
    }
}

fn normalize_name(raw: &str) -> Result<String> {
    let name = raw.trim().to_lowercase();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    if !NAME_LENGTH.contains(&name.chars().count()) {
        return Err(AppError::BadRequest(
            "name length must be between 3 - 30 characters".into(),
        ));
    }
    Ok(name)
}

fn normalize_password(raw: &str) -> Result<String> {
    let password = raw.trim();
    if password.is_empty() {
        return Err(AppError::BadRequest("Password is required".into()));
    }
    let len = password.chars().count();
    if len < *PASSWORD_LENGTH.start() {
        return Err(AppError::BadRequest("Password must be at least 6 characters".into()));
    }
    if len > *PASSWORD_LENGTH.end() {
        return Err(AppError::BadRequest("Password must not exceed 100 characters".into()));
    }
    Ok(password.to_string())
}

fn normalize_phone(raw: Option<&str>) -> Result<String> {
    let phone = raw.map(str::trim).unwrap_or_default();
    if phone.is_empty() {
        return Err(AppError::BadRequest("Phone number is required".into()));
    }
    if phone.chars().count() != 10 {
        return Err(AppError::BadRequest("Phone number must be exactly 10 digits".into()));
    }
    if !validate_phone(phone) {
        return Err(AppError::BadRequest("Phone number must contain only digits".into()));
    }
    Ok(phone.to_string())
}
