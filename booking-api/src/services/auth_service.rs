use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Deserialize;
use uuid::Uuid;

use crate::config::Config;
use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::Claims;
use crate::models::{NewUser, SignupInput, User, UserChanges};
use crate::security::verify_password;
use crate::utils::mask_email;
use crate::validators::validate_signup;

/// Raw signup request fields, any of which may be missing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    config: Config,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, config: Config) -> Self {
        Self { users, config }
    }

    /// Register a user and issue a session token.
    pub async fn signup(&self, request: SignupRequest) -> Result<(User, String)> {
        validate_signup(
            request.name.as_deref(),
            request.email.as_deref(),
            request.password.as_deref(),
            request.role.as_deref(),
        )?;

        let new_user = NewUser::new(SignupInput {
            name: request.name.unwrap_or_default(),
            email: request.email.unwrap_or_default(),
            password: request.password.unwrap_or_default(),
            role: request.role,
            phone: request.phone,
        })?;

        if self.users.find_by_email(&new_user.email).await?.is_some() {
            tracing::warn!("Signup rejected, email already registered: {}", mask_email(&new_user.email));
            return Err(AppError::EmailTaken);
        }

        let record = new_user
            .into_record(self.config.security.password_hash_cost)
            .await?;
        let user = self.users.create(record).await?;
        let token = self.generate_token(&user)?;

        tracing::info!(user_id = %user.id, "User registered: {}", mask_email(&user.email));

        Ok((user, token))
    }

    /// Check credentials and issue a session token.
    pub async fn login(&self, email: Option<&str>, password: Option<&str>) -> Result<(User, String)> {
        let email = email
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::BadRequest("Email is required".into()))?;
        let password = password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::BadRequest("Password is required".into()))?;

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        // Stored passwords were trimmed before hashing
        let matches = verify_password(password.trim().to_string(), user.password_hash.clone()).await?;
        if !matches {
            tracing::warn!(user_id = %user.id, "Login failed: invalid credentials");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.generate_token(&user)?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok((user, token))
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    /// Apply profile changes; the password is re-hashed only when supplied.
    pub async fn update_profile(&self, user_id: Uuid, changes: UserChanges) -> Result<User> {
        let patch = changes
            .into_patch(self.config.security.password_hash_cost)
            .await?;
        if patch.is_empty() {
            return self.profile(user_id).await;
        }

        self.users
            .update(user_id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    pub fn generate_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.config.jwt.expiry_hours as i64);

        let claims = Claims {
            id: user.id.to_string(),
            email: user.email.clone(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))
    }
}
