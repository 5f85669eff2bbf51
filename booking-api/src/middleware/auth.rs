use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::AppState;

/// Name of the session cookie carrying the JWT
pub const SESSION_COOKIE: &str = "jwtToken";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,        // User ID
    pub email: String,
    pub iat: usize,        // Issued at
    pub exp: usize,        // Expiration time
}

#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

/// Verify a session token's signature and expiry.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("Session token rejected: {}", e);
        AppError::Unauthorized("Invalid or expired token".into())
    })
}

pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Token is missing".into()))?;

    let claims = decode_token(&token, &state.config.jwt.secret)?;

    let id = Uuid::parse_str(&claims.id)
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

    request.extensions_mut().insert(CurrentUser {
        id,
        email: claims.email,
    });

    Ok(next.run(request).await)
}
