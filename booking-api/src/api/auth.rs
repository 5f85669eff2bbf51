use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

use super::extract::AppJson;
use crate::config::Config;
use crate::error::Result;
use crate::middleware::{CurrentUser, SESSION_COOKIE};
use crate::models::{User, UserChanges};
use crate::services::{AuthService, SignupRequest};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).patch(update_profile))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub success: bool,
    pub message: &'static str,
    pub user: PublicUser,
}

/// The only user fields echoed at signup
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: ProfileInfo,
}

#[derive(Debug, Serialize)]
pub struct ProfileInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub phone: String,
}

impl From<User> for ProfileInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name,
            email: user.email,
            role: user.role,
            phone: user.phone,
        }
    }
}

/// HttpOnly session cookie; cross-site in production only.
pub fn session_cookie(token: String, config: &Config) -> Cookie<'static> {
    let (secure, same_site) = if config.is_production() {
        (true, SameSite::None)
    } else {
        (false, SameSite::Lax)
    };

    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(secure)
        .same_site(same_site)
        .path("/")
        .max_age(time::Duration::hours(config.jwt.expiry_hours as i64))
        .build()
}

fn cleared_session_cookie(config: &Config) -> Cookie<'static> {
    let mut cookie = session_cookie(String::new(), config);
    cookie.make_removal();
    cookie
}

async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<SignupResponse>)> {
    let auth_service = AuthService::new(state.repos.users.clone(), state.config.clone());
    let (user, token) = auth_service.signup(payload).await?;

    let jar = jar.add(session_cookie(token, &state.config));

    Ok((
        StatusCode::CREATED,
        jar,
        Json(SignupResponse {
            success: true,
            message: "User Created Successfully",
            user: PublicUser {
                name: user.name,
                email: user.email,
            },
        }),
    ))
}

async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<(CookieJar, Json<MessageResponse>)> {
    let auth_service = AuthService::new(state.repos.users.clone(), state.config.clone());
    let (_user, token) = auth_service
        .login(payload.email.as_deref(), payload.password.as_deref())
        .await?;

    let jar = jar.add(session_cookie(token, &state.config));

    Ok((
        jar,
        Json(MessageResponse {
            success: true,
            message: "Login successful",
        }),
    ))
}

/// Always succeeds, with or without a session.
async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.add(cleared_session_cookie(&state.config));

    (
        jar,
        Json(MessageResponse {
            success: true,
            message: "Logged out successfully",
        }),
    )
}

async fn get_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<ProfileResponse>> {
    let auth_service = AuthService::new(state.repos.users.clone(), state.config.clone());
    let user = auth_service.profile(current_user.id).await?;

    Ok(Json(ProfileResponse {
        success: true,
        user: user.into(),
    }))
}

async fn update_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    AppJson(changes): AppJson<UserChanges>,
) -> Result<Json<ProfileResponse>> {
    let auth_service = AuthService::new(state.repos.users.clone(), state.config.clone());
    let user = auth_service.update_profile(current_user.id, changes).await?;

    Ok(Json(ProfileResponse {
        success: true,
        user: user.into(),
    }))
}
