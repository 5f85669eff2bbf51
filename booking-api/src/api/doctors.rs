use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::extract::{AppJson, AppPath, AppQuery};
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{CreateAvailability, CreateDoctor, UpdateAvailability};
use crate::services::{DoctorService, ListDoctorsParams};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_doctors))
        .route("/:id", get(get_doctor))
        .route("/:id/availability", get(list_availability))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/", post(create_doctor))
}

pub fn availability_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(add_availability))
        .route("/:id", put(update_availability))
}

#[derive(Debug, Deserialize)]
pub struct ListDoctorsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

async fn list_doctors(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListDoctorsQuery>,
) -> Result<Json<Value>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let doctor_service = DoctorService::new(state.repos.clone());
    let doctors = doctor_service.list(ListDoctorsParams { page, limit }).await?;

    Ok(Json(json!({
        "success": true,
        "doctors": doctors,
        "page": page,
        "limit": limit,
    })))
}

async fn get_doctor(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Value>> {
    let doctor = DoctorService::new(state.repos.clone()).get(id).await?;
    Ok(Json(json!({ "success": true, "doctor": doctor })))
}

async fn create_doctor(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    AppJson(payload): AppJson<CreateDoctor>,
) -> Result<(StatusCode, Json<Value>)> {
    let doctor = DoctorService::new(state.repos.clone())
        .create_profile(&current_user, payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "doctor": doctor })),
    ))
}

async fn list_availability(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Value>> {
    let slots = DoctorService::new(state.repos.clone()).availability_for(id).await?;
    Ok(Json(json!({ "success": true, "availability": slots })))
}

async fn add_availability(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    AppJson(payload): AppJson<CreateAvailability>,
) -> Result<(StatusCode, Json<Value>)> {
    let slot = DoctorService::new(state.repos.clone())
        .add_availability(&current_user, payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "availability": slot })),
    ))
}

async fn update_availability(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateAvailability>,
) -> Result<Json<Value>> {
    let slot = DoctorService::new(state.repos.clone())
        .update_availability(&current_user, id, payload)
        .await?;

    Ok(Json(json!({ "success": true, "availability": slot })))
}
