use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use super::extract::{AppJson, AppPath};
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{CreateAppointment, UpdateAppointment};
use crate::services::AppointmentService;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_appointments).post(book_appointment))
        .route("/:id", patch(update_appointment))
}

async fn book_appointment(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    AppJson(payload): AppJson<CreateAppointment>,
) -> Result<(StatusCode, Json<Value>)> {
    let appointment = AppointmentService::new(state.repos.clone())
        .book(&current_user, payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "appointment": appointment })),
    ))
}

async fn list_appointments(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<Value>> {
    let appointments = AppointmentService::new(state.repos.clone())
        .list_for(&current_user)
        .await?;

    Ok(Json(json!({ "success": true, "appointments": appointments })))
}

async fn update_appointment(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateAppointment>,
) -> Result<Json<Value>> {
    let appointment = AppointmentService::new(state.repos.clone())
        .update(&current_user, id, payload)
        .await?;

    Ok(Json(json!({ "success": true, "appointment": appointment })))
}
