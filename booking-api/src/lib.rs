pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod security;
pub mod services;
pub mod utils;
pub mod validators;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::db::Repositories;

#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub config: Config,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", api::routes(state.clone()))
        .layer(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Doctor Appointment Booking Backend",
    }))
}

async fn health_check() -> &'static str {
    "OK"
}
