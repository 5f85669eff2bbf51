mod appointments;
pub mod auth;
mod doctors;
mod extract;

use axum::{middleware, Router};

use crate::middleware::require_auth;
use crate::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .nest("/auth", auth::protected_routes())
        .nest("/doctors", doctors::protected_routes())
        .nest("/availability", doctors::availability_routes())
        .nest("/appointments", appointments::routes())
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .nest("/auth", auth::routes())
        .nest("/doctors", doctors::routes())
        .merge(protected)
}
