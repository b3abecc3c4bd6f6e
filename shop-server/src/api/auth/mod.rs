//! Admin auth API

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new().nest("/api/v1/auth", routes(state))
}

fn routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(handler::me))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/admin/register", post(handler::register))
        .route("/admin/login", post(handler::login))
        .merge(protected)
}
