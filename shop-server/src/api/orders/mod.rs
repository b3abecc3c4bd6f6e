//! Orders API
//!
//! Placement and lookup are public; the `/admin` subtree sits behind
//! [`require_admin`].

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::core::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new().nest("/api/v1/orders", routes(state))
}

fn routes(state: &AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/admin/all", get(handler::list))
        .route("/admin/stats", get(handler::stats))
        .route("/admin/{id}", put(handler::update))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/", post(handler::create))
        .route("/{order_number}", get(handler::lookup))
        .merge(admin)
}
