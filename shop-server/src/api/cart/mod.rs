//! Guest cart API
//!
//! No auth; carts are keyed by a client-held session id. The `{id}` segment is
//! the session id on GET and the item id on PUT/DELETE.

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/v1/cart", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::add))
        .route(
            "/{id}",
            get(handler::list)
                .put(handler::update)
                .delete(handler::remove),
        )
        .route("/{id}/clear", delete(handler::clear))
        .route("/{id}/total", get(handler::total))
}
