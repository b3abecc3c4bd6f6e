//! Cart API Handlers

use axum::extract::{Path, State};
use serde::Deserialize;
use shared::models::{CartItem, CartItemCreate, CartItemUpdate, CartTotal};

use crate::api::{Json, Query};
use crate::core::AppState;
use crate::db::repository::cart;
use crate::orders::money;
use crate::utils::validation::{MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{ApiResponse, AppResult};

/// `?session_id=` for item-level operations
#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    #[serde(default)]
    pub session_id: String,
}

/// GET /api/v1/cart/{session_id}
pub async fn list(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> AppResult<Json<Vec<CartItem>>> {
    let items = cart::find_by_session(&state.pool, &session_id).await?;
    Ok(Json(items))
}

/// POST /api/v1/cart - add or merge
pub async fn add(
    State(state): State<AppState>,
    Json(payload): Json<CartItemCreate>,
) -> AppResult<Json<CartItem>> {
    validate_required_text(&payload.session_id, "session_id", MAX_SHORT_TEXT_LEN)?;
    money::validate_quantity(payload.quantity)?;

    let item = cart::add(&state.pool, &payload).await?;
    tracing::debug!(session_id = %payload.session_id, product_id = payload.product_id, quantity = item.quantity, "Cart item added");
    Ok(Json(item))
}

/// PUT /api/v1/cart/{item_id}?session_id=
pub async fn update(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
    Query(query): Query<SessionQuery>,
    Json(payload): Json<CartItemUpdate>,
) -> AppResult<Json<CartItem>> {
    validate_required_text(&query.session_id, "session_id", MAX_SHORT_TEXT_LEN)?;
    money::validate_quantity(payload.quantity)?;

    let item = cart::update_quantity(&state.pool, item_id, &query.session_id, payload.quantity).await?;
    Ok(Json(item))
}

/// DELETE /api/v1/cart/{item_id}?session_id=
pub async fn remove(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
    Query(query): Query<SessionQuery>,
) -> AppResult<ApiResponse<()>> {
    validate_required_text(&query.session_id, "session_id", MAX_SHORT_TEXT_LEN)?;
    cart::remove(&state.pool, item_id, &query.session_id).await?;
    Ok(ApiResponse::message("Item removed from cart"))
}

/// DELETE /api/v1/cart/{session_id}/clear
pub async fn clear(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let removed = cart::clear(&state.pool, &session_id).await?;
    tracing::debug!(session_id = %session_id, removed, "Cart cleared");
    Ok(ApiResponse::message("Cart cleared"))
}

/// GET /api/v1/cart/{session_id}/total
pub async fn total(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> AppResult<Json<CartTotal>> {
    let total = cart::total(&state.pool, &session_id).await?;
    Ok(Json(total))
}
