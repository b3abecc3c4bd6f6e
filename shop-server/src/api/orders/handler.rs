//! Orders API Handlers

use axum::extract::{Path, State};
use serde::Deserialize;
use shared::models::{Order, OrderCreate, OrderListQuery, OrderStats, OrderUpdate};

use crate::api::{Json, Query};
use crate::auth::CurrentAdmin;
use crate::core::AppState;
use crate::db::repository::order;
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub customer_phone: Option<String>,
}

/// POST /api/v1/orders
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    let order = state.orders.place_order(payload).await?;
    Ok(Json(order))
}

/// GET /api/v1/orders/{order_number}?customer_phone=
///
/// A missing or wrong phone answers exactly like an unknown order number.
pub async fn lookup(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
    Query(query): Query<LookupQuery>,
) -> AppResult<Json<Order>> {
    let not_found = || AppError::with_message(ErrorCode::OrderNotFound, "Order not found");

    let phone = query
        .customer_phone
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(not_found)?;

    let order = order::find_by_number_and_phone(&state.pool, &order_number, phone)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(order))
}

/// GET /api/v1/orders/admin/all
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order::find_all(&state.pool, query.skip, query.limit, query.status).await?;
    Ok(Json(orders))
}

/// GET /api/v1/orders/admin/stats
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<OrderStats>> {
    let stats = order::stats(&state.pool).await?;
    Ok(Json(stats))
}

/// PUT /api/v1/orders/admin/{id}
pub async fn update(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(id): Path<i64>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    let status = payload.status;
    let order = state.orders.update_order(id, payload).await?;
    tracing::info!(
        order_id = id,
        order_number = %order.order_number,
        status = ?status,
        admin = %admin.username,
        "Order updated"
    );
    Ok(Json(order))
}
