//! Product API Handlers

use axum::extract::{Path, State};
use shared::models::{Product, ProductCreate, ProductQuery, ProductUpdate};

use crate::api::{Json, Query};
use crate::auth::CurrentAdmin;
use crate::core::AppState;
use crate::db::repository::product;
use crate::orders::money;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

/// GET /api/v1/products - 商品搜索
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let products = product::find_all(&state.pool, &query).await?;
    Ok(Json(products))
}

/// GET /api/v1/products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let product = product::find_active_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(product))
}

/// POST /api/v1/products
pub async fn create(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Json(mut payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.sku, "sku", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;
    payload.price = money::normalize_price(payload.price)?;
    validate_stock(payload.stock_quantity)?;
    payload.sku = payload.sku.trim().to_string();

    let product = product::create(&state.pool, payload).await?;
    tracing::info!(admin = %admin.username, product_id = product.id, sku = %product.sku, "Product created");
    Ok(Json(product))
}

/// PUT /api/v1/products/{id}
pub async fn update(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(id): Path<i64>,
    Json(mut payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;
    if let Some(price) = payload.price {
        payload.price = Some(money::normalize_price(price)?);
    }
    if let Some(stock) = payload.stock_quantity {
        validate_stock(stock)?;
    }

    let product = product::update(&state.pool, id, payload).await?;
    tracing::info!(admin = %admin.username, product_id = id, "Product updated");
    Ok(Json(product))
}

/// DELETE /api/v1/products/{id} - 软删除
pub async fn delete(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    if !product::soft_delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(admin = %admin.username, product_id = id, "Product deactivated");
    Ok(ApiResponse::message("Product deleted successfully"))
}

fn validate_stock(stock: i64) -> AppResult<()> {
    if stock < 0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("Stock quantity cannot be negative, got {stock}"),
        ));
    }
    Ok(())
}

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::ProductNotFound, format!("Product {id} not found"))
}
