//! Category API Handlers

use axum::extract::{Path, State};
use shared::models::{Category, CategoryCreate, CategoryUpdate};

use crate::api::{Json, Pagination, Query};
use crate::auth::CurrentAdmin;
use crate::core::AppState;
use crate::db::repository::category;
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

/// GET /api/v1/products/categories - 获取所有有效分类
pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Vec<Category>>> {
    let categories = category::find_all_active(&state.pool, page.skip, page.limit).await?;
    Ok(Json(categories))
}

/// GET /api/v1/products/categories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let category = category::find_active_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(category))
}

/// POST /api/v1/products/categories
pub async fn create(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Json(mut payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    payload.name = payload.name.trim().to_string();

    let category = category::create(&state.pool, payload).await?;
    tracing::info!(admin = %admin.username, category_id = category.id, "Category created");
    Ok(Json(category))
}

/// PUT /api/v1/products/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(id): Path<i64>,
    Json(mut payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
        payload.name = Some(name.trim().to_string());
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let category = category::update(&state.pool, id, payload).await?;
    tracing::info!(admin = %admin.username, category_id = id, "Category updated");
    Ok(Json(category))
}

/// DELETE /api/v1/products/categories/{id} - 软删除 (商品关联保留)
pub async fn delete(
    State(state): State<AppState>,
    admin: CurrentAdmin,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    if !category::soft_delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(admin = %admin.username, category_id = id, "Category deactivated");
    Ok(ApiResponse::message("Category deleted successfully"))
}

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::CategoryNotFound, format!("Category {id} not found"))
}
