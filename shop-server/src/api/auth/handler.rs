//! Auth API Handlers

use axum::extract::State;
use shared::models::{Admin, AdminCreate, AdminLogin, TokenResponse};

use crate::api::Json;
use crate::auth::{CurrentAdmin, service};
use crate::core::AppState;
use crate::db::repository::admin;
use crate::utils::{AppError, AppResult};

/// POST /api/v1/auth/admin/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<AdminCreate>,
) -> AppResult<Json<Admin>> {
    let admin = service::register_admin(&state.pool, payload).await?;
    Ok(Json(admin))
}

/// POST /api/v1/auth/admin/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<AdminLogin>,
) -> AppResult<Json<TokenResponse>> {
    let token = service::login(&state.pool, &state.jwt, payload).await?;
    Ok(Json(token))
}

/// GET /api/v1/auth/me
pub async fn me(State(state): State<AppState>, current: CurrentAdmin) -> AppResult<Json<Admin>> {
    let admin = admin::find_by_id(&state.pool, current.id)
        .await?
        .ok_or_else(AppError::unauthorized)?;
    Ok(Json(admin))
}
