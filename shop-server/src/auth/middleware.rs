//! 认证中间件
//!
//! Guards the admin routes with a Bearer JWT.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::HeaderMap;

use super::{CurrentAdmin, JwtError, JwtService};
use crate::core::AppState;
use crate::db::repository::admin;
use crate::security_log;
use crate::utils::{AppError, ErrorCode};

/// Admin-only middleware
///
/// Validates `Authorization: Bearer <token>`, checks the admin still exists
/// and is active, then injects [`CurrentAdmin`] into the request extensions.
///
/// | Failure | Code |
/// |---------|------|
/// | Missing header | NotAuthenticated |
/// | Expired token | TokenExpired |
/// | Bad token / unknown admin | TokenInvalid |
/// | Deactivated admin | AccountDisabled |
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // CORS preflight
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let current = authenticate(&state, req.headers(), req.uri().path()).await?;
    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}

/// Resolve the admin behind the request's bearer token
pub(crate) async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
    path: &str,
) -> Result<CurrentAdmin, AppError> {
    let auth_header = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", path = path.to_string());
            return Err(AppError::unauthorized());
        }
    };

    let claims = state.jwt.validate_token(token).map_err(|e| {
        security_log!("WARN", "auth_failed", error = e.to_string(), path = path.to_string());
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;

    let admin_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| AppError::invalid_token("Malformed token subject"))?;

    let admin = admin::find_by_id(&state.pool, admin_id)
        .await?
        .ok_or_else(|| {
            security_log!("WARN", "auth_unknown_admin", admin_id = admin_id);
            AppError::invalid_token("Admin no longer exists")
        })?;

    if !admin.is_active {
        security_log!("WARN", "auth_inactive_admin", admin_id = admin_id);
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    Ok(CurrentAdmin::from(admin))
}
