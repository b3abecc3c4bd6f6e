//! CurrentAdmin extractor

use axum::{extract::FromRequestParts, http::request::Parts};

use super::CurrentAdmin;
use super::middleware::authenticate;
use crate::core::AppState;
use crate::utils::AppError;

/// Reads the admin injected by [`require_admin`](super::require_admin),
/// authenticating the request itself when the middleware did not run
impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(admin) = parts.extensions.get::<CurrentAdmin>() {
            return Ok(admin.clone());
        }

        let admin = authenticate(state, &parts.headers, parts.uri.path()).await?;
        parts.extensions.insert(admin.clone());
        Ok(admin)
    }
}
