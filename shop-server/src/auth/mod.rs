//! 认证授权模块
//!
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentAdmin`] - authenticated admin context
//! - [`require_admin`] - admin route guard
//! - [`service`] - registration and login

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod service;

pub use jwt::{Claims, DEV_JWT_SECRET, JwtConfig, JwtError, JwtService};
pub use middleware::require_admin;

use serde::Serialize;
use shared::models::Admin;

/// Authenticated admin, injected by [`require_admin`]
#[derive(Debug, Clone, Serialize)]
pub struct CurrentAdmin {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<Admin> for CurrentAdmin {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username,
            email: admin.email,
        }
    }
}
