//! Application state

use std::sync::Arc;

use sqlx::SqlitePool;

use super::Config;
use crate::auth::JwtService;
use crate::db::DbService;
use crate::notification::{NotificationGateway, OrderNotifier};
use crate::orders::OrderService;
use crate::utils::AppError;

/// Shared handler state
///
/// Cheap to clone: every field is a handle.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pool: SqlitePool,
    pub jwt: Arc<JwtService>,
    pub orders: OrderService,
}

impl AppState {
    /// Assemble state from already-built parts
    pub fn new(config: Config, pool: SqlitePool, notifier: Arc<dyn OrderNotifier>) -> Self {
        let jwt = Arc::new(JwtService::new(config.jwt.clone()));
        let orders = OrderService::new(pool.clone(), notifier, config.notification_timeout);
        Self {
            config: Arc::new(config),
            pool,
            jwt,
            orders,
        }
    }

    /// Open the database and the WhatsApp gateway described by `config`
    pub async fn initialize(config: Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_path).await?;
        let gateway = NotificationGateway::new(
            config.whatsapp.clone(),
            config.admin_whatsapp_number.clone(),
        );
        tracing::info!(provider = gateway.transport().name(), "WhatsApp notifications configured");
        Ok(Self::new(config, db.pool, Arc::new(gateway)))
    }
}
