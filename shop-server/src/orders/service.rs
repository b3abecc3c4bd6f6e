//! Order placement and admin updates
//!
//! Placement runs in a single `BEGIN IMMEDIATE` transaction: preconditions are
//! checked against the locked database, then the order, its items, the stock
//! decrements and (cart mode) the cart cleanup are written together. The
//! notification is sent after commit and never fails the request.

use std::sync::Arc;
use std::time::Duration;

use shared::models::{Order, OrderCreate, OrderItem, OrderItemInput, OrderStatus, OrderUpdate};
use shared::util::now_millis;
use sqlx::{SqliteConnection, SqlitePool};

use super::money;
use super::number::generate_order_number;
use crate::db::repository::{RepoError, cart, order, product};
use crate::notification::OrderNotifier;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Where the order lines come from
#[derive(Debug, Clone)]
enum OrderSource {
    /// Caller-priced items
    Direct(Vec<OrderItemInput>),
    /// A guest cart, priced at current catalog prices
    Cart(String),
}

/// Line item resolved against the catalog
#[derive(Debug, Clone)]
struct ResolvedLine {
    product_id: i64,
    product_name: String,
    quantity: i64,
    price: f64,
}

/// Order service
#[derive(Clone)]
pub struct OrderService {
    pool: SqlitePool,
    notifier: Arc<dyn OrderNotifier>,
    notify_timeout: Duration,
}

impl OrderService {
    pub fn new(pool: SqlitePool, notifier: Arc<dyn OrderNotifier>, notify_timeout: Duration) -> Self {
        Self {
            pool,
            notifier,
            notify_timeout,
        }
    }

    /// Place a guest order
    pub async fn place_order(&self, req: OrderCreate) -> AppResult<Order> {
        validate_customer(&req)?;
        let source = order_source(&req)?;

        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await.map_err(db_err)?;

        let lines = match &source {
            OrderSource::Direct(items) => resolve_direct(&mut tx, items).await?,
            OrderSource::Cart(session_id) => resolve_cart(&mut tx, session_id).await?,
        };

        let total_amount = money::sum_lines(lines.iter().map(|l| (l.price, l.quantity)));
        let order_number = generate_order_number();
        let now = now_millis();

        let order_id = order::insert(
            &mut tx,
            &order::NewOrder {
                order_number: &order_number,
                customer_name: req.customer_name.trim(),
                customer_phone: req.customer_phone.trim(),
                customer_address: req.customer_address.trim(),
                notes: req.notes.as_deref(),
                total_amount,
                created_at: now,
            },
        )
        .await
        .map_err(|e| order_insert_error(e, &order_number))?;

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            let item_id =
                order::insert_item(&mut tx, order_id, line.product_id, line.quantity, line.price, now)
                    .await?;
            if !product::decrement_stock(&mut tx, line.product_id, line.quantity).await? {
                // Stock dropped below the request since it was checked (repeated product lines)
                let available = product::find_by_id(&mut *tx, line.product_id)
                    .await?
                    .map(|p| p.stock_quantity)
                    .unwrap_or(0);
                return Err(AppError::insufficient_stock(&line.product_name, available));
            }
            items.push(OrderItem {
                id: item_id,
                order_id,
                product_id: line.product_id,
                product_name: line.product_name,
                quantity: line.quantity,
                price: line.price,
                created_at: now,
            });
        }

        if let OrderSource::Cart(session_id) = &source {
            cart::clear(&mut *tx, session_id).await?;
        }

        tx.commit().await.map_err(db_err)?;

        // Committed: from here on nothing may fail the request
        let mut written = Order {
            id: order_id,
            order_number,
            customer_name: req.customer_name.trim().to_string(),
            customer_phone: req.customer_phone.trim().to_string(),
            customer_address: req.customer_address.trim().to_string(),
            status: OrderStatus::Pending,
            total_amount,
            notes: req.notes,
            notification_sent: false,
            created_at: now,
            updated_at: None,
            items,
        };
        tracing::info!(
            order_id,
            order_number = %written.order_number,
            total_amount,
            lines = written.items.len(),
            "Order placed"
        );

        if self.send_new_order(&written).await {
            match order::mark_notification_sent(&self.pool, order_id).await {
                Ok(()) => written.notification_sent = true,
                Err(e) => {
                    tracing::error!(order_id, error = %e, "Failed to record notification delivery")
                }
            }
        }

        match self.load(order_id).await {
            Ok(stored) => Ok(stored),
            Err(e) => {
                tracing::error!(order_id, error = %e, "Failed to reload placed order, answering with the written values");
                Ok(written)
            }
        }
    }

    /// Admin update of status and/or notes
    ///
    /// A status change notifies the customer; a notes-only update does not.
    pub async fn update_order(&self, id: i64, data: OrderUpdate) -> AppResult<Order> {
        let existing = self.load(id).await?;

        validate_optional_text(&data.notes, "notes", MAX_NOTE_LEN)?;
        if !order::update_status_notes(&self.pool, id, data.status, data.notes.as_deref()).await? {
            return Err(order_not_found());
        }
        let updated = self.load(id).await?;

        if let Some(new_status) = data.status
            && new_status != existing.status
        {
            tracing::info!(
                order_id = id,
                from = %existing.status,
                to = %new_status,
                "Order status changed"
            );
            self.send_status_change(&updated, new_status).await;
        }

        Ok(updated)
    }

    async fn load(&self, id: i64) -> AppResult<Order> {
        order::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(order_not_found)
    }

    async fn send_new_order(&self, order: &Order) -> bool {
        match tokio::time::timeout(self.notify_timeout, self.notifier.notify_new_order(order)).await {
            Ok(sent) => sent,
            Err(_) => {
                tracing::warn!(order_number = %order.order_number, "New order notification timed out");
                false
            }
        }
    }

    async fn send_status_change(&self, order: &Order, status: OrderStatus) -> bool {
        let notify = self.notifier.notify_status_change(order, status);
        match tokio::time::timeout(self.notify_timeout, notify).await {
            Ok(sent) => sent,
            Err(_) => {
                tracing::warn!(order_number = %order.order_number, "Status change notification timed out");
                false
            }
        }
    }
}

fn validate_customer(req: &OrderCreate) -> AppResult<()> {
    validate_required_text(&req.customer_name, "customer_name", MAX_NAME_LEN)?;
    validate_required_text(&req.customer_phone, "customer_phone", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&req.customer_address, "customer_address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&req.notes, "notes", MAX_NOTE_LEN)?;
    Ok(())
}

/// Exactly one of `items` / `session_id`; direct items must be non-empty and well-formed
fn order_source(req: &OrderCreate) -> AppResult<OrderSource> {
    match (&req.items, &req.session_id) {
        (Some(items), None) => {
            if items.is_empty() {
                return Err(AppError::validation("Order must contain at least one item"));
            }
            let mut normalized = Vec::with_capacity(items.len());
            for item in items {
                money::validate_quantity(item.quantity)?;
                normalized.push(OrderItemInput {
                    price: money::normalize_price(item.price)?,
                    ..item.clone()
                });
            }
            Ok(OrderSource::Direct(normalized))
        }
        (None, Some(session_id)) => {
            validate_required_text(session_id, "session_id", MAX_SHORT_TEXT_LEN)?;
            Ok(OrderSource::Cart(session_id.clone()))
        }
        _ => Err(AppError::validation(
            "Provide exactly one of 'items' or 'session_id'",
        )),
    }
}

async fn resolve_direct(
    conn: &mut SqliteConnection,
    items: &[OrderItemInput],
) -> AppResult<Vec<ResolvedLine>> {
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let product = check_line(conn, item.product_id, item.quantity).await?;
        lines.push(ResolvedLine {
            product_id: product.id,
            product_name: product.name,
            quantity: item.quantity,
            price: item.price,
        });
    }
    Ok(lines)
}

async fn resolve_cart(conn: &mut SqliteConnection, session_id: &str) -> AppResult<Vec<ResolvedLine>> {
    let rows = cart::find_rows(&mut *conn, session_id).await?;
    if rows.is_empty() {
        return Err(AppError::with_message(ErrorCode::CartEmpty, "Cart is empty"));
    }

    let mut lines = Vec::with_capacity(rows.len());
    for row in rows {
        let product = check_line(conn, row.product_id, row.quantity).await?;
        lines.push(ResolvedLine {
            product_id: product.id,
            price: product.price,
            product_name: product.name,
            quantity: row.quantity,
        });
    }
    Ok(lines)
}

/// Exists, active, enough stock; first failure wins
async fn check_line(
    conn: &mut SqliteConnection,
    product_id: i64,
    quantity: i64,
) -> AppResult<shared::models::Product> {
    let product = product::find_by_id(&mut *conn, product_id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::ProductNotFound,
                format!("Product {product_id} not found"),
            )
        })?;

    if !product.is_active {
        return Err(AppError::with_message(
            ErrorCode::ProductUnavailable,
            format!("Product {} is no longer available", product.name),
        ));
    }
    if quantity > product.stock_quantity {
        return Err(AppError::insufficient_stock(&product.name, product.stock_quantity));
    }
    Ok(product)
}

/// A unique violation on insert means the generated number is taken
fn order_insert_error(err: RepoError, order_number: &str) -> AppError {
    match err {
        RepoError::Duplicate(_) => AppError::with_message(
            ErrorCode::OrderNumberConflict,
            format!("Order number {order_number} already exists"),
        ),
        other => other.into(),
    }
}

fn order_not_found() -> AppError {
    AppError::with_message(ErrorCode::OrderNotFound, "Order not found")
}

fn db_err(e: sqlx::Error) -> AppError {
    RepoError::from(e).into()
}
