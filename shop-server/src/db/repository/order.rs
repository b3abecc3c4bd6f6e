//! Order Repository
//!
//! Inserts take an open connection so the order transaction can group them;
//! reads and the post-creation mutations (status, notes, notification flag)
//! run against the pool.

use super::{RepoResult, page_bounds};
use crate::orders::money;
use shared::models::{Order, OrderItem, OrderStats, OrderStatus};
use shared::util::now_millis;
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};
use std::collections::BTreeMap;

const COLUMNS: &str = "id, order_number, customer_name, customer_phone, customer_address, status, total_amount, notes, notification_sent, created_at, updated_at";

/// Row data for a new order
#[derive(Debug, Clone)]
pub struct NewOrder<'a> {
    pub order_number: &'a str,
    pub customer_name: &'a str,
    pub customer_phone: &'a str,
    pub customer_address: &'a str,
    pub notes: Option<&'a str>,
    pub total_amount: f64,
    pub created_at: i64,
}

/// Insert the order row (status `pending`), returning its id
pub async fn insert(conn: &mut SqliteConnection, order: &NewOrder<'_>) -> RepoResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO orders (order_number, customer_name, customer_phone, customer_address, status, total_amount, notes, notification_sent, created_at) VALUES (?, ?, ?, ?, 'pending', ?, ?, 0, ?) RETURNING id",
    )
    .bind(order.order_number)
    .bind(order.customer_name)
    .bind(order.customer_phone)
    .bind(order.customer_address)
    .bind(order.total_amount)
    .bind(order.notes)
    .bind(order.created_at)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

pub async fn insert_item(
    conn: &mut SqliteConnection,
    order_id: i64,
    product_id: i64,
    quantity: i64,
    price: f64,
    created_at: i64,
) -> RepoResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO order_items (order_id, product_id, quantity, price, created_at) VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(order_id)
    .bind(product_id)
    .bind(quantity)
    .bind(price)
    .bind(created_at)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

/// Items of an order with the product name joined in
pub async fn find_items<'e>(executor: impl SqliteExecutor<'e>, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT oi.id, oi.order_id, oi.product_id, p.name AS product_name, oi.quantity, oi.price, oi.created_at FROM order_items oi JOIN products p ON p.id = oi.product_id WHERE oi.order_id = ? ORDER BY oi.id",
    )
    .bind(order_id)
    .fetch_all(executor)
    .await?;
    Ok(items)
}

async fn with_items(pool: &SqlitePool, order: Option<Order>) -> RepoResult<Option<Order>> {
    match order {
        Some(mut order) => {
            order.items = find_items(pool, order.id).await?;
            Ok(Some(order))
        }
        None => Ok(None),
    }
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!("SELECT {COLUMNS} FROM orders WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    with_items(pool, order).await
}

/// Guest lookup; the phone number acts as a shared secret
pub async fn find_by_number_and_phone(
    pool: &SqlitePool,
    order_number: &str,
    customer_phone: &str,
) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!(
        "SELECT {COLUMNS} FROM orders WHERE order_number = ? AND customer_phone = ?"
    ))
    .bind(order_number)
    .bind(customer_phone)
    .fetch_optional(pool)
    .await?;
    with_items(pool, order).await
}

/// Newest first, optionally filtered by status
pub async fn find_all(
    pool: &SqlitePool,
    skip: Option<i64>,
    limit: Option<i64>,
    status: Option<OrderStatus>,
) -> RepoResult<Vec<Order>> {
    let (skip, limit) = page_bounds(skip, limit);
    let mut orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {COLUMNS} FROM orders WHERE (?1 IS NULL OR status = ?1) ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3"
    ))
    .bind(status.map(|s| s.as_str()))
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;
    for order in &mut orders {
        order.items = find_items(pool, order.id).await?;
    }
    Ok(orders)
}

/// Update status and/or notes; returns `false` if the order does not exist
pub async fn update_status_notes(
    pool: &SqlitePool,
    id: i64,
    status: Option<OrderStatus>,
    notes: Option<&str>,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE orders SET status = COALESCE(?, status), notes = COALESCE(?, notes), updated_at = ? WHERE id = ?",
    )
    .bind(status.map(|s| s.as_str()))
    .bind(notes)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(rows > 0)
}

pub async fn mark_notification_sent(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    sqlx::query("UPDATE orders SET notification_sent = 1, updated_at = ? WHERE id = ?")
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Dashboard statistics; revenue counts confirmed through delivered orders
pub async fn stats(pool: &SqlitePool) -> RepoResult<OrderStats> {
    let total_orders = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await?;

    let breakdown = sqlx::query_as::<_, (String, i64)>(
        "SELECT status, COUNT(*) FROM orders GROUP BY status",
    )
    .fetch_all(pool)
    .await?;

    let revenue_rows = sqlx::query_as::<_, (String, f64)>("SELECT status, total_amount FROM orders")
        .fetch_all(pool)
        .await?;
    let revenue_statuses: Vec<&str> = OrderStatus::REVENUE.iter().map(|s| s.as_str()).collect();
    let total_revenue = money::sum_lines(
        revenue_rows
            .into_iter()
            .filter(|(status, _)| revenue_statuses.contains(&status.as_str()))
            .map(|(_, amount)| (amount, 1)),
    );

    let recent_orders = find_all(pool, Some(0), Some(10), None).await?;

    Ok(OrderStats {
        total_orders,
        status_breakdown: breakdown.into_iter().collect::<BTreeMap<_, _>>(),
        total_revenue,
        recent_orders,
    })
}
