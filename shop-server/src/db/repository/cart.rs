//! Guest Cart Repository
//!
//! Cart rows are keyed by an opaque session id. Every per-item operation
//! checks that the item belongs to the given session.

use super::{RepoError, RepoResult, product};
use crate::orders::money;
use shared::error::ErrorCode;
use shared::models::{CartItem, CartItemCreate, CartTotal};
use shared::util::now_millis;
use sqlx::{SqliteExecutor, SqlitePool};

const COLUMNS: &str = "id, session_id, product_id, quantity, created_at, updated_at";

/// Raw cart rows for a session (no product loaded)
pub async fn find_rows<'e>(
    executor: impl SqliteExecutor<'e>,
    session_id: &str,
) -> RepoResult<Vec<CartItem>> {
    let rows = sqlx::query_as::<_, CartItem>(&format!(
        "SELECT {COLUMNS} FROM cart_items WHERE session_id = ? ORDER BY id"
    ))
    .bind(session_id)
    .fetch_all(executor)
    .await?;
    Ok(rows)
}

/// Cart rows for a session with their products
pub async fn find_by_session(pool: &SqlitePool, session_id: &str) -> RepoResult<Vec<CartItem>> {
    let mut items = find_rows(pool, session_id).await?;
    for item in &mut items {
        item.product = product::find_by_id(pool, item.product_id).await?;
    }
    Ok(items)
}

/// Find an item only if it belongs to `session_id`
pub async fn find_owned(pool: &SqlitePool, id: i64, session_id: &str) -> RepoResult<Option<CartItem>> {
    let item = sqlx::query_as::<_, CartItem>(&format!(
        "SELECT {COLUMNS} FROM cart_items WHERE id = ? AND session_id = ?"
    ))
    .bind(id)
    .bind(session_id)
    .fetch_optional(pool)
    .await?;
    Ok(item)
}

/// Add to cart, merging into an existing session+product row
///
/// Repeated calls accumulate quantity.
pub async fn add(pool: &SqlitePool, data: &CartItemCreate) -> RepoResult<CartItem> {
    let product = product::find_by_id(pool, data.product_id)
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| RepoError::Business(ErrorCode::ProductNotFound, "Product not found".into()))?;

    let now = now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO cart_items (session_id, product_id, quantity, created_at) VALUES (?1, ?2, ?3, ?4) \
         ON CONFLICT(session_id, product_id) DO UPDATE SET quantity = quantity + excluded.quantity, updated_at = ?4 \
         RETURNING id",
    )
    .bind(&data.session_id)
    .bind(data.product_id)
    .bind(data.quantity)
    .bind(now)
    .fetch_one(pool)
    .await?;

    let mut item = find_owned(pool, id, &data.session_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to add cart item".into()))?;
    item.product = Some(product);
    Ok(item)
}

pub async fn update_quantity(
    pool: &SqlitePool,
    id: i64,
    session_id: &str,
    quantity: i64,
) -> RepoResult<CartItem> {
    let rows = sqlx::query(
        "UPDATE cart_items SET quantity = ?, updated_at = ? WHERE id = ? AND session_id = ?",
    )
    .bind(quantity)
    .bind(now_millis())
    .bind(id)
    .bind(session_id)
    .execute(pool)
    .await?
    .rows_affected();
    if rows == 0 {
        return Err(item_not_found());
    }

    let mut item = find_owned(pool, id, session_id)
        .await?
        .ok_or_else(item_not_found)?;
    item.product = product::find_by_id(pool, item.product_id).await?;
    Ok(item)
}

pub async fn remove(pool: &SqlitePool, id: i64, session_id: &str) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM cart_items WHERE id = ? AND session_id = ?")
        .bind(id)
        .bind(session_id)
        .execute(pool)
        .await?
        .rows_affected();
    if rows == 0 {
        return Err(item_not_found());
    }
    Ok(())
}

/// Delete every item of a session; returns the number of rows removed
pub async fn clear<'e>(executor: impl SqliteExecutor<'e>, session_id: &str) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM cart_items WHERE session_id = ?")
        .bind(session_id)
        .execute(executor)
        .await?
        .rows_affected();
    Ok(rows)
}

/// Totals at current catalog prices
pub async fn total(pool: &SqlitePool, session_id: &str) -> RepoResult<CartTotal> {
    let lines = sqlx::query_as::<_, (f64, i64)>(
        "SELECT p.price, c.quantity FROM cart_items c JOIN products p ON p.id = c.product_id WHERE c.session_id = ? ORDER BY c.id",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    Ok(CartTotal {
        item_count: lines.iter().map(|(_, q)| q).sum(),
        items: lines.len() as i64,
        total_amount: money::sum_lines(lines),
    })
}

fn item_not_found() -> RepoError {
    RepoError::Business(ErrorCode::CartItemNotFound, "Cart item not found".into())
}
