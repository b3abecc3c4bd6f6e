//! Product Repository

use super::{RepoError, RepoResult, page_bounds};
use shared::error::ErrorCode;
use shared::models::{Category, Product, ProductCreate, ProductQuery, ProductUpdate};
use shared::util::now_millis;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqliteExecutor, SqlitePool};

const COLUMNS: &str = "id, name, description, price, sku, stock_quantity, image_url, is_active, weight, dimensions, created_at, updated_at";

/// Catalog search over active products, ordered by id
pub async fn find_all(pool: &SqlitePool, query: &ProductQuery) -> RepoResult<Vec<Product>> {
    let (skip, limit) = page_bounds(query.skip, query.limit);

    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM products WHERE is_active = 1"));

    if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        // SQLite LIKE is case-insensitive for ASCII
        let pattern = format!("%{}%", escape_like(term));
        qb.push(" AND (name LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR description LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
    if let Some(category_id) = query.category_id {
        qb.push(" AND id IN (SELECT product_id FROM product_categories WHERE category_id = ")
            .push_bind(category_id)
            .push(")");
    }
    if let Some(min) = query.min_price {
        qb.push(" AND price >= ").push_bind(min);
    }
    if let Some(max) = query.max_price {
        qb.push(" AND price <= ").push_bind(max);
    }
    match query.in_stock {
        Some(true) => {
            qb.push(" AND stock_quantity > 0");
        }
        Some(false) => {
            qb.push(" AND stock_quantity = 0");
        }
        None => {}
    }
    qb.push(" ORDER BY id LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(skip);

    let mut products = qb.build_query_as::<Product>().fetch_all(pool).await?;
    for product in &mut products {
        product.categories = find_active_categories(pool, product.id).await?;
    }
    Ok(products)
}

/// Find a product by id regardless of its active flag (no relations loaded)
pub async fn find_by_id<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
) -> RepoResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!("SELECT {COLUMNS} FROM products WHERE id = ?"))
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(product)
}

/// Find an active product with its active categories
pub async fn find_active_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let Some(mut product) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    if !product.is_active {
        return Ok(None);
    }
    product.categories = find_active_categories(pool, id).await?;
    Ok(Some(product))
}

pub async fn find_by_sku(pool: &SqlitePool, sku: &str) -> RepoResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!("SELECT {COLUMNS} FROM products WHERE sku = ?"))
        .bind(sku)
        .fetch_optional(pool)
        .await?;
    Ok(product)
}

/// Active categories linked to a product
pub async fn find_active_categories(pool: &SqlitePool, product_id: i64) -> RepoResult<Vec<Category>> {
    let rows = sqlx::query_as::<_, Category>(
        "SELECT c.id, c.name, c.description, c.is_active, c.created_at, c.updated_at FROM categories c JOIN product_categories pc ON pc.category_id = c.id WHERE pc.product_id = ? AND c.is_active = 1 ORDER BY c.id",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// All association rows for a product, including inactive categories
pub async fn linked_category_ids(pool: &SqlitePool, product_id: i64) -> RepoResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT category_id FROM product_categories WHERE product_id = ? ORDER BY category_id",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(ids)
}

pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    if find_by_sku(pool, &data.sku).await?.is_some() {
        return Err(RepoError::Business(
            ErrorCode::SkuExists,
            format!("Product with SKU '{}' already exists", data.sku),
        ));
    }

    let now = now_millis();
    let mut tx = pool.begin().await?;

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO products (name, description, price, sku, stock_quantity, image_url, is_active, weight, dimensions, created_at) VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(&data.sku)
    .bind(data.stock_quantity)
    .bind(&data.image_url)
    .bind(data.weight)
    .bind(&data.dimensions)
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| sku_conflict(e, &data.sku))?;

    link_categories(&mut *tx, id, &data.category_ids).await?;
    tx.commit().await?;

    find_active_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

/// Partial update; `category_ids` replaces the association set when present
pub async fn update(pool: &SqlitePool, id: i64, data: ProductUpdate) -> RepoResult<Product> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Business(ErrorCode::ProductNotFound, format!("Product {} not found", id)))?;

    let now = now_millis();
    let mut tx = pool.begin().await?;

    sqlx::query(
        "UPDATE products SET name = COALESCE(?1, name), description = COALESCE(?2, description), price = COALESCE(?3, price), stock_quantity = COALESCE(?4, stock_quantity), image_url = COALESCE(?5, image_url), is_active = COALESCE(?6, is_active), weight = COALESCE(?7, weight), dimensions = COALESCE(?8, dimensions), updated_at = ?9 WHERE id = ?10",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.stock_quantity)
    .bind(&data.image_url)
    .bind(data.is_active)
    .bind(data.weight)
    .bind(&data.dimensions)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if let Some(category_ids) = &data.category_ids {
        sqlx::query("DELETE FROM product_categories WHERE product_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        link_categories(&mut *tx, id, category_ids).await?;
    }
    tx.commit().await?;

    let mut product = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Business(ErrorCode::ProductNotFound, format!("Product {} not found", id)))?;
    product.categories = find_active_categories(pool, id).await?;
    Ok(product)
}

/// Soft delete (is_active = 0); the row and its associations stay
pub async fn soft_delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE products SET is_active = 0, updated_at = ? WHERE id = ?")
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows > 0)
}

/// Compare-and-decrement; returns `false` when stock is below `quantity`
pub async fn decrement_stock(conn: &mut SqliteConnection, id: i64, quantity: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE products SET stock_quantity = stock_quantity - ?1, updated_at = ?2 WHERE id = ?3 AND stock_quantity >= ?1",
    )
    .bind(quantity)
    .bind(now_millis())
    .bind(id)
    .execute(conn)
    .await?
    .rows_affected();
    Ok(rows == 1)
}

/// Link existing categories; unknown ids are skipped
async fn link_categories(conn: &mut SqliteConnection, product_id: i64, category_ids: &[i64]) -> RepoResult<()> {
    for category_id in category_ids {
        sqlx::query(
            "INSERT OR IGNORE INTO product_categories (product_id, category_id) SELECT ?, id FROM categories WHERE id = ?",
        )
        .bind(product_id)
        .bind(category_id)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

fn sku_conflict(err: sqlx::Error, sku: &str) -> RepoError {
    match RepoError::from(err) {
        RepoError::Duplicate(_) => RepoError::Business(
            ErrorCode::SkuExists,
            format!("Product with SKU '{}' already exists", sku),
        ),
        other => other,
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
