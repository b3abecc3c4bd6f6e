//! Category Repository

use super::{RepoError, RepoResult, page_bounds};
use shared::error::ErrorCode;
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use shared::util::now_millis;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, name, description, is_active, created_at, updated_at";

/// Active categories, ordered by id
pub async fn find_all_active(
    pool: &SqlitePool,
    skip: Option<i64>,
    limit: Option<i64>,
) -> RepoResult<Vec<Category>> {
    let (skip, limit) = page_bounds(skip, limit);
    let rows = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM categories WHERE is_active = 1 ORDER BY id LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Find category by id regardless of its active flag
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let row = sqlx::query_as::<_, Category>(&format!("SELECT {COLUMNS} FROM categories WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_active_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    Ok(find_by_id(pool, id).await?.filter(|c| c.is_active))
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Category>> {
    let row = sqlx::query_as::<_, Category>(&format!("SELECT {COLUMNS} FROM categories WHERE name = ? LIMIT 1"))
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: CategoryCreate) -> RepoResult<Category> {
    if find_by_name(pool, &data.name).await?.is_some() {
        return Err(name_exists(&data.name));
    }

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO categories (name, description, is_active, created_at) VALUES (?, ?, 1, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(now_millis())
    .fetch_one(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => name_exists(&data.name),
        other => other,
    })?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: CategoryUpdate) -> RepoResult<Category> {
    let existing = find_by_id(pool, id).await?.ok_or_else(|| not_found(id))?;

    // Check duplicate name if changing
    if let Some(ref new_name) = data.name
        && new_name != &existing.name
        && find_by_name(pool, new_name).await?.is_some()
    {
        return Err(name_exists(new_name));
    }

    sqlx::query(
        "UPDATE categories SET name = COALESCE(?, name), description = COALESCE(?, description), is_active = COALESCE(?, is_active), updated_at = ? WHERE id = ?",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.is_active)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id).await?.ok_or_else(|| not_found(id))
}

/// Soft delete; product associations are kept
pub async fn soft_delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE categories SET is_active = 0, updated_at = ? WHERE id = ?")
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows > 0)
}

fn not_found(id: i64) -> RepoError {
    RepoError::Business(ErrorCode::CategoryNotFound, format!("Category {} not found", id))
}

fn name_exists(name: &str) -> RepoError {
    RepoError::Business(
        ErrorCode::CategoryNameExists,
        format!("Category '{}' already exists", name),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::product;
    use crate::db::test_pool;
    use shared::models::ProductQuery;

    fn named(name: &str) -> CategoryCreate {
        CategoryCreate {
            name: name.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name() {
        let pool = test_pool().await;
        create(&pool, named("Kitchen")).await.unwrap();
        let err = create(&pool, named("Kitchen")).await.unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::CategoryNameExists, _)));
    }

    #[tokio::test]
    async fn test_rename_onto_existing_name_is_rejected() {
        let pool = test_pool().await;
        create(&pool, named("Garden")).await.unwrap();
        let tools = create(&pool, named("Tools")).await.unwrap();

        let err = update(
            &pool,
            tools.id,
            CategoryUpdate {
                name: Some("Garden".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::CategoryNameExists, _)));

        // same name is a no-op rename
        let same = update(
            &pool,
            tools.id,
            CategoryUpdate {
                name: Some("Tools".into()),
                description: Some("Hand tools".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(same.description.as_deref(), Some("Hand tools"));
    }

    #[tokio::test]
    async fn test_deactivation_keeps_product_associations() {
        let pool = test_pool().await;
        let cat = create(&pool, named("Seasonal")).await.unwrap();
        let mut data = product::tests::sample("SEA1", 3.0, 4);
        data.category_ids = vec![cat.id];
        let p = product::create(&pool, data).await.unwrap();
        assert_eq!(p.categories.len(), 1);

        assert!(soft_delete(&pool, cat.id).await.unwrap());

        // category leaves the active set
        assert!(find_active_by_id(&pool, cat.id).await.unwrap().is_none());
        assert!(find_all_active(&pool, None, None).await.unwrap().is_empty());
        // product stays active, association row stays
        let reloaded = product::find_active_by_id(&pool, p.id).await.unwrap().unwrap();
        assert!(reloaded.categories.is_empty());
        assert_eq!(product::linked_category_ids(&pool, p.id).await.unwrap(), vec![cat.id]);
        // the category filter still resolves through the retained row
        let by_cat = ProductQuery {
            category_id: Some(cat.id),
            ..Default::default()
        };
        assert_eq!(product::find_all(&pool, &by_cat).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let pool = test_pool().await;
        let err = update(&pool, 42, CategoryUpdate::default()).await.unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::CategoryNotFound, _)));
    }
}
