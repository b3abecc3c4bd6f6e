//! Admin Repository

use super::{RepoError, RepoResult};
use shared::error::ErrorCode;
use shared::models::Admin;
use shared::util::now_millis;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, username, email, hashed_password, is_active, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Admin>> {
    let admin = sqlx::query_as::<_, Admin>(&format!("SELECT {COLUMNS} FROM admins WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(admin)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<Admin>> {
    let admin = sqlx::query_as::<_, Admin>(&format!("SELECT {COLUMNS} FROM admins WHERE username = ?"))
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(admin)
}

/// First registered admin, if any
pub async fn find_first(pool: &SqlitePool) -> RepoResult<Option<Admin>> {
    let admin = sqlx::query_as::<_, Admin>(&format!("SELECT {COLUMNS} FROM admins ORDER BY id LIMIT 1"))
        .fetch_optional(pool)
        .await?;
    Ok(admin)
}

/// Insert an admin with an already-hashed password
pub async fn create(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    hashed_password: &str,
) -> RepoResult<Admin> {
    let taken = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM admins WHERE username = ? OR email = ?",
    )
    .bind(username)
    .bind(email)
    .fetch_one(pool)
    .await?;
    if taken > 0 {
        return Err(already_registered());
    }

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO admins (username, email, hashed_password, is_active, created_at) VALUES (?, ?, ?, 1, ?) RETURNING id",
    )
    .bind(username)
    .bind(email)
    .bind(hashed_password)
    .bind(now_millis())
    .fetch_one(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => already_registered(),
        other => other,
    })?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create admin".into()))
}

pub async fn set_active(pool: &SqlitePool, id: i64, is_active: bool) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE admins SET is_active = ?, updated_at = ? WHERE id = ?")
        .bind(is_active)
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows > 0)
}

fn already_registered() -> RepoError {
    RepoError::Business(
        ErrorCode::AdminExists,
        "Email or username already registered".into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = test_pool().await;
        let admin = create(&pool, "root", "root@example.com", "$argon2id$x").await.unwrap();
        assert!(admin.is_active);
        let found = find_by_username(&pool, "root").await.unwrap().unwrap();
        assert_eq!(found.id, admin.id);
        assert_eq!(found.hashed_password, "$argon2id$x");
    }

    #[tokio::test]
    async fn test_find_first() {
        let pool = test_pool().await;
        assert!(find_first(&pool).await.unwrap().is_none());
        let first = create(&pool, "alpha", "alpha@example.com", "h").await.unwrap();
        create(&pool, "beta", "beta@example.com", "h").await.unwrap();
        assert_eq!(find_first(&pool).await.unwrap().unwrap().id, first.id);
    }

    #[tokio::test]
    async fn test_duplicate_username_or_email() {
        let pool = test_pool().await;
        create(&pool, "root", "root@example.com", "h").await.unwrap();
        let err = create(&pool, "root", "other@example.com", "h").await.unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::AdminExists, _)));
        let err = create(&pool, "other", "root@example.com", "h").await.unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::AdminExists, _)));
    }

    #[tokio::test]
    async fn test_set_active() {
        let pool = test_pool().await;
        let admin = create(&pool, "ops", "ops@example.com", "h").await.unwrap();
        assert!(set_active(&pool, admin.id, false).await.unwrap());
        assert!(!find_by_id(&pool, admin.id).await.unwrap().unwrap().is_active);
        assert!(!set_active(&pool, 999, false).await.unwrap());
    }
}
