//! Admin registration and login

use shared::models::{Admin, AdminCreate, AdminLogin, TokenResponse};
use sqlx::SqlitePool;
use validator::Validate;

use super::{JwtService, password};
use crate::db::repository::admin;
use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Registration rules
#[derive(Debug, Validate)]
struct Registration {
    #[validate(length(min = 3, max = 50, message = "Username must be at least 3 characters"))]
    username: String,
    #[validate(email(message = "Invalid email address"))]
    email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be at least 8 characters"))]
    password: String,
}

/// Create an admin account
pub async fn register_admin(pool: &SqlitePool, data: AdminCreate) -> AppResult<Admin> {
    let registration = Registration {
        username: data.username.trim().to_string(),
        email: data.email.trim().to_lowercase(),
        password: data.password,
    };
    if let Err(errors) = registration.validate() {
        let err = match errors.field_errors().keys().next().map(|k| k.as_ref()) {
            Some("password") => AppError::with_message(
                ErrorCode::PasswordTooShort,
                "Password must be at least 8 characters",
            ),
            _ => AppError::validation(errors.to_string()),
        };
        return Err(err);
    }

    let hashed = password::hash_password(&registration.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;
    let admin = admin::create(pool, &registration.username, &registration.email, &hashed).await?;

    tracing::info!(admin_id = admin.id, username = %admin.username, "Admin registered");
    Ok(admin)
}

/// Check credentials and issue a bearer token
pub async fn login(pool: &SqlitePool, jwt: &JwtService, data: AdminLogin) -> AppResult<TokenResponse> {
    let admin = admin::find_by_username(pool, data.username.trim()).await?;

    let admin = match admin {
        Some(admin) if password::verify_password(&data.password, &admin.hashed_password) => admin,
        _ => {
            security_log!("WARN", "login_failed", username = data.username.clone());
            return Err(AppError::invalid_credentials());
        }
    };

    if !admin.is_active {
        security_log!("WARN", "login_inactive", username = admin.username.clone());
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let access_token = jwt
        .generate_token(&admin)
        .map_err(|e| AppError::internal(e.to_string()))?;

    tracing::info!(admin_id = admin.id, "Admin logged in");
    Ok(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: jwt.expires_in(),
        admin,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{DEV_JWT_SECRET, JwtConfig};
    use crate::db::test_pool;

    fn registration(username: &str, email: &str, password: &str) -> AdminCreate {
        AdminCreate {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    fn jwt() -> JwtService {
        JwtService::new(JwtConfig::new(DEV_JWT_SECRET, 30))
    }

    #[tokio::test]
    async fn test_register_rules() {
        let pool = test_pool().await;
        let err = register_admin(&pool, registration("ab", "a@example.com", "password1"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = register_admin(&pool, registration("abc", "not-an-email", "password1"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = register_admin(&pool, registration("abc", "a@example.com", "short"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PasswordTooShort);

        let admin = register_admin(&pool, registration("abc", "A@Example.com", "password1"))
            .await
            .unwrap();
        assert_eq!(admin.email, "a@example.com");
        assert_ne!(admin.hashed_password, "password1");

        let err = register_admin(&pool, registration("abc", "b@example.com", "password1"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AdminExists);
    }

    #[tokio::test]
    async fn test_login() {
        let pool = test_pool().await;
        register_admin(&pool, registration("owner", "owner@example.com", "s3cret-pass"))
            .await
            .unwrap();
        let jwt = jwt();

        let token = login(
            &pool,
            &jwt,
            AdminLogin {
                username: "owner".into(),
                password: "s3cret-pass".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(token.token_type, "bearer");
        assert_eq!(token.expires_in, 1800);
        assert_eq!(jwt.validate_token(&token.access_token).unwrap().username, "owner");

        for (username, password) in [("owner", "wrong-pass"), ("ghost", "s3cret-pass")] {
            let err = login(
                &pool,
                &jwt,
                AdminLogin {
                    username: username.into(),
                    password: password.into(),
                },
            )
            .await
            .unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidCredentials);
        }
    }

    #[tokio::test]
    async fn test_inactive_admin_cannot_login() {
        let pool = test_pool().await;
        let admin = register_admin(&pool, registration("old", "old@example.com", "password1"))
            .await
            .unwrap();
        admin::set_active(&pool, admin.id, false).await.unwrap();

        let err = login(
            &pool,
            &jwt(),
            AdminLogin {
                username: "old".into(),
                password: "password1".into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::AccountDisabled);
    }
}
