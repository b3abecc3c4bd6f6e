//! Create the first admin account
//!
//! ```text
//! create-admin <username> <email> <password>
//! ```
//!
//! Uses `DATABASE_PATH` (default `shop.db`) and refuses to run once any
//! admin exists; further admins go through the register endpoint.

use anyhow::{Context, bail};
use shared::models::AdminCreate;
use shop_server::auth::service::register_admin;
use shop_server::db::DbService;
use shop_server::db::repository::admin;
use shop_server::init_logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logger("warn", false, None)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [username, email, password] = args.as_slice() else {
        bail!("usage: create-admin <username> <email> <password>");
    };

    let db_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| "shop.db".to_string());
    let db = DbService::new(&db_path)
        .await
        .with_context(|| format!("opening database {db_path}"))?;

    if let Some(existing) = admin::find_first(&db.pool).await? {
        println!("Admin user already exists: {}", existing.username);
        return Ok(());
    }

    let created = register_admin(
        &db.pool,
        AdminCreate {
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            password: password.clone(),
        },
    )
    .await?;

    println!("✅ Admin user '{}' created", created.username);
    println!("   Email: {}", created.email);
    println!("   ID:    {}", created.id);
    println!("Log in with POST /api/v1/auth/admin/login");
    Ok(())
}
