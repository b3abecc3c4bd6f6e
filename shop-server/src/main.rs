use shop_server::{AppState, Config, Server, init_logger, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 加载配置 (.env + 环境变量)
    let config = Config::from_env()?;

    // 2. 日志
    init_logger(&config.log_level, config.log_json, config.log_dir.as_deref())?;

    print_banner();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Shop Server starting...");

    if !config.is_production() {
        tracing::warn!("Running in development mode");
    }
    if config.uses_dev_jwt_secret() {
        tracing::warn!("JWT_SECRET not set, using the development key");
    }

    // 3. 数据库、JWT、通知
    let state = AppState::initialize(config.clone()).await?;

    // 4. 启动 HTTP 服务器
    let server = Server::new(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}
