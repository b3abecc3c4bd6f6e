//! Shop Server - 小型电商后端
//!
//! # 架构概述
//!
//! - **目录** (`api/products`): 商品与分类，公开读取，管理员写入
//! - **购物车** (`api/cart`): 以客户端 session id 为键的访客购物车
//! - **订单** (`orders`): 单事务下单与扣库存，管理员状态流转
//! - **认证** (`auth`): JWT + Argon2 管理员认证
//! - **通知** (`notification`): WhatsApp 新订单/状态变更通知
//!
//! # 模块结构
//!
//! ```text
//! shop-server/src/
//! ├── core/          # 配置、状态、HTTP 服务
//! ├── auth/          # JWT、密码、中间件
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # SQLite 连接与仓储
//! ├── orders/        # 下单服务、金额、订单号
//! ├── notification/  # WhatsApp 模板与传输
//! ├── middleware/    # 请求日志
//! └── utils/         # 日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod middleware;
pub mod notification;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentAdmin, JwtService};
pub use core::{AppState, Config, Server, build_app};
pub use notification::{NotificationGateway, OrderNotifier, WhatsAppTransport};
pub use orders::OrderService;

// Re-export unified error types from shared
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

pub use utils::logger::{cleanup_old_logs, init_logger};

// Security logging macro - 写入 security 目标，由日志层单独落盘
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
   _____ __
  / ___// /_  ____  ____
  \__ \/ __ \/ __ \/ __ \
 ___/ / / / / /_/ / /_/ /
/____/_/ /_/\____/ .___/
                /_/
    "#
    );
}
