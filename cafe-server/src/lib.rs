//! Café Ordering Server
//!
//! # 架构概述
//!
//! Backend for the café ordering platform: web storefront (cart,
//! checkout) plus admin back office (orders, pending queue, sales
//! statistics), with real-time fan-out of order lifecycle events.
//!
//! # 模块结构
//!
//! ```text
//! cafe-server/src/
//! ├── core/          # 配置、状态、错误
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (SurrealDB models + repositories)
//! ├── message/       # 实时通知总线
//! ├── orders/        # 订单核心: cart / checkout / lifecycle / pending
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod message;
pub mod orders;
pub mod routes;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use message::Notifier;
pub use orders::{CartService, CheckoutOrchestrator, LifecycleEngine, OrderError, PendingCounter};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
///
/// 日志目录默认为 `WORK_DIR/logs`，可用 `LOG_DIR` 覆盖。
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/cafe".into());
        format!("{work_dir}/logs")
    });
    init_logger_with_file(
        std::env::var("LOG_LEVEL").ok().as_deref(),
        Some(&log_dir),
    );
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______      ____
  / ____/___ _/ __/__
 / /   / __ `/ /_/ _ \
/ /___/ /_/ / __/  __/
\____/\__,_/_/  \___/
    "#
    );
}
