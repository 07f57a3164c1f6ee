use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db::DbService;
use crate::message::{Notifier, NotifierConfig};
use crate::orders::{CartService, CheckoutOrchestrator, LifecycleEngine, PendingCounter, UserLocks};

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 使用 Arc/clone 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | 嵌入式数据库 (SurrealDB) |
/// | notifier | 实时通知总线 |
/// | cart | 购物车服务 |
/// | checkout | 结账编排器 |
/// | lifecycle | 订单状态机引擎 |
///
/// The notifier and the engines are constructed once here and injected
/// into each other - no hidden startup-order coupling.
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// 实时通知总线
    pub notifier: Notifier,
    /// 购物车服务
    pub cart: CartService,
    /// 结账编排器
    pub checkout: CheckoutOrchestrator,
    /// 订单状态机引擎
    pub lifecycle: Arc<LifecycleEngine>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database)
    /// 3. 通知总线与订单服务
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        let db_dir = config.database_dir();
        std::fs::create_dir_all(&db_dir)?;
        let db_path = db_dir.join("cafe.db");

        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to initialize database: {e}"))?;

        Ok(Self::with_db(config.clone(), db_service.db))
    }

    /// 基于现有数据库句柄构造 (测试使用内存数据库)
    pub fn with_db(config: Config, db: Surreal<Db>) -> Self {
        let notifier = Notifier::from_config(NotifierConfig {
            channel_capacity: config.bus_channel_capacity,
        });

        // One lock registry for cart writes and checkouts
        let locks = UserLocks::new();
        let lifecycle = Arc::new(LifecycleEngine::new(db.clone(), notifier.clone()));
        let checkout = CheckoutOrchestrator::new(db.clone(), lifecycle.clone(), locks.clone());
        let cart = CartService::new(db.clone(), locks);

        Self {
            config,
            db,
            notifier,
            cart,
            checkout,
            lifecycle,
        }
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 悬挂订单计数器
    pub fn pending(&self) -> &PendingCounter {
        self.lifecycle.pending()
    }
}
