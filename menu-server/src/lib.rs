//! Menu Server - 餐厅菜单内容管理
//!
//! # 架构概述
//!
//! - **存储** (`store`): 每个集合一个 JSON 文件，TTL 读缓存 + 串行化原子写入
//! - **供应时段** (`availability`): 按星期 / 日期 / 时段计算菜品是否可售
//! - **服务** (`services`): 菜品与设置的业务规则
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! menu-server/src/
//! ├── core/          # 配置、状态、错误、HTTP 服务器
//! ├── store/         # Record Store / Write Coordinator / 缓存
//! ├── availability/  # 供应时段计算
//! ├── services/      # 菜品服务、设置服务
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志、时间、校验
//! ```

pub mod api;
pub mod availability;
pub mod core;
pub mod services;
pub mod store;
pub mod utils;

// Re-export 公共类型
pub use availability::{Availability, UnavailableReason, evaluate};
pub use core::{Config, Server, ServerState};
pub use services::{MenuService, SettingsService};
pub use store::{RecordStore, StoreOptions};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

/// Load `.env`, build the [`Config`] and initialize logging from it
pub fn setup_environment() -> anyhow::Result<Config> {
    if let Err(e) = dotenv::dotenv()
        && !e.not_found()
    {
        return Err(anyhow::anyhow!("Failed to load .env: {e}"));
    }

    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    __  ___
   /  |/  /__  ____  __  __
  / /|_/ / _ \/ __ \/ / / /
 / /  / /  __/ / / / /_/ /
/_/  /_/\___/_/ /_/\__,_/
    "#
    );
}
