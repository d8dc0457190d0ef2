use std::sync::Arc;

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use shared::models::{MenuItem, Settings};

use crate::core::Config;
use crate::services::{MenuService, SettingsService};
use crate::store::RecordStore;
use crate::utils::time::local_now;

/// 服务器状态 - 持有所有服务的单例引用
///
/// 使用 Arc 实现浅拷贝，每个 handler 拿到的都是同一组服务。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | menu | Arc<MenuService> | 菜品服务 |
/// | settings | Arc<SettingsService> | 设置服务 |
/// | tz | Tz | 营业时区 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub menu: Arc<MenuService>,
    pub settings: Arc<SettingsService>,
    pub tz: Tz,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 创建数据目录与两个集合存储；数据文件在第一次读取时生成。
    pub async fn initialize(config: &Config) -> crate::core::Result<Self> {
        tokio::fs::create_dir_all(config.data_dir()).await?;

        let options = config.store_options();
        let menu_store: RecordStore<Vec<MenuItem>> =
            RecordStore::new("menuItems", config.menu_file(), options);
        let settings_store: RecordStore<Settings> =
            RecordStore::new("settings", config.settings_file(), options);

        let state = Self {
            config: config.clone(),
            menu: Arc::new(MenuService::new(Arc::new(menu_store))),
            settings: Arc::new(SettingsService::new(Arc::new(settings_store))),
            tz: config.timezone(),
        };

        // Warm both caches (and create missing files) before serving
        let items = state.menu.count().await;
        let _ = state.settings.get().await;
        tracing::info!(
            data_dir = %config.data_dir().display(),
            items,
            timezone = %state.tz,
            "Server state initialized"
        );

        Ok(state)
    }

    /// 营业时区的当前本地时间
    pub fn now(&self) -> NaiveDateTime {
        local_now(self.tz)
    }
}
