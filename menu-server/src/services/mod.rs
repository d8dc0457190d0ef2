//! 服务层 - 菜单与设置的业务逻辑
//!
//! # 服务列表
//!
//! - [`MenuService`] - 菜品增删改查 + 供应状态计算
//! - [`SettingsService`] - 主题与分类筛选设置
//!
//! Both services serialize their read-modify-write cycles with a
//! `tokio::sync::Mutex`; reads go straight to the store cache.

pub mod menu;
pub mod settings;

pub use menu::{MenuError, MenuItemView, MenuResult, MenuService};
pub use settings::{SettingsError, SettingsResult, SettingsService};
