use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;

use crate::store::coordinator::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_MS};
use crate::store::{LockPolicy, StoreOptions};
use crate::utils::time::parse_timezone;

/// 菜单数据文件名
pub const MENU_FILE: &str = "menu.json";
/// 设置数据文件名
pub const SETTINGS_FILE: &str = "settings.json";

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATA_DIR | ./data | JSON 数据目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | CACHE_TTL_MS | 2000 / 30000 (production) | 读缓存有效期 |
/// | ID_CACHE_TTL_MS | = CACHE_TTL_MS | 最大 ID 缓存有效期 |
/// | LOCK_MAX_ATTEMPTS | 5 | 写锁重试次数 |
/// | LOCK_RETRY_DELAY_MS | 50 | 写锁重试基础间隔 |
/// | TIMEZONE | Europe/Madrid | 营业时区 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (unset) | 日志文件目录 |
///
/// # 示例
///
/// ```ignore
/// DATA_DIR=/srv/menu HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 数据目录 (menu.json / settings.json)
    pub data_dir: PathBuf,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | production
    pub environment: String,
    /// 读缓存有效期 (毫秒)
    pub cache_ttl_ms: u64,
    /// 最大 ID 缓存有效期 (毫秒)
    pub id_cache_ttl_ms: u64,
    /// 写锁最大尝试次数
    pub lock_max_attempts: u32,
    /// 写锁重试基础间隔 (毫秒)
    pub lock_retry_delay_ms: u64,
    /// 营业时区 (IANA 名称)
    pub timezone: String,
    /// 日志级别
    pub log_level: String,
    /// 日志文件目录，未设置时只输出到终端
    pub log_dir: Option<String>,
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let default_ttl = StoreOptions::for_environment(environment == "production").cache_ttl;
        let cache_ttl_ms =
            env_parse("CACHE_TTL_MS").unwrap_or(default_ttl.as_millis() as u64);

        Self {
            data_dir: std::env::var("DATA_DIR")
                .unwrap_or_else(|_| "./data".into())
                .into(),
            http_port: env_parse("HTTP_PORT").unwrap_or(3000),
            environment,
            cache_ttl_ms,
            id_cache_ttl_ms: env_parse("ID_CACHE_TTL_MS").unwrap_or(cache_ttl_ms),
            lock_max_attempts: env_parse("LOCK_MAX_ATTEMPTS").unwrap_or(DEFAULT_MAX_ATTEMPTS),
            lock_retry_delay_ms: env_parse("LOCK_RETRY_DELAY_MS")
                .unwrap_or(DEFAULT_RETRY_DELAY_MS),
            timezone: std::env::var("TIMEZONE").unwrap_or_else(|_| "Europe/Madrid".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(data_dir: impl Into<PathBuf>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.data_dir = data_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn menu_file(&self) -> PathBuf {
        self.data_dir.join(MENU_FILE)
    }

    pub fn settings_file(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE)
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            cache_ttl: Duration::from_millis(self.cache_ttl_ms),
            id_cache_ttl: Duration::from_millis(self.id_cache_ttl_ms),
            lock: LockPolicy {
                max_attempts: self.lock_max_attempts,
                base_delay: Duration::from_millis(self.lock_retry_delay_ms),
            },
        }
    }

    /// 营业时区，无法识别时回退到 UTC
    pub fn timezone(&self) -> Tz {
        parse_timezone(&self.timezone)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
