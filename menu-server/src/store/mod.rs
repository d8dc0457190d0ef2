//! Store Module
//!
//! File-backed JSON collections with a read cache and serialized atomic writes.
//!
//! # 结构
//!
//! - [`RecordStore`] - 单个集合的缓存读写 (menu items / settings)
//! - [`WriteCoordinator`] - 集合级写锁 + 重试退避 + 原子替换
//! - [`TtlCache`] - 带时间戳的内存缓存

pub mod cache;
pub mod collection;
pub mod coordinator;
pub mod record_store;

pub use cache::{CachedValue, TtlCache};
pub use collection::{Collection, Shape};
pub use coordinator::{LockPolicy, WriteCoordinator, atomic_write};
pub use record_store::{RecordStore, StoreOptions};

use std::path::PathBuf;
use thiserror::Error;

/// Store error types
///
/// These never leave the store: [`RecordStore`] logs them and reports a
/// boolean / last-good value to its callers.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("write lock for '{collection}' still busy after {attempts} attempts")]
    LockContention { collection: String, attempts: u32 },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{collection} file must contain a JSON {expected}")]
    Shape {
        collection: String,
        expected: Shape,
    },
}

impl StoreError {
    /// The file exists but its content cannot be used (bad JSON or wrong shape)
    pub fn is_corruption(&self) -> bool {
        matches!(self, StoreError::Json(_) | StoreError::Shape { .. })
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
