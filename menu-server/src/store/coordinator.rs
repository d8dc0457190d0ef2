//! Write Coordinator
//!
//! Serializes writes to one collection file and performs the atomic
//! temp-file-then-rename replacement.
//!
//! The lock is process-local: two server processes sharing a data directory
//! are not coordinated.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::{StoreError, StoreResult};

/// Default lock acquisition attempts
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
/// Default base delay between attempts (multiplied by the attempt number)
pub const DEFAULT_RETRY_DELAY_MS: u64 = 50;

/// Bounded retry policy for lock acquisition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for LockPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

/// Per-collection write lock (写入协调器)
#[derive(Debug)]
pub struct WriteCoordinator {
    collection: String,
    lock: Mutex<()>,
    policy: LockPolicy,
}

impl WriteCoordinator {
    pub fn new(collection: impl Into<String>, policy: LockPolicy) -> Self {
        Self {
            collection: collection.into(),
            lock: Mutex::new(()),
            policy,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Run `op` while holding the collection lock.
    ///
    /// When the lock is held, waits `base_delay × attempt` and retries, giving
    /// up with [`StoreError::LockContention`] after `max_attempts`. The lock
    /// is released when `op` finishes, whether it succeeded or not.
    pub async fn with_lock<F, Fut, R>(&self, op: F) -> StoreResult<R>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = StoreResult<R>>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        let _guard = loop {
            attempt += 1;
            match self.lock.try_lock() {
                Ok(guard) => break guard,
                Err(_) if attempt < max_attempts => {
                    let delay = self.policy.base_delay * attempt;
                    tracing::debug!(
                        collection = %self.collection,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Write lock busy, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(_) => {
                    tracing::warn!(
                        collection = %self.collection,
                        attempts = attempt,
                        "Write lock still busy, giving up"
                    );
                    return Err(StoreError::LockContention {
                        collection: self.collection.clone(),
                        attempts: attempt,
                    });
                }
            }
        };

        op().await
    }
}

/// Temp file used while replacing `path` (`menu.json` -> `menu.json.tmp`)
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replace `path` with `bytes` atomically: write + fsync a temp file, then rename.
///
/// Readers see either the previous file or the new one, never a partial write.
/// The temp file is removed if any step fails.
pub async fn atomic_write(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let tmp = temp_path(path);

    let result = async {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&tmp, path).await
    }
    .await;

    if let Err(source) = result {
        if let Err(e) = tokio::fs::remove_file(&tmp).await
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(path = %tmp.display(), error = %e, "Failed to remove temp file");
        }
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}
