//! Record Store
//!
//! One JSON file per collection, read through a TTL cache and rewritten
//! wholesale on every mutation. The file on disk is the source of truth.
//!
//! Public reads never fail: they fall back to the last good value (or the
//! empty collection). Writes report `false`.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

use super::cache::TtlCache;
use super::collection::Collection;
use super::coordinator::{LockPolicy, WriteCoordinator, atomic_write};
use super::{StoreError, StoreResult};

/// Cache TTL in production
pub const PRODUCTION_CACHE_TTL: Duration = Duration::from_secs(30);
/// Cache TTL in development
pub const DEVELOPMENT_CACHE_TTL: Duration = Duration::from_secs(2);

/// Store tuning knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// How long a loaded collection is served without touching the disk
    pub cache_ttl: Duration,
    /// How long the scanned max id is reused
    pub id_cache_ttl: Duration,
    /// Write lock retry policy
    pub lock: LockPolicy,
}

impl StoreOptions {
    /// Defaults for the given environment; both TTLs share one value
    pub fn for_environment(production: bool) -> Self {
        let ttl = if production {
            PRODUCTION_CACHE_TTL
        } else {
            DEVELOPMENT_CACHE_TTL
        };
        Self {
            cache_ttl: ttl,
            id_cache_ttl: ttl,
            lock: LockPolicy::default(),
        }
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self::for_environment(false)
    }
}

/// Cached, file-backed collection (集合存储)
#[derive(Debug)]
pub struct RecordStore<C: Collection> {
    name: String,
    path: PathBuf,
    cache: TtlCache<C>,
    id_cache: TtlCache<i64>,
    /// Largest id observed or handed out; never decreases
    high_water: AtomicI64,
    /// Bumped on every successful write; loads that raced a write are not cached
    generation: AtomicU64,
    coordinator: WriteCoordinator,
}

impl<C: Collection> RecordStore<C> {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, options: StoreOptions) -> Self {
        let name = name.into();
        Self {
            coordinator: WriteCoordinator::new(name.clone(), options.lock),
            name,
            path: path.into(),
            cache: TtlCache::new(options.cache_ttl),
            id_cache: TtlCache::new(options.id_cache_ttl),
            high_water: AtomicI64::new(0),
            generation: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the collection, served from cache while it is fresh
    pub async fn read(&self) -> C {
        if let Some(records) = self.cache.fresh() {
            return records;
        }
        self.read_fresh().await
    }

    /// Read the collection from disk, ignoring the cache TTL
    pub async fn read_fresh(&self) -> C {
        match self.load().await {
            Ok(records) => records,
            Err(e) => {
                let last_good = self.cache.last_good();
                tracing::error!(
                    collection = %self.name,
                    path = %self.path.display(),
                    error = %e,
                    has_last_good = last_good.is_some(),
                    "Failed to load collection, serving last good value"
                );
                last_good.unwrap_or_default()
            }
        }
    }

    /// Read for a read-modify-write cycle.
    ///
    /// Unlike [`read`](Self::read), an unreadable file with no last good value
    /// is an error: rewriting it from an empty collection would drop its data.
    pub async fn read_for_update(&self) -> StoreResult<C> {
        if let Some(records) = self.cache.fresh() {
            return Ok(records);
        }
        match self.load().await {
            Ok(records) => Ok(records),
            Err(e) => match self.cache.last_good() {
                Some(records) => {
                    tracing::warn!(
                        collection = %self.name,
                        error = %e,
                        "Data file unreadable, updating from last good value"
                    );
                    Ok(records)
                }
                None => Err(e),
            },
        }
    }

    /// Persist `records` atomically. Returns `false` on any failure.
    ///
    /// On success the read cache is invalidated so the next read comes from
    /// disk; on failure it is left untouched.
    pub async fn write(&self, records: &C) -> bool {
        match self.persist(records).await {
            Ok(()) => {
                tracing::debug!(collection = %self.name, "Collection written");
                true
            }
            Err(e) => {
                tracing::error!(
                    collection = %self.name,
                    path = %self.path.display(),
                    error = %e,
                    "Failed to write collection"
                );
                false
            }
        }
    }

    /// Highest id in `records` (or ever seen by this store) plus one.
    ///
    /// The scan is cached for the id-cache TTL and refreshed after writes.
    pub fn next_id(&self, records: &C) -> i64 {
        let scanned = self.id_cache.fresh().unwrap_or_else(|| {
            let max = records.max_id();
            self.id_cache.store(max);
            max
        });
        scanned.max(self.high_water.load(Ordering::SeqCst)) + 1
    }

    /// [`next_id`](Self::next_id), and mark it as handed out so it is never returned again
    pub fn reserve_id(&self, records: &C) -> i64 {
        let id = self.next_id(records);
        self.high_water.fetch_max(id, Ordering::SeqCst);
        id
    }

    /// Force the next read to hit the disk (the last good value is kept)
    pub fn invalidate(&self) {
        self.cache.invalidate();
        self.id_cache.invalidate();
    }

    async fn load(&self) -> StoreResult<C> {
        let generation = self.generation.load(Ordering::SeqCst);

        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(self.initialize(generation).await);
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let value: serde_json::Value = serde_json::from_slice(&bytes)?;
        if !C::SHAPE.matches(&value) {
            return Err(StoreError::Shape {
                collection: self.name.clone(),
                expected: C::SHAPE,
            });
        }
        let records: C = serde_json::from_value(value)?;

        self.observe_max_id(records.max_id());
        if self.generation.load(Ordering::SeqCst) == generation {
            self.cache.store(records.clone());
        }
        Ok(records)
    }

    /// First run: persist the empty collection once.
    ///
    /// `generation` is the one seen when the load began. If a write landed
    /// since then the file is no longer missing and is left alone.
    async fn initialize(&self, generation: u64) -> C {
        let empty = C::default();
        match self.persist_if(&empty, Some(generation)).await {
            Ok(true) => {
                tracing::info!(
                    collection = %self.name,
                    path = %self.path.display(),
                    "Data file missing, created empty collection"
                );
            }
            Ok(false) => {
                tracing::debug!(
                    collection = %self.name,
                    "Data file written concurrently, skipping initialization"
                );
                return empty;
            }
            Err(e) => {
                tracing::warn!(
                    collection = %self.name,
                    error = %e,
                    "Could not create data file, continuing in memory"
                );
            }
        }
        if self.generation.load(Ordering::SeqCst) <= generation + 1 {
            self.cache.store(empty.clone());
        }
        empty
    }

    async fn persist(&self, records: &C) -> StoreResult<()> {
        self.persist_if(records, None).await.map(|_| ())
    }

    /// Write under the collection lock. With `expected`, nothing is written
    /// (and `false` returned) unless the generation still matches.
    async fn persist_if(&self, records: &C, expected: Option<u64>) -> StoreResult<bool> {
        let bytes = serde_json::to_vec_pretty(records)?;
        let (path, bytes, generation) = (&self.path, &bytes, &self.generation);

        let written = self
            .coordinator
            .with_lock(move || async move {
                if expected.is_some_and(|g| g != generation.load(Ordering::SeqCst)) {
                    return Ok(false);
                }
                atomic_write(path, bytes).await?;
                generation.fetch_add(1, Ordering::SeqCst);
                Ok(true)
            })
            .await?;

        if written {
            self.cache.invalidate();
            let max = records.max_id();
            self.id_cache.store(max);
            self.observe_max_id(max);
        }
        Ok(written)
    }

    fn observe_max_id(&self, max: i64) {
        self.high_water.fetch_max(max, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::coordinator::temp_path;
    use shared::models::{MenuItem, MenuItemInput, Settings};

    fn options(ttl: Duration) -> StoreOptions {
        StoreOptions {
            cache_ttl: ttl,
            id_cache_ttl: ttl,
            lock: LockPolicy {
                max_attempts: 20,
                base_delay: Duration::from_millis(2),
            },
        }
    }

    fn item(id: i64, name: &str) -> MenuItem {
        MenuItem::from_input(
            id,
            MenuItemInput {
                name: name.into(),
                category: "mains".into(),
                price: 9.99,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_environment_ttls() {
        let prod = StoreOptions::for_environment(true);
        let dev = StoreOptions::for_environment(false);
        assert!(prod.cache_ttl > dev.cache_ttl);
        assert_eq!(prod.cache_ttl, prod.id_cache_ttl);
    }

    #[tokio::test]
    async fn test_missing_file_self_heals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.json");
        let store: RecordStore<Vec<MenuItem>> =
            RecordStore::new("menuItems", &path, options(Duration::ZERO));

        assert!(store.read().await.is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_missing_settings_file_gets_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let store: RecordStore<Settings> =
            RecordStore::new("settings", &path, options(Duration::ZERO));

        assert_eq!(store.read().await, Settings::default());
        let on_disk: Settings =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, Settings::default());
    }

    #[tokio::test]
    async fn test_read_after_write() {
        let dir = tempfile::tempdir().unwrap();
        let store: RecordStore<Vec<MenuItem>> =
            RecordStore::new("menuItems", dir.path().join("menu.json"), options(Duration::from_secs(60)));

        let records = vec![item(1, "Burger"), item(2, "Fries")];
        assert!(store.write(&records).await);
        assert_eq!(store.read().await, records);
        assert_eq!(store.read_fresh().await, records);
    }

    #[tokio::test]
    async fn test_pretty_printed_two_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.json");
        let store: RecordStore<Vec<MenuItem>> =
            RecordStore::new("menuItems", &path, options(Duration::ZERO));

        assert!(store.write(&vec![item(1, "Burger")]).await);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n  {\n    \"id\": 1,"));
    }

    #[tokio::test]
    async fn test_cache_served_within_ttl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.json");
        let store: RecordStore<Vec<MenuItem>> =
            RecordStore::new("menuItems", &path, options(Duration::from_secs(60)));

        assert!(store.write(&vec![item(1, "Burger")]).await);
        assert_eq!(store.read().await.len(), 1);

        // Out-of-band edit is invisible until the TTL elapses or a fresh read
        std::fs::write(&path, "[]").unwrap();
        assert_eq!(store.read().await.len(), 1);
        assert!(store.read_fresh().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_serves_last_good() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.json");
        let store: RecordStore<Vec<MenuItem>> =
            RecordStore::new("menuItems", &path, options(Duration::ZERO));

        assert!(store.write(&vec![item(1, "Burger")]).await);
        assert_eq!(store.read().await.len(), 1);

        std::fs::write(&path, "[{\"id\": 1, \"name\": ").unwrap();
        let records = store.read().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Burger");
        assert!(store.read_for_update().await.is_ok());
    }

    #[tokio::test]
    async fn test_corrupt_file_without_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.json");
        std::fs::write(&path, "not json").unwrap();
        let store: RecordStore<Vec<MenuItem>> =
            RecordStore::new("menuItems", &path, options(Duration::ZERO));

        assert!(store.read().await.is_empty());
        assert!(store.read_for_update().await.is_err());
        // The damaged file is left alone for manual repair
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");
    }

    #[tokio::test]
    async fn test_wrong_shape_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let menu_path = dir.path().join("menu.json");
        std::fs::write(&menu_path, "{\"items\": []}").unwrap();
        let menu: RecordStore<Vec<MenuItem>> =
            RecordStore::new("menuItems", &menu_path, options(Duration::ZERO));
        assert!(matches!(
            menu.read_for_update().await,
            Err(StoreError::Shape { .. })
        ));

        let settings_path = dir.path().join("settings.json");
        std::fs::write(&settings_path, "[]").unwrap();
        let settings: RecordStore<Settings> =
            RecordStore::new("settings", &settings_path, options(Duration::ZERO));
        assert_eq!(settings.read().await, Settings::default());
    }

    #[tokio::test]
    async fn test_leftover_temp_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.json");
        let store: RecordStore<Vec<MenuItem>> =
            RecordStore::new("menuItems", &path, options(Duration::ZERO));

        let records = vec![item(1, "Burger")];
        assert!(store.write(&records).await);

        // A writer that died mid-write leaves a truncated temp file behind
        std::fs::write(temp_path(&path), "[{\"id\": 2, \"na").unwrap();
        assert_eq!(store.read().await, records);

        // The next write simply replaces it
        assert!(store.write(&vec![]).await);
        assert!(!temp_path(&path).exists());
    }

    #[tokio::test]
    async fn test_failed_write_keeps_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.json");
        let store: RecordStore<Vec<MenuItem>> =
            RecordStore::new("menuItems", &path, options(Duration::from_secs(60)));

        let records = vec![item(1, "Burger")];
        assert!(store.write(&records).await);
        assert_eq!(store.read().await, records);

        // Make the target unreplaceable
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("blocker"), b"x").unwrap();

        assert!(!store.write(&vec![]).await);
        assert_eq!(store.read().await, records);
    }

    #[tokio::test]
    async fn test_next_id_is_monotonic() {
        let dir = tempfile::tempdir().unwrap();
        let store: RecordStore<Vec<MenuItem>> =
            RecordStore::new("menuItems", dir.path().join("menu.json"), options(Duration::ZERO));

        let empty = store.read().await;
        assert_eq!(store.next_id(&empty), 1);
        assert_eq!(store.reserve_id(&empty), 1);
        // Reserved ids are not handed out twice
        assert_eq!(store.reserve_id(&empty), 2);

        let records = vec![item(7, "Burger")];
        assert!(store.write(&records).await);
        assert_eq!(store.next_id(&records), 8);

        // Deleting the highest id does not make it available again
        assert!(store.write(&vec![]).await);
        assert_eq!(store.next_id(&vec![]), 8);
    }

    #[tokio::test]
    async fn test_next_id_uses_cached_scan() {
        let dir = tempfile::tempdir().unwrap();
        let store: RecordStore<Vec<MenuItem>> = RecordStore::new(
            "menuItems",
            dir.path().join("menu.json"),
            options(Duration::from_secs(60)),
        );

        let first = vec![item(3, "Burger")];
        assert_eq!(store.next_id(&first), 4);
        // Within the TTL the scan is not repeated; the store relies on its own writes
        let bigger = vec![item(3, "Burger"), item(10, "Fries")];
        assert_eq!(store.next_id(&bigger), 4);

        store.invalidate();
        assert_eq!(store.next_id(&bigger), 11);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_leave_one_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.json");
        let store: RecordStore<Vec<MenuItem>> =
            RecordStore::new("menuItems", &path, options(Duration::ZERO));

        let a: Vec<MenuItem> = (1..=50).map(|id| item(id, "Burger")).collect();
        let b: Vec<MenuItem> = (100..=120).map(|id| item(id, "Fries")).collect();

        let (wrote_a, wrote_b) = tokio::join!(store.write(&a), store.write(&b));
        assert!(wrote_a && wrote_b);

        let on_disk: Vec<MenuItem> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(on_disk == a || on_disk == b);
        assert!(!temp_path(&path).exists());
    }

    #[tokio::test]
    async fn test_missing_file_not_recreated_over_newer_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.json");
        let store: RecordStore<Vec<MenuItem>> =
            RecordStore::new("menuItems", &path, options(Duration::ZERO));

        // A reader saw the file missing, then a write landed before it healed it
        let seen = store.generation.load(Ordering::SeqCst);
        let records = vec![item(1, "Burger")];
        assert!(store.write(&records).await);

        assert!(store.initialize(seen).await.is_empty());
        let on_disk: Vec<MenuItem> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, records);
        assert_eq!(store.read().await, records);
    }
}
