//! Two-tier prompt cache keyed by request fingerprint.
//!
//! - Memory tier: bounded LRU (256 entries) behind one mutex, no expiry.
//! - Disk tier: one `<key>.json` file per prompt, written atomically,
//!   optionally expired by file age at read time.
//!
//! The disk tier is the source of truth across restarts; the memory tier is
//! refilled from it lazily. Disk failures never surface to callers.

use std::io::Write;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use lru::LruCache;
use serde::{Deserialize, Serialize};

use super::CacheIoError;

/// Memory tier capacity.
pub const MEMORY_CAPACITY: usize = 256;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Disk TTL from a day count. 0 means entries never expire.
pub fn ttl_from_days(days: u32) -> Option<Duration> {
    if days == 0 {
        None
    } else {
        Some(Duration::from_secs(u64::from(days) * SECONDS_PER_DAY))
    }
}

// ═══════════════════════════════════════════════════════════
// Memory tier
// ═══════════════════════════════════════════════════════════

/// Bounded recency-ordered map. All access goes through one lock.
pub struct MemoryTier {
    entries: Mutex<LruCache<String, String>>,
}

impl MemoryTier {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Look up and mark as most recently used.
    pub fn get(&self, key: &str) -> Option<String> {
        match self.entries.lock() {
            Ok(mut entries) => entries.get(key).cloned(),
            Err(_) => None,
        }
    }

    /// Insert or overwrite; evicts the least recently used entry when full.
    pub fn put(&self, key: &str, prompt: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.put(key.to_string(), prompt.to_string());
        }
    }

    /// Presence check that leaves recency untouched.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.contains(key))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Disk tier
// ═══════════════════════════════════════════════════════════

/// On-disk record format.
#[derive(Debug, Serialize, Deserialize)]
struct DiskRecord {
    prompt: String,
}

/// One JSON file per fingerprint under `base_dir`.
pub struct DiskTier {
    base_dir: PathBuf,
}

impl DiskTier {
    /// Create the tier; a directory that cannot be created only disables writes.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        if let Err(e) = std::fs::create_dir_all(&base_dir) {
            tracing::debug!(dir = %base_dir.display(), error = %e, "Prompt cache directory unavailable");
        }
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }

    /// Read a prompt. Missing, expired or unreadable entries are `None`.
    pub fn get(&self, key: &str, max_age: Option<Duration>) -> Option<String> {
        match self.try_get(key, max_age) {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!(key = %short(key), error = %e, "Disk cache read failed, treating as miss");
                None
            }
        }
    }

    /// Write a prompt. Failures are logged and dropped.
    pub fn put(&self, key: &str, prompt: &str) {
        if let Err(e) = self.try_put(key, prompt) {
            tracing::debug!(key = %short(key), error = %e, "Disk cache write skipped");
        }
    }

    fn try_get(&self, key: &str, max_age: Option<Duration>) -> Result<Option<String>, CacheIoError> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }

        if let Some(max_age) = max_age {
            let modified = std::fs::metadata(&path)?.modified()?;
            // A clock earlier than the mtime means the file is fresh.
            let age = SystemTime::now()
                .duration_since(modified)
                .unwrap_or(Duration::ZERO);
            if age > max_age {
                tracing::debug!(key = %short(key), age_secs = age.as_secs(), "Disk cache entry expired");
                return Ok(None);
            }
        }

        let data = std::fs::read_to_string(&path)?;
        let record: DiskRecord = serde_json::from_str(&data)?;
        Ok(Some(record.prompt))
    }

    /// Write to a temp file in the same directory, then rename over the target
    /// so readers never observe a partial record.
    fn try_put(&self, key: &str, prompt: &str) -> Result<(), CacheIoError> {
        std::fs::create_dir_all(&self.base_dir)?;
        let json = serde_json::to_vec(&DiskRecord {
            prompt: prompt.to_string(),
        })?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.base_dir)?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.persist(self.path(key))
            .map_err(|e| CacheIoError::Persist(e.error.to_string()))?;
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════
// PromptCache: both tiers
// ═══════════════════════════════════════════════════════════

/// Shared prompt cache. Wrap in `Arc` to share across generators.
pub struct PromptCache {
    memory: MemoryTier,
    disk: DiskTier,
}

impl PromptCache {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self::with_capacity(base_dir, MEMORY_CAPACITY)
    }

    pub fn with_capacity(base_dir: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            memory: MemoryTier::new(capacity),
            disk: DiskTier::new(base_dir),
        }
    }

    /// Memory tier first, then disk (respecting `max_age`). A disk hit is
    /// copied back into memory.
    pub fn get(&self, key: &str, max_age: Option<Duration>) -> Option<String> {
        if let Some(hit) = self.memory.get(key).filter(|p| !p.is_empty()) {
            tracing::debug!(key = %short(key), "Memory cache hit");
            return Some(hit);
        }

        let hit = self.disk.get(key, max_age).filter(|p| !p.is_empty())?;
        tracing::debug!(key = %short(key), "Disk cache hit");
        self.memory.put(key, &hit);
        Some(hit)
    }

    /// Write both tiers.
    pub fn put(&self, key: &str, prompt: &str) {
        self.memory.put(key, prompt);
        self.disk.put(key, prompt);
    }

    /// Fast-tier size.
    pub fn memory_len(&self) -> usize {
        self.memory.len()
    }

    /// Fast-tier presence, without touching recency.
    pub fn memory_contains(&self, key: &str) -> bool {
        self.memory.contains(key)
    }

    pub fn memory(&self) -> &MemoryTier {
        &self.memory
    }

    pub fn disk(&self) -> &DiskTier {
        &self.disk
    }
}

fn short(key: &str) -> &str {
    key.get(..8).unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(i: usize) -> String {
        format!("{i:064x}")
    }

    fn age_file(path: &Path, by: Duration) {
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - by).unwrap();
    }

    #[test]
    fn ttl_zero_means_never() {
        assert_eq!(ttl_from_days(0), None);
        assert_eq!(ttl_from_days(2), Some(Duration::from_secs(2 * 86_400)));
    }

    #[test]
    fn put_then_get_returns_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PromptCache::new(dir.path());
        cache.put(&key(1), "Empty hall, marble floor.");
        assert_eq!(cache.get(&key(1), None).as_deref(), Some("Empty hall, marble floor."));
    }

    #[test]
    fn disk_tier_reproduces_prompt_after_memory_loss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PromptCache::new(dir.path());
        cache.put(&key(7), "Rainy alley, neon reflections.");
        cache.memory().clear();
        assert!(!cache.memory().contains(&key(7)));

        assert_eq!(cache.get(&key(7), None).as_deref(), Some("Rainy alley, neon reflections."));
        // Lazily repopulated
        assert!(cache.memory().contains(&key(7)));
    }

    #[test]
    fn disk_tier_survives_new_cache_instance() {
        let dir = tempfile::tempdir().unwrap();
        PromptCache::new(dir.path()).put(&key(3), "Desert canyon, harsh light.");
        let reopened = PromptCache::new(dir.path());
        assert_eq!(reopened.get(&key(3), None).as_deref(), Some("Desert canyon, harsh light."));
    }

    #[test]
    fn memory_tier_evicts_least_recently_used() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PromptCache::new(dir.path());
        for i in 0..=MEMORY_CAPACITY {
            cache.put(&key(i), &format!("prompt {i}"));
        }
        assert_eq!(cache.memory_len(), MEMORY_CAPACITY);
        assert!(!cache.memory_contains(&key(0)));
        for i in 1..=MEMORY_CAPACITY {
            assert!(cache.memory_contains(&key(i)), "key {i} should be cached");
        }
        // Still served from disk
        assert_eq!(cache.get(&key(0), None).as_deref(), Some("prompt 0"));
    }

    #[test]
    fn memory_get_refreshes_recency() {
        let memory = MemoryTier::new(2);
        memory.put("a", "A");
        memory.put("b", "B");
        assert_eq!(memory.get("a").as_deref(), Some("A"));
        memory.put("c", "C");
        assert!(memory.contains("a"));
        assert!(!memory.contains("b"));
    }

    #[test]
    fn expired_disk_entry_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let disk = DiskTier::new(dir.path());
        disk.put(&key(5), "Snowy pass.");
        age_file(&disk.path(&key(5)), Duration::from_secs(3 * 86_400));

        assert_eq!(disk.get(&key(5), ttl_from_days(2)), None);
        assert_eq!(disk.get(&key(5), ttl_from_days(7)).as_deref(), Some("Snowy pass."));
        assert_eq!(disk.get(&key(5), ttl_from_days(0)).as_deref(), Some("Snowy pass."));
    }

    #[test]
    fn ttl_does_not_apply_to_memory_tier() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PromptCache::new(dir.path());
        cache.put(&key(9), "Zen garden.");
        age_file(&cache.disk().path(&key(9)), Duration::from_secs(10 * 86_400));
        assert_eq!(cache.get(&key(9), ttl_from_days(1)).as_deref(), Some("Zen garden."));

        cache.memory().clear();
        assert_eq!(cache.get(&key(9), ttl_from_days(1)), None);
    }

    #[test]
    fn record_is_json_with_prompt_field() {
        let dir = tempfile::tempdir().unwrap();
        let disk = DiskTier::new(dir.path());
        disk.put(&key(2), "Küche, Fensterlicht.");
        let raw = std::fs::read_to_string(disk.path(&key(2))).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["prompt"], "Küche, Fensterlicht.");
    }

    #[test]
    fn corrupt_record_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let disk = DiskTier::new(dir.path());
        std::fs::write(disk.path(&key(4)), "{not json").unwrap();
        assert_eq!(disk.get(&key(4), None), None);
    }

    #[test]
    fn unwritable_directory_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();

        let cache = PromptCache::new(blocker.join("cache"));
        cache.put(&key(6), "Library reading room.");
        // Memory tier still works
        assert_eq!(cache.get(&key(6), None).as_deref(), Some("Library reading room."));
        cache.memory().clear();
        assert_eq!(cache.get(&key(6), None), None);
    }

    #[test]
    fn concurrent_access_stays_bounded_and_whole() {
        let dir = tempfile::tempdir().unwrap();
        let cache = std::sync::Arc::new(PromptCache::new(dir.path()));
        let distinct = MEMORY_CAPACITY + 44;

        std::thread::scope(|scope| {
            for worker in 0..6 {
                let cache = std::sync::Arc::clone(&cache);
                scope.spawn(move || {
                    for round in 0..distinct {
                        let i = (round * 7 + worker * 13) % distinct;
                        cache.put(&key(i), &format!("prompt {i}"));
                        if let Some(hit) = cache.get(&key((i + 1) % distinct), None) {
                            assert_eq!(hit, format!("prompt {}", (i + 1) % distinct));
                        }
                    }
                });
            }
        });

        assert!(cache.memory_len() <= MEMORY_CAPACITY);
        let mut records = 0;
        for entry in std::fs::read_dir(dir.path()).unwrap() {
            let path = entry.unwrap().path();
            let raw = std::fs::read_to_string(&path).unwrap();
            let record: DiskRecord = serde_json::from_str(&raw)
                .unwrap_or_else(|e| panic!("{} is not a whole record: {e}", path.display()));
            assert!(record.prompt.starts_with("prompt "));
            records += 1;
        }
        assert_eq!(records, distinct);
    }

    #[test]
    fn overwrite_replaces_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PromptCache::new(dir.path());
        cache.put(&key(8), "first");
        cache.put(&key(8), "second");
        cache.memory().clear();
        assert_eq!(cache.get(&key(8), None).as_deref(), Some("second"));
    }
}
