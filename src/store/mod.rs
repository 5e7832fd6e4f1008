use std::collections::HashMap;
use std::sync::Mutex;

pub mod sqlite;

/// Host option-store seam. Every configuration read/write goes through here.
/// Implementations: `SqliteStore` (wraps rusqlite/r2d2) for standalone use, or
/// whatever adapter the embedding CMS provides over its own options table.
pub trait OptionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }
    fn get_bool(&self, key: &str) -> bool {
        self.get(key).map(|v| v == "true" || v == "1").unwrap_or(false)
    }
    fn get_u64(&self, key: &str) -> u64 {
        self.get(key).and_then(|v| v.parse().ok()).unwrap_or(0)
    }
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
    fn set_many(&self, options: &HashMap<String, String>) -> Result<(), String> {
        for (key, value) in options {
            self.set(key, value)?;
        }
        Ok(())
    }
}

/// In-process store for tests and for embedders that keep options in memory.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OptionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let map = match self.entries.lock() {
            Ok(m) => m,
            Err(_) => return None,
        };
        map.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let mut map = self.entries.lock().map_err(|e| e.to_string())?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::sqlite::SqliteStore;

    /// Create a fresh in-memory SqliteStore with migrations applied.
    fn test_store() -> SqliteStore {
        let manager = r2d2_sqlite::SqliteConnectionManager::memory();
        let pool = r2d2::Pool::builder()
            .max_size(1)
            .build(manager)
            .expect("Failed to create in-memory pool");
        let store = SqliteStore::new(pool);
        store.run_migrations().expect("migrations failed");
        store
    }

    #[test]
    fn test_get_set() {
        let s = test_store();
        assert!(s.get("nonexistent_key_xyz").is_none());
        s.set("test_key", "hello").unwrap();
        assert_eq!(s.get("test_key"), Some("hello".to_string()));
    }

    #[test]
    fn test_upsert() {
        let s = test_store();
        s.set("key", "first").unwrap();
        s.set("key", "second").unwrap();
        assert_eq!(s.get("key"), Some("second".to_string()));
    }

    #[test]
    fn test_get_or() {
        let s = test_store();
        assert_eq!(s.get_or("missing", "fallback"), "fallback");
        s.set("present", "val").unwrap();
        assert_eq!(s.get_or("present", "fallback"), "val");
    }

    #[test]
    fn test_get_bool() {
        let s = test_store();
        assert!(!s.get_bool("missing_bool"));
        s.set("flag_true", "true").unwrap();
        s.set("flag_one", "1").unwrap();
        s.set("flag_false", "false").unwrap();
        assert!(s.get_bool("flag_true"));
        assert!(s.get_bool("flag_one"));
        assert!(!s.get_bool("flag_false"));
    }

    #[test]
    fn test_get_u64() {
        let s = test_store();
        assert_eq!(s.get_u64("missing_num"), 0);
        s.set("num", "42").unwrap();
        assert_eq!(s.get_u64("num"), 42);
        s.set("not_num", "abc").unwrap();
        assert_eq!(s.get_u64("not_num"), 0);
    }

    #[test]
    fn test_set_many() {
        let s = test_store();
        let mut batch = HashMap::new();
        batch.insert("batch_a".to_string(), "1".to_string());
        batch.insert("batch_b".to_string(), "2".to_string());
        s.set_many(&batch).unwrap();
        assert_eq!(s.get("batch_a"), Some("1".to_string()));
        assert_eq!(s.get("batch_b"), Some("2".to_string()));
    }

    #[test]
    fn test_memory_store() {
        let s = MemoryStore::new();
        assert!(s.get("anything").is_none());
        s.set("k", "v").unwrap();
        assert_eq!(s.get("k"), Some("v".to_string()));
        s.set("k", "v2").unwrap();
        assert_eq!(s.get("k"), Some("v2".to_string()));
    }
}
