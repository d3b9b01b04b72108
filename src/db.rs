//! Durable key-value backends.
//!
//! The permission store needs nothing more than synchronous, single-key
//! reads and writes. Each call is its own transaction; concurrent writers
//! from other contexts follow last-writer-wins.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use heed::types::Str;
use heed::{Database, Env, EnvOpenOptions, RoTxn, RwTxn};

use crate::constants::{KV_DB_NAME, MAP_SIZE, MAX_DBS};
use crate::error::Result;

/// Synchronous string key-value storage
pub trait KvBackend {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
    /// Returns whether the key existed
    fn delete(&self, key: &str) -> Result<bool>;
}

impl<B: KvBackend + ?Sized> KvBackend for &B {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }
    fn put(&self, key: &str, value: &str) -> Result<()> {
        (**self).put(key, value)
    }
    fn delete(&self, key: &str) -> Result<bool> {
        (**self).delete(key)
    }
}

impl<B: KvBackend + ?Sized> KvBackend for Arc<B> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }
    fn put(&self, key: &str, value: &str) -> Result<()> {
        (**self).put(key, value)
    }
    fn delete(&self, key: &str) -> Result<bool> {
        (**self).delete(key)
    }
}

/// LMDB-backed storage: one environment, one string table
pub struct LmdbBackend {
    env: Env,
    kv: Database<Str, Str>,
}

impl LmdbBackend {
    /// Open (or create) the environment at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;
        // SAFETY: LMDB requires no other processes access this path concurrently during open.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(MAP_SIZE)
                .max_dbs(MAX_DBS)
                .open(path)?
        };
        let mut tx = env.write_txn()?;
        let kv: Database<Str, Str> = env.create_database(&mut tx, Some(KV_DB_NAME))?;
        tx.commit()?;
        Ok(LmdbBackend { env, kv })
    }

    #[inline]
    fn read<T, F: FnOnce(&Database<Str, Str>, &RoTxn) -> Result<T>>(&self, f: F) -> Result<T> {
        f(&self.kv, &self.env.read_txn()?)
    }

    #[inline]
    fn write<T, F: FnOnce(&Database<Str, Str>, &mut RwTxn) -> Result<T>>(&self, f: F) -> Result<T> {
        let mut txn = self.env.write_txn()?;
        let r = f(&self.kv, &mut txn)?;
        txn.commit()?;
        Ok(r)
    }
}

impl KvBackend for LmdbBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.read(|db, tx| Ok(db.get(tx, key)?.map(str::to_string)))
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.write(|db, tx| Ok(db.put(tx, key, value)?))
    }

    fn delete(&self, key: &str) -> Result<bool> {
        self.write(|db, tx| Ok(db.delete(tx, key)?))
    }
}

/// Process-local storage, for tests and embedding without persistence
#[derive(Debug, Default)]
pub struct MemoryBackend {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.map.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.lock().remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_backend() {
        let m = MemoryBackend::new();
        assert_eq!(m.get("k").unwrap(), None);
        m.put("k", "v").unwrap();
        assert_eq!(m.get("k").unwrap().as_deref(), Some("v"));
        assert!(m.delete("k").unwrap());
        assert!(!m.delete("k").unwrap());
    }

    #[test]
    fn test_lmdb_backend() {
        let dir = TempDir::new().unwrap();
        let db = LmdbBackend::open(dir.path()).unwrap();
        assert_eq!(db.get("k").unwrap(), None);
        db.put("k", "v1").unwrap();
        db.put("k", "v2").unwrap();
        assert_eq!(db.get("k").unwrap().as_deref(), Some("v2"));
        assert!(db.delete("k").unwrap());
        assert_eq!(db.get("k").unwrap(), None);
    }

    #[test]
    fn test_shared_through_arc() {
        let shared = Arc::new(MemoryBackend::new());
        let a = Arc::clone(&shared);
        let b = Arc::clone(&shared);
        a.put("k", "from a").unwrap();
        b.put("k", "from b").unwrap();
        assert_eq!(a.get("k").unwrap().as_deref(), Some("from b"));
    }
}
