//! Storage backends for user settings

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Result;

use crate::database::{Database, Transaction};

/// Unit of work against a settings store
///
/// Writes become visible to other transactions only after `commit`.
pub trait StoreTransaction {
    fn get_timezone(&mut self, user_id: &str) -> Result<Option<String>>;
    fn upsert_timezone(&mut self, user_id: &str, timezone: &str) -> Result<()>;
    fn commit(self: Box<Self>) -> Result<()>;
    fn rollback(self: Box<Self>) -> Result<()>;
}

/// Persistent home of user settings
pub trait UserConfigStore: Send + Sync {
    fn begin(&self) -> Result<Box<dyn StoreTransaction + '_>>;
}

impl UserConfigStore for Database {
    fn begin(&self) -> Result<Box<dyn StoreTransaction + '_>> {
        Ok(Box::new(self.transaction()?))
    }
}

impl StoreTransaction for Transaction<'_> {
    fn get_timezone(&mut self, user_id: &str) -> Result<Option<String>> {
        self.select_timezone(user_id)
    }

    fn upsert_timezone(&mut self, user_id: &str, timezone: &str) -> Result<()> {
        Transaction::upsert_timezone(self, user_id, timezone)
    }

    fn commit(self: Box<Self>) -> Result<()> {
        Transaction::commit(*self)
    }

    fn rollback(self: Box<Self>) -> Result<()> {
        Transaction::rollback(*self)
    }
}

/// Settings kept only for the lifetime of the process
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserConfigStore for MemoryStore {
    fn begin(&self) -> Result<Box<dyn StoreTransaction + '_>> {
        Ok(Box::new(MemoryTransaction {
            rows: self.rows.lock().unwrap_or_else(PoisonError::into_inner),
            staged: HashMap::new(),
        }))
    }
}

struct MemoryTransaction<'a> {
    rows: MutexGuard<'a, HashMap<String, String>>,
    staged: HashMap<String, String>,
}

impl StoreTransaction for MemoryTransaction<'_> {
    fn get_timezone(&mut self, user_id: &str) -> Result<Option<String>> {
        Ok(self
            .staged
            .get(user_id)
            .or_else(|| self.rows.get(user_id))
            .cloned())
    }

    fn upsert_timezone(&mut self, user_id: &str, timezone: &str) -> Result<()> {
        self.staged.insert(user_id.to_string(), timezone.to_string());
        Ok(())
    }

    fn commit(mut self: Box<Self>) -> Result<()> {
        let staged = std::mem::take(&mut self.staged);
        self.rows.extend(staged);
        Ok(())
    }

    fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &dyn UserConfigStore) {
        let mut tx = store.begin().unwrap();
        assert_eq!(tx.get_timezone("1").unwrap(), None);
        tx.upsert_timezone("1", "Europe/Madrid").unwrap();
        assert_eq!(tx.get_timezone("1").unwrap().as_deref(), Some("Europe/Madrid"));
        tx.commit().unwrap();

        let mut tx = store.begin().unwrap();
        tx.upsert_timezone("1", "Asia/Tokyo").unwrap();
        tx.rollback().unwrap();

        let mut tx = store.begin().unwrap();
        assert_eq!(tx.get_timezone("1").unwrap().as_deref(), Some("Europe/Madrid"));
        tx.commit().unwrap();
    }

    #[test]
    fn test_memory_store_commit_and_rollback() {
        exercise(&MemoryStore::new());
    }

    #[test]
    fn test_sqlite_store_commit_and_rollback() {
        exercise(&Database::open(":memory:").unwrap());
    }
}
