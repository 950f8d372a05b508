//! SQLite persistence for user settings
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.0.0: user_configs table with explicit transactions

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use log::{info, warn};
use sqlite::{Connection, State};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS user_configs (
    id TEXT PRIMARY KEY,
    timezone TEXT NOT NULL
)";

/// Shared handle to the bot's SQLite database
///
/// Statements are serialized through one connection; a [`Transaction`]
/// holds it exclusively until committed or dropped.
#[derive(Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database at `path` and make sure it is usable
    ///
    /// `":memory:"` opens a private in-memory database.
    pub fn open(path: &str) -> Result<Self> {
        let connection =
            sqlite::open(path).with_context(|| format!("Failed to open database {path}"))?;
        connection
            .execute("SELECT 1")
            .with_context(|| format!("Database {path} is not reachable"))?;
        connection
            .execute(SCHEMA)
            .context("Failed to create user_configs table")?;

        info!("Opened database at {path}");
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Begin a transaction; it rolls back unless committed
    pub fn transaction(&self) -> Result<Transaction<'_>> {
        let connection = self
            .connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        connection
            .execute("BEGIN")
            .context("Failed to start transaction")?;
        Ok(Transaction {
            connection,
            finished: false,
        })
    }
}

/// An open transaction on the shared connection
pub struct Transaction<'a> {
    connection: MutexGuard<'a, Connection>,
    finished: bool,
}

impl Transaction<'_> {
    pub fn select_timezone(&self, user_id: &str) -> Result<Option<String>> {
        let mut statement = self
            .connection
            .prepare("SELECT timezone FROM user_configs WHERE id = ?")?;
        statement.bind((1, user_id))?;

        match statement.next()? {
            State::Row => Ok(Some(statement.read::<String, _>(0)?)),
            State::Done => Ok(None),
        }
    }

    pub fn upsert_timezone(&self, user_id: &str, timezone: &str) -> Result<()> {
        let mut statement = self
            .connection
            .prepare("INSERT OR REPLACE INTO user_configs (id, timezone) VALUES (?, ?)")?;
        statement.bind((1, user_id))?;
        statement.bind((2, timezone))?;
        while statement.next()? != State::Done {}
        Ok(())
    }

    pub fn commit(mut self) -> Result<()> {
        self.connection
            .execute("COMMIT")
            .context("Failed to commit transaction")?;
        self.finished = true;
        Ok(())
    }

    pub fn rollback(mut self) -> Result<()> {
        self.finished = true;
        self.connection
            .execute("ROLLBACK")
            .context("Failed to roll back transaction")
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(e) = self.connection.execute("ROLLBACK") {
                warn!("Failed to roll back abandoned transaction: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_row_is_none() {
        let db = Database::open(":memory:").unwrap();
        let tx = db.transaction().unwrap();
        assert_eq!(tx.select_timezone("1").unwrap(), None);
        tx.commit().unwrap();
    }

    #[test]
    fn test_upsert_replaces_existing_row() {
        let db = Database::open(":memory:").unwrap();

        let tx = db.transaction().unwrap();
        tx.upsert_timezone("1", "Europe/Madrid").unwrap();
        tx.upsert_timezone("1", "Asia/Tokyo").unwrap();
        tx.commit().unwrap();

        let tx = db.transaction().unwrap();
        assert_eq!(tx.select_timezone("1").unwrap().as_deref(), Some("Asia/Tokyo"));
    }

    #[test]
    fn test_rollback_discards_writes() {
        let db = Database::open(":memory:").unwrap();

        let tx = db.transaction().unwrap();
        tx.upsert_timezone("1", "Europe/Madrid").unwrap();
        tx.rollback().unwrap();

        let tx = db.transaction().unwrap();
        assert_eq!(tx.select_timezone("1").unwrap(), None);
    }

    #[test]
    fn test_dropped_transaction_rolls_back() {
        let db = Database::open(":memory:").unwrap();

        {
            let tx = db.transaction().unwrap();
            tx.upsert_timezone("1", "Europe/Madrid").unwrap();
        }

        let tx = db.transaction().unwrap();
        assert_eq!(tx.select_timezone("1").unwrap(), None);
    }
}
