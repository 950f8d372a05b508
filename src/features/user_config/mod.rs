//! # Feature: User Settings
//!
//! Per-user settings keyed by Discord user id. Reads go to an in-memory
//! cache first and fall back to the configured store; writes go through a
//! store transaction and reach the cache only once committed.
//!
//! Writes are serialized through the manager: each set commits and then
//! refreshes the cache before the next set may begin, so the cache always
//! matches the last committed value and concurrent sets resolve as
//! last-writer-wins. Reads are not isolated from writes.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.1: Serialize timezone writes so cache and store agree
//! - 1.0.0: Timezone setting with memory and SQLite stores

mod store;

pub use store::{MemoryStore, StoreTransaction, UserConfigStore};

use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use dashmap::DashMap;
use log::{debug, warn};

/// Settings for one user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserConfig {
    pub timezone: Option<Tz>,
}

pub struct UserConfigManager {
    store: Arc<dyn UserConfigStore>,
    cache: DashMap<String, UserConfig>,
    /// Held from begin to cache refresh of every write
    writes: Mutex<()>,
}

impl UserConfigManager {
    pub fn new(store: Arc<dyn UserConfigStore>) -> Self {
        Self {
            store,
            cache: DashMap::new(),
            writes: Mutex::new(()),
        }
    }

    /// Settings for `user_id`; users without stored settings get the default
    pub fn get_user_config(&self, user_id: &str) -> Result<UserConfig> {
        if let Some(config) = self.cache.get(user_id) {
            return Ok(*config.value());
        }

        let mut tx = self.store.begin().context("Failed to start transaction")?;
        match self.load(tx.as_mut(), user_id) {
            Ok(config) => {
                tx.commit().context("Failed to commit transaction")?;
                Ok(config)
            }
            Err(e) => {
                abandon(tx);
                Err(e)
            }
        }
    }

    /// Store a new timezone for `user_id`, returning the updated settings
    pub fn set_timezone(&self, user_id: &str, timezone: Tz) -> Result<UserConfig> {
        let _write = self.writes.lock().unwrap_or_else(PoisonError::into_inner);
        let mut tx = self.store.begin().context("Failed to start transaction")?;

        let updated = match self.update_timezone(tx.as_mut(), user_id, timezone) {
            Ok(config) => config,
            Err(e) => {
                abandon(tx);
                return Err(e);
            }
        };
        tx.commit().context("Failed to commit transaction")?;

        self.cache.insert(user_id.to_string(), updated);
        debug!("User {user_id} timezone set to {}", timezone.name());
        Ok(updated)
    }

    fn update_timezone(
        &self,
        tx: &mut dyn StoreTransaction,
        user_id: &str,
        timezone: Tz,
    ) -> Result<UserConfig> {
        let mut config = self
            .load(tx, user_id)
            .context("Failed to get user config")?;
        config.timezone = Some(timezone);
        tx.upsert_timezone(user_id, timezone.name())
            .context("Failed to update user config")?;
        Ok(config)
    }

    /// Cache-first read inside an open transaction
    fn load(&self, tx: &mut dyn StoreTransaction, user_id: &str) -> Result<UserConfig> {
        if let Some(config) = self.cache.get(user_id) {
            return Ok(*config.value());
        }

        let Some(name) = tx.get_timezone(user_id)? else {
            return Ok(UserConfig::default());
        };
        let timezone: Tz = name
            .parse()
            .map_err(|e| anyhow!("stored timezone `{name}` for user {user_id} is invalid: {e}"))?;

        let config = UserConfig {
            timezone: Some(timezone),
        };
        self.cache.insert(user_id.to_string(), config);
        Ok(config)
    }
}

fn abandon(tx: Box<dyn StoreTransaction + '_>) {
    if let Err(e) = tx.rollback() {
        warn!("Failed to roll back transaction: {e:#}");
    }
}
