//! # Features
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.0.0: Per-user settings (timezone)

pub mod user_config;

pub use user_config::{MemoryStore, UserConfig, UserConfigManager, UserConfigStore};
