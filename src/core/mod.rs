//! # Core Module
//!
//! Configuration and shared Discord limits.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: TOML configuration file replaces environment-only config
//! - 1.0.0: Initial creation with config and response modules

pub mod config;
pub mod response;

pub use config::{BotConfig, Config};
pub use response::{truncate_for_message, MESSAGE_LIMIT};
