// Core layer - configuration and Discord limits
pub mod core;

// Transport layer - gateway seam and the serenity backend
pub mod gateway;

// Session layer - lifecycle, registration and dispatch
pub mod bot;

// Application layer
pub mod commands;

// Features layer - user settings
pub mod features;

// Infrastructure
pub mod database;

#[cfg(test)]
mod testing;

pub use crate::bot::{Bot, BotError, SessionState};
pub use crate::core::Config;
pub use crate::features::{MemoryStore, UserConfig, UserConfigManager, UserConfigStore};
pub use crate::gateway::{Gateway, GatewayError, SerenityGateway};
