//! Per-command handler implementations
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Add ConfigureHandler (configure timezone set/get)
//! - 1.0.0: Initial PongHandler

pub mod configure;
pub mod pong;

use std::sync::Arc;

use super::descriptor::CommandDescriptor;
use super::handler::SlashCommandHandler;
use crate::features::user_config::UserConfigManager;

/// Create all command handlers with their descriptors
///
/// Returns pairs ready to be registered with a bot session, in the order the
/// commands should be pushed to the gateway.
pub fn create_all_handlers(
    user_configs: Arc<UserConfigManager>,
) -> Vec<(CommandDescriptor, Arc<dyn SlashCommandHandler>)> {
    let pong_handler: Arc<dyn SlashCommandHandler> = Arc::new(pong::PongHandler);
    let configure_handler: Arc<dyn SlashCommandHandler> =
        Arc::new(configure::ConfigureHandler::new(user_configs));

    vec![
        (pong::PongHandler::descriptor(), pong_handler),
        (configure::ConfigureHandler::descriptor(), configure_handler),
    ]
}
