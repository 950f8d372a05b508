//! /pong handler
//!
//! Handles: pong
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Liveness reply replacing the ping utility command

use anyhow::Result;
use async_trait::async_trait;
use log::info;

use crate::commands::descriptor::CommandDescriptor;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::options::DecodedOptions;
use crate::commands::reply::reply_visible;
use crate::gateway::InteractionContext;

/// Handler for /pong, a liveness check
pub struct PongHandler;

impl PongHandler {
    pub fn descriptor() -> CommandDescriptor {
        CommandDescriptor::new("pong", "Replies with pong")
    }
}

#[async_trait]
impl SlashCommandHandler for PongHandler {
    async fn handle(&self, ctx: &InteractionContext, _options: DecodedOptions<'_>) -> Result<()> {
        reply_visible(ctx, "Pong!").await;
        info!("Pong command completed for user {}", ctx.user_id);
        Ok(())
    }
}
