//! Slash command handler trait
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Handlers receive the decoded top-level options and a transport-neutral context
//! - 1.0.0: Initial implementation for modular command handling

use anyhow::Result;
use async_trait::async_trait;

use super::options::DecodedOptions;
use crate::gateway::InteractionContext;

/// Trait for slash command handlers
///
/// A handler is registered under a single command name together with that
/// command's descriptor, and is invoked once per matching interaction.
/// Errors are logged by the dispatcher; anything the user should see must be
/// sent as a reply before returning.
///
/// # Example
///
/// ```ignore
/// pub struct PongHandler;
///
/// #[async_trait]
/// impl SlashCommandHandler for PongHandler {
///     async fn handle(&self, ctx: &InteractionContext, _options: DecodedOptions<'_>) -> Result<()> {
///         reply_visible(ctx, "Pong!").await;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait SlashCommandHandler: Send + Sync {
    /// Handle one invocation
    ///
    /// # Arguments
    ///
    /// * `ctx` - Invoking user and the responder for this interaction
    /// * `options` - Top-level options of the invoked command
    async fn handle(&self, ctx: &InteractionContext, options: DecodedOptions<'_>) -> Result<()>;
}
