//! Command handler registry
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Registry owns command descriptors; duplicate names are rejected
//! - 1.0.0: Initial implementation for handler dispatch

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, error};

use super::descriptor::CommandDescriptor;
use super::handler::SlashCommandHandler;
use super::options::decode;
use crate::bot::BotError;
use crate::gateway::Interaction;

/// Registry mapping command names to handlers
///
/// Descriptors are kept in registration order; that order is what the
/// gateway receives on every bulk overwrite.
///
/// # Example
///
/// ```ignore
/// let mut registry = CommandRegistry::new();
/// registry.register(PongHandler::descriptor(), Arc::new(PongHandler))?;
///
/// registry.dispatch(&interaction).await;
/// ```
#[derive(Clone, Default)]
pub struct CommandRegistry {
    descriptors: Vec<CommandDescriptor>,
    handlers: HashMap<String, Arc<dyn SlashCommandHandler>>,
    rejected: Vec<String>,
}

impl CommandRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its descriptor's name
    ///
    /// A name that is already taken is rejected and remembered, leaving the
    /// first registration in place.
    pub fn register(
        &mut self,
        descriptor: CommandDescriptor,
        handler: Arc<dyn SlashCommandHandler>,
    ) -> Result<(), BotError> {
        if self.handlers.contains_key(&descriptor.name) {
            self.rejected.push(descriptor.name.clone());
            return Err(BotError::DuplicateCommand(descriptor.name));
        }

        debug!("Registered command /{}", descriptor.name);
        self.handlers.insert(descriptor.name.clone(), handler);
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Get handler for a command name
    pub fn get(&self, name: &str) -> Option<Arc<dyn SlashCommandHandler>> {
        self.handlers.get(name).cloned()
    }

    /// Check if a command is registered
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Descriptors in registration order
    pub fn descriptors(&self) -> &[CommandDescriptor] {
        &self.descriptors
    }

    /// Names whose registration was refused as duplicates
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    /// Run the handler registered for the interaction's command
    ///
    /// Unknown names are not an error: the gateway can deliver commands left
    /// over from earlier registrations. Returns whether a handler ran.
    pub async fn dispatch(&self, interaction: &Interaction) -> bool {
        let Some(handler) = self.handlers.get(&interaction.command_name) else {
            debug!("No handler for command /{}", interaction.command_name);
            return false;
        };

        let ctx = &interaction.context;
        match ctx.guild_id {
            Some(guild_id) => debug!(
                "Dispatching /{} for user {} in guild {guild_id}",
                interaction.command_name, ctx.user_id
            ),
            None => debug!(
                "Dispatching /{} for user {} in a direct message",
                interaction.command_name, ctx.user_id
            ),
        }

        let options = decode(&interaction.options);
        if let Err(e) = handler.handle(ctx, options).await {
            error!(
                "Error handling slash command '{}': {e:#}",
                interaction.command_name
            );
        }
        true
    }
}
