//! # Gateway
//!
//! Transport seam between the bot session and the chat platform. The
//! session only needs to push command descriptors, connect with a listener,
//! and close; everything else (heartbeats, resumes, sharding) belongs to the
//! transport.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Extracted transport traits so sessions can run without Discord

pub mod discord;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::commands::descriptor::CommandDescriptor;
use crate::commands::options::IncomingOption;

pub use discord::SerenityGateway;

/// Errors raised by a gateway transport
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Serenity(#[from] serenity::Error),

    #[error("malformed option `{name}`: {reason}")]
    MalformedOption { name: String, reason: String },

    #[error("transport failure: {0}")]
    Transport(String),
}

/// Kind of an inbound interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Ping,
    ApplicationCommand,
    MessageComponent,
    Autocomplete,
    ModalSubmit,
}

/// Acknowledgment sent back for one interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionResponse {
    pub content: String,
    /// Restrict visibility to the invoking user
    pub ephemeral: bool,
}

/// Capability to acknowledge a single interaction
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, response: InteractionResponse) -> Result<(), GatewayError>;
}

/// Who invoked an interaction, and how to answer it
#[derive(Clone)]
pub struct InteractionContext {
    pub user_id: String,
    pub guild_id: Option<u64>,
    responder: Arc<dyn Responder>,
}

impl InteractionContext {
    pub fn new(user_id: impl Into<String>, guild_id: Option<u64>, responder: Arc<dyn Responder>) -> Self {
        Self {
            user_id: user_id.into(),
            guild_id,
            responder,
        }
    }

    pub fn responder(&self) -> &dyn Responder {
        self.responder.as_ref()
    }
}

impl fmt::Debug for InteractionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionContext")
            .field("user_id", &self.user_id)
            .field("guild_id", &self.guild_id)
            .finish_non_exhaustive()
    }
}

/// An inbound interaction event, owned by the dispatch call handling it
#[derive(Debug, Clone)]
pub struct Interaction {
    pub kind: InteractionKind,
    pub command_name: String,
    pub options: Vec<IncomingOption>,
    pub context: InteractionContext,
}

/// Observer attached to a gateway connection
///
/// Events may be delivered concurrently, one task per event.
#[async_trait]
pub trait EventListener: Send + Sync {
    /// The connection is authenticated as `identity`
    async fn on_ready(&self, identity: &str);

    async fn on_interaction(&self, interaction: Interaction);
}

/// A chat-platform connection
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Replace every command registered for `guild_id` with `commands`
    async fn overwrite_guild_commands(
        &self,
        guild_id: u64,
        commands: &[CommandDescriptor],
    ) -> Result<(), GatewayError>;

    /// Open the connection and deliver events to `listener`
    ///
    /// Resolves once the connection is closed or fails.
    async fn connect(&self, listener: Arc<dyn EventListener>) -> Result<(), GatewayError>;

    /// Close the connection; safe to call when never connected
    async fn close(&self);
}
