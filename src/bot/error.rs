use thiserror::Error;

use crate::gateway::GatewayError;

/// Errors reported by the bot session and its command registry
#[derive(Debug, Error)]
pub enum BotError {
    #[error("command /{0} is already registered")]
    DuplicateCommand(String),

    #[error("cannot register /{0} after the session has started")]
    RegistrationClosed(String),

    #[error("bot session has already been started")]
    AlreadyStarted,

    #[error("refusing to start with rejected registrations: {}", .0.join(", "))]
    InvalidRegistration(Vec<String>),

    #[error("failed to overwrite commands for guild {guild_id}")]
    CommandOverwrite {
        guild_id: u64,
        #[source]
        source: GatewayError,
    },

    #[error("gateway connection failed")]
    Connection(#[source] GatewayError),
}
