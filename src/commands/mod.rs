//! # Command System
//!
//! Slash command registration, option decoding and dispatch.
//!
//! - **Version**: 3.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 3.0.0: Descriptors and typed options replace raw serenity builders
//! - 2.0.0: Registry rejects duplicate command names
//! - 1.0.0: Initial handler trait, registry and reply helpers

pub mod descriptor;
pub mod handler;
pub mod handlers;
pub mod options;
pub mod registry;
pub mod reply;

pub use descriptor::{CommandDescriptor, OptionKind, OptionSchema};
pub use handler::SlashCommandHandler;
pub use handlers::create_all_handlers;
pub use options::{decode, DecodedOptions, IncomingOption, OptionValue};
pub use registry::CommandRegistry;
pub use reply::{reply_ephemeral, reply_visible};
