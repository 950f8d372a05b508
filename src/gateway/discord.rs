//! Discord transport backed by serenity
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Bulk guild overwrite, event relay and interaction responder

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;
use serenity::builder::{CreateApplicationCommand, CreateApplicationCommandOption};
use serenity::client::bridge::gateway::ShardManager;
use serenity::http::Http;
use serenity::model::application::command::CommandOptionType;
use serenity::model::application::interaction::application_command::{
    ApplicationCommandInteraction, CommandDataOption,
};
use serenity::model::application::interaction::{
    Interaction as SerenityInteraction, InteractionResponseType,
};
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::{Client, Context, EventHandler, GatewayIntents, Mutex};

use super::{
    EventListener, Gateway, GatewayError, Interaction, InteractionContext, InteractionKind,
    InteractionResponse, Responder,
};
use crate::commands::descriptor::{CommandDescriptor, OptionKind, OptionSchema};
use crate::commands::options::{IncomingOption, OptionValue};

/// Gateway connection to Discord for one bot application
pub struct SerenityGateway {
    token: String,
    application_id: u64,
    http: Arc<Http>,
    shard_manager: Mutex<Option<Arc<Mutex<ShardManager>>>>,
}

impl SerenityGateway {
    pub fn new(token: &str, application_id: u64) -> Self {
        Self {
            token: token.to_string(),
            application_id,
            http: Arc::new(Http::new_with_application_id(token, application_id)),
            shard_manager: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Gateway for SerenityGateway {
    async fn overwrite_guild_commands(
        &self,
        guild_id: u64,
        commands: &[CommandDescriptor],
    ) -> Result<(), GatewayError> {
        let registered = GuildId(guild_id)
            .set_application_commands(&self.http, |builder| {
                for descriptor in commands {
                    builder.add_application_command(application_command(descriptor));
                }
                builder
            })
            .await?;

        debug!("Guild {guild_id} now has {} application commands", registered.len());
        Ok(())
    }

    async fn connect(&self, listener: Arc<dyn EventListener>) -> Result<(), GatewayError> {
        let mut client = Client::builder(&self.token, GatewayIntents::GUILDS)
            .application_id(self.application_id)
            .event_handler(Relay { listener })
            .await?;

        *self.shard_manager.lock().await = Some(client.shard_manager.clone());

        // Returns once every shard has been shut down
        client.start().await?;
        Ok(())
    }

    async fn close(&self) {
        if let Some(manager) = self.shard_manager.lock().await.take() {
            manager.lock().await.shutdown_all().await;
        }
    }
}

/// Forwards serenity events to the session's listener
struct Relay {
    listener: Arc<dyn EventListener>,
}

#[async_trait]
impl EventHandler for Relay {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        self.listener.on_ready(&ready.user.tag()).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: SerenityInteraction) {
        let command = match interaction {
            SerenityInteraction::ApplicationCommand(command) => command,
            other => {
                debug!("Ignoring non-command interaction {}", other.id());
                return;
            }
        };

        match to_interaction(ctx.http.clone(), command) {
            Ok(interaction) => self.listener.on_interaction(interaction).await,
            Err(e) => warn!("Dropping interaction: {e}"),
        }
    }
}

/// Answers one application-command interaction over HTTP
struct SerenityResponder {
    http: Arc<Http>,
    command: ApplicationCommandInteraction,
}

#[async_trait]
impl Responder for SerenityResponder {
    async fn respond(&self, response: InteractionResponse) -> Result<(), GatewayError> {
        self.command
            .create_interaction_response(&self.http, |r| {
                r.kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message
                            .content(&response.content)
                            .ephemeral(response.ephemeral)
                    })
            })
            .await?;
        Ok(())
    }
}

fn to_interaction(
    http: Arc<Http>,
    command: ApplicationCommandInteraction,
) -> Result<Interaction, GatewayError> {
    let options = command
        .data
        .options
        .iter()
        .map(incoming_option)
        .collect::<Result<Vec<_>, _>>()?;
    let command_name = command.data.name.clone();
    let context = InteractionContext::new(
        command.user.id.to_string(),
        command.guild_id.map(|id| id.0),
        Arc::new(SerenityResponder { http, command }),
    );

    Ok(Interaction {
        kind: InteractionKind::ApplicationCommand,
        command_name,
        options,
        context,
    })
}

fn incoming_option(option: &CommandDataOption) -> Result<IncomingOption, GatewayError> {
    let children = option
        .options
        .iter()
        .map(incoming_option)
        .collect::<Result<Vec<_>, _>>()?;
    let value = option_value(&option.name, option.kind, option.value.as_ref(), children)?;
    Ok(IncomingOption::new(option.name.clone(), value))
}

/// Convert a raw option payload into a typed value matching its declared kind
fn option_value(
    name: &str,
    kind: CommandOptionType,
    value: Option<&Value>,
    children: Vec<IncomingOption>,
) -> Result<OptionValue, GatewayError> {
    let malformed = |reason: String| GatewayError::MalformedOption {
        name: name.to_string(),
        reason,
    };
    let kind = option_kind(kind)
        .ok_or_else(|| malformed(format!("unsupported option type {kind:?}")))?;
    let expected = || malformed(format!("expected a {kind} value"));
    let snowflake = || {
        value
            .and_then(|v| match v {
                Value::String(s) => s.parse().ok(),
                other => other.as_u64(),
            })
            .ok_or_else(expected)
    };

    let value = match kind {
        OptionKind::SubCommandGroup => OptionValue::SubCommandGroup(children),
        OptionKind::SubCommand => OptionValue::SubCommand(children),
        OptionKind::String => OptionValue::String(
            value
                .and_then(Value::as_str)
                .ok_or_else(expected)?
                .to_string(),
        ),
        OptionKind::Integer => {
            OptionValue::Integer(value.and_then(Value::as_i64).ok_or_else(expected)?)
        }
        OptionKind::Boolean => {
            OptionValue::Boolean(value.and_then(Value::as_bool).ok_or_else(expected)?)
        }
        OptionKind::Number => {
            OptionValue::Number(value.and_then(Value::as_f64).ok_or_else(expected)?)
        }
        OptionKind::User => OptionValue::User(snowflake()?),
        OptionKind::Channel => OptionValue::Channel(snowflake()?),
        OptionKind::Role => OptionValue::Role(snowflake()?),
        OptionKind::Mentionable => OptionValue::Mentionable(snowflake()?),
        OptionKind::Attachment => OptionValue::Attachment(snowflake()?),
    };
    Ok(value)
}

fn option_kind(kind: CommandOptionType) -> Option<OptionKind> {
    let kind = match kind {
        CommandOptionType::SubCommandGroup => OptionKind::SubCommandGroup,
        CommandOptionType::SubCommand => OptionKind::SubCommand,
        CommandOptionType::String => OptionKind::String,
        CommandOptionType::Integer => OptionKind::Integer,
        CommandOptionType::Boolean => OptionKind::Boolean,
        CommandOptionType::User => OptionKind::User,
        CommandOptionType::Channel => OptionKind::Channel,
        CommandOptionType::Role => OptionKind::Role,
        CommandOptionType::Mentionable => OptionKind::Mentionable,
        CommandOptionType::Number => OptionKind::Number,
        CommandOptionType::Attachment => OptionKind::Attachment,
        _ => return None,
    };
    Some(kind)
}

fn option_type(kind: OptionKind) -> CommandOptionType {
    match kind {
        OptionKind::SubCommandGroup => CommandOptionType::SubCommandGroup,
        OptionKind::SubCommand => CommandOptionType::SubCommand,
        OptionKind::String => CommandOptionType::String,
        OptionKind::Integer => CommandOptionType::Integer,
        OptionKind::Boolean => CommandOptionType::Boolean,
        OptionKind::User => CommandOptionType::User,
        OptionKind::Channel => CommandOptionType::Channel,
        OptionKind::Role => CommandOptionType::Role,
        OptionKind::Mentionable => CommandOptionType::Mentionable,
        OptionKind::Number => CommandOptionType::Number,
        OptionKind::Attachment => CommandOptionType::Attachment,
    }
}

fn application_command(descriptor: &CommandDescriptor) -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name(&descriptor.name)
        .description(&descriptor.description);
    for option in &descriptor.options {
        command.add_option(command_option(option));
    }
    command
}

fn command_option(schema: &OptionSchema) -> CreateApplicationCommandOption {
    let mut option = CreateApplicationCommandOption::default();
    option
        .name(&schema.name)
        .description(&schema.description)
        .kind(option_type(schema.kind));
    // Discord rejects `required` on groups and sub-commands
    if !schema.kind.is_branch() {
        option.required(schema.required);
    }
    for child in &schema.children {
        option.add_sub_option(command_option(child));
    }
    option
}
