//! /configure handler
//!
//! Handles: configure timezone set, configure timezone get
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.0.0: Timezone sub-commands backed by UserConfigManager

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono_tz::Tz;
use log::{error, info};

use crate::commands::descriptor::{CommandDescriptor, OptionSchema};
use crate::commands::handler::SlashCommandHandler;
use crate::commands::options::DecodedOptions;
use crate::commands::reply::reply_ephemeral;
use crate::features::user_config::UserConfigManager;
use crate::gateway::InteractionContext;

const INTERNAL_ERROR: &str = "Internal error, please notify the bot owner.";

/// Handler for /configure
pub struct ConfigureHandler {
    user_configs: Arc<UserConfigManager>,
}

impl ConfigureHandler {
    pub fn new(user_configs: Arc<UserConfigManager>) -> Self {
        Self { user_configs }
    }

    pub fn descriptor() -> CommandDescriptor {
        CommandDescriptor::new("configure", "Configure User settings").option(
            OptionSchema::sub_command_group("timezone", "Timezone related commands")
                .child(
                    OptionSchema::sub_command(
                        "set",
                        "Sets the user timezone, use IANA timezone format (continent/city)",
                    )
                    .child(OptionSchema::string("timezone", "IANA timezone name").required(true)),
                )
                .child(OptionSchema::sub_command(
                    "get",
                    "Gets the user timezone, use IANA timezone format (continent/city)",
                )),
        )
    }

    /// Handle /configure timezone set
    async fn set_timezone(&self, ctx: &InteractionContext, options: &DecodedOptions<'_>) {
        let Some(name) = options.string("timezone") else {
            reply_ephemeral(ctx, "Missing timezone name").await;
            return;
        };

        let timezone: Tz = match name.parse() {
            Ok(timezone) => timezone,
            Err(e) => {
                reply_ephemeral(ctx, &format!("Invalid location: {name}: {e}")).await;
                return;
            }
        };

        match self.user_configs.set_timezone(&ctx.user_id, timezone) {
            Ok(_) => {
                reply_ephemeral(ctx, &format!("Timezone set to {}", timezone.name())).await;
                info!("User {} set timezone to {}", ctx.user_id, timezone.name());
            }
            Err(e) => {
                error!("Failed to set timezone for user {}: {e:#}", ctx.user_id);
                reply_ephemeral(ctx, INTERNAL_ERROR).await;
            }
        }
    }

    /// Handle /configure timezone get
    async fn get_timezone(&self, ctx: &InteractionContext) {
        let config = match self.user_configs.get_user_config(&ctx.user_id) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to get user config for {}: {e:#}", ctx.user_id);
                reply_ephemeral(ctx, INTERNAL_ERROR).await;
                return;
            }
        };

        match config.timezone {
            Some(timezone) => {
                reply_ephemeral(ctx, &format!("Your timezone is {}", timezone.name())).await
            }
            None => reply_ephemeral(ctx, "You don't have a timezone set").await,
        }
    }
}

#[async_trait]
impl SlashCommandHandler for ConfigureHandler {
    async fn handle(&self, ctx: &InteractionContext, options: DecodedOptions<'_>) -> Result<()> {
        let Some(timezone) = options.children_of("timezone") else {
            return Ok(());
        };

        if let Some(set) = timezone.children_of("set") {
            self.set_timezone(ctx, &set).await;
        }
        if timezone.contains("get") {
            self.get_timezone(ctx).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::descriptor::OptionKind;
    use crate::commands::options::{decode, IncomingOption, OptionValue};
    use crate::features::user_config::{MemoryStore, StoreTransaction, UserConfigStore};
    use crate::testing::RecordingResponder;
    use anyhow::bail;

    fn handler() -> ConfigureHandler {
        ConfigureHandler::new(Arc::new(UserConfigManager::new(Arc::new(MemoryStore::new()))))
    }

    fn timezone_group(sub_command: IncomingOption) -> Vec<IncomingOption> {
        vec![IncomingOption::new(
            "timezone",
            OptionValue::SubCommandGroup(vec![sub_command]),
        )]
    }

    fn set(name: &str) -> Vec<IncomingOption> {
        timezone_group(IncomingOption::new(
            "set",
            OptionValue::SubCommand(vec![IncomingOption::new(
                "timezone",
                OptionValue::String(name.to_string()),
            )]),
        ))
    }

    fn get() -> Vec<IncomingOption> {
        timezone_group(IncomingOption::new("get", OptionValue::SubCommand(vec![])))
    }

    /// Run one invocation as `user` and return the single reply
    async fn invoke(handler: &ConfigureHandler, user: &str, options: Vec<IncomingOption>) -> (String, bool) {
        let (ctx, responder) = RecordingResponder::context(user);
        handler.handle(&ctx, decode(&options)).await.unwrap();

        let responses = responder.responses();
        assert_eq!(responses.len(), 1, "expected exactly one reply");
        (responses[0].content.clone(), responses[0].ephemeral)
    }

    #[test]
    fn test_descriptor_shape() {
        let descriptor = ConfigureHandler::descriptor();
        assert_eq!(descriptor.name, "configure");

        let group = &descriptor.options[0];
        assert_eq!(group.kind, OptionKind::SubCommandGroup);
        let set = &group.children[0];
        assert_eq!(set.name, "set");
        assert_eq!(set.children[0].kind, OptionKind::String);
        assert!(set.children[0].required);
        assert_eq!(group.children[1].name, "get");
    }

    #[tokio::test]
    async fn test_get_without_timezone() {
        let handler = handler();
        let (content, ephemeral) = invoke(&handler, "1", get()).await;
        assert_eq!(content, "You don't have a timezone set");
        assert!(ephemeral);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let handler = handler();

        let (content, ephemeral) = invoke(&handler, "1", set("Europe/Madrid")).await;
        assert_eq!(content, "Timezone set to Europe/Madrid");
        assert!(ephemeral);

        let (content, _) = invoke(&handler, "1", get()).await;
        assert_eq!(content, "Your timezone is Europe/Madrid");

        // Settings are per user
        let (content, _) = invoke(&handler, "2", get()).await;
        assert_eq!(content, "You don't have a timezone set");
    }

    #[tokio::test]
    async fn test_invalid_timezone_keeps_previous() {
        let handler = handler();
        invoke(&handler, "1", set("Europe/Madrid")).await;

        let (content, ephemeral) = invoke(&handler, "1", set("Nowhere/Nothing")).await;
        assert!(content.starts_with("Invalid location: Nowhere/Nothing"));
        assert!(ephemeral);

        let (content, _) = invoke(&handler, "1", get()).await;
        assert_eq!(content, "Your timezone is Europe/Madrid");
    }

    #[tokio::test]
    async fn test_missing_timezone_value() {
        let handler = handler();
        let options = timezone_group(IncomingOption::new("set", OptionValue::SubCommand(vec![])));

        let (content, ephemeral) = invoke(&handler, "1", options).await;
        assert_eq!(content, "Missing timezone name");
        assert!(ephemeral);
    }

    #[tokio::test]
    async fn test_unrelated_options_are_ignored() {
        let handler = handler();
        let (ctx, responder) = RecordingResponder::context("1");
        handler.handle(&ctx, decode(&[])).await.unwrap();
        assert!(responder.responses().is_empty());
    }

    struct UnreachableStore;

    impl UserConfigStore for UnreachableStore {
        fn begin(&self) -> anyhow::Result<Box<dyn StoreTransaction + '_>> {
            bail!("unable to open database file")
        }
    }

    #[tokio::test]
    async fn test_store_failure_hides_cause() {
        let handler =
            ConfigureHandler::new(Arc::new(UserConfigManager::new(Arc::new(UnreachableStore))));

        let (content, ephemeral) = invoke(&handler, "1", set("Europe/Madrid")).await;
        assert_eq!(content, INTERNAL_ERROR);
        assert!(ephemeral);

        let (content, _) = invoke(&handler, "1", get()).await;
        assert_eq!(content, INTERNAL_ERROR);
    }
}
