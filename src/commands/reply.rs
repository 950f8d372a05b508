//! Interaction reply helpers
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Visible and ephemeral channel-message replies

use log::error;

use crate::core::response::truncate_for_message;
use crate::gateway::{InteractionContext, InteractionResponse};

/// Answer the interaction with a message everyone in the channel can see
pub async fn reply_visible(ctx: &InteractionContext, message: &str) {
    send(ctx, message, false).await;
}

/// Answer the interaction with a message only the invoking user can see
pub async fn reply_ephemeral(ctx: &InteractionContext, message: &str) {
    send(ctx, message, true).await;
}

async fn send(ctx: &InteractionContext, message: &str, ephemeral: bool) {
    let response = InteractionResponse {
        content: truncate_for_message(message),
        ephemeral,
    };
    if let Err(e) = ctx.responder().respond(response).await {
        error!("Failed to respond to interaction from user {}: {e}", ctx.user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::response::MESSAGE_LIMIT;
    use crate::testing::RecordingResponder;

    #[tokio::test]
    async fn test_reply_visible_is_not_ephemeral() {
        let (ctx, responder) = RecordingResponder::context("1");
        reply_visible(&ctx, "Pong!").await;

        assert_eq!(
            responder.responses(),
            vec![InteractionResponse {
                content: "Pong!".to_string(),
                ephemeral: false,
            }]
        );
    }

    #[tokio::test]
    async fn test_reply_ephemeral_sets_flag() {
        let (ctx, responder) = RecordingResponder::context("1");
        reply_ephemeral(&ctx, "secret").await;

        let responses = responder.responses();
        assert_eq!(responses.len(), 1);
        assert!(responses[0].ephemeral);
    }

    #[tokio::test]
    async fn test_reply_truncates_long_content() {
        let (ctx, responder) = RecordingResponder::context("1");
        reply_visible(&ctx, &"x".repeat(MESSAGE_LIMIT + 50)).await;

        let content = &responder.responses()[0].content;
        assert_eq!(content.len(), MESSAGE_LIMIT);
        assert!(content.ends_with("..."));
    }

    #[tokio::test]
    async fn test_reply_failure_is_swallowed() {
        let (ctx, responder) = RecordingResponder::failing("1");
        reply_ephemeral(&ctx, "nobody hears this").await;
        assert_eq!(responder.attempts(), 1);
    }
}
