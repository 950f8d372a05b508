//! In-process gateway and responder fakes shared by unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{watch, Notify};

use crate::commands::descriptor::CommandDescriptor;
use crate::commands::options::IncomingOption;
use crate::gateway::{
    EventListener, Gateway, GatewayError, Interaction, InteractionContext, InteractionKind,
    InteractionResponse, Responder,
};

/// Records every response instead of sending it
#[derive(Default)]
pub struct RecordingResponder {
    responses: Mutex<Vec<InteractionResponse>>,
    attempts: AtomicUsize,
    fail: bool,
}

impl RecordingResponder {
    pub fn context(user_id: &str) -> (InteractionContext, Arc<RecordingResponder>) {
        let responder = Arc::new(RecordingResponder::default());
        let ctx = InteractionContext::new(user_id, Some(1), responder.clone());
        (ctx, responder)
    }

    /// A responder whose every acknowledgment fails
    pub fn failing(user_id: &str) -> (InteractionContext, Arc<RecordingResponder>) {
        let responder = Arc::new(RecordingResponder {
            fail: true,
            ..Default::default()
        });
        let ctx = InteractionContext::new(user_id, Some(1), responder.clone());
        (ctx, responder)
    }

    pub fn responses(&self) -> Vec<InteractionResponse> {
        self.responses.lock().unwrap().clone()
    }

    pub fn contents(&self) -> Vec<String> {
        self.responses().into_iter().map(|r| r.content).collect()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Responder for RecordingResponder {
    async fn respond(&self, response: InteractionResponse) -> Result<(), GatewayError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GatewayError::Transport("interaction already acknowledged".to_string()));
        }
        self.responses.lock().unwrap().push(response);
        Ok(())
    }
}

pub fn command_interaction(
    name: &str,
    options: Vec<IncomingOption>,
    context: InteractionContext,
) -> Interaction {
    Interaction {
        kind: InteractionKind::ApplicationCommand,
        command_name: name.to_string(),
        options,
        context,
    }
}

/// Gateway that stays "connected" until closed
pub struct FakeGateway {
    overwrites: Mutex<Vec<(u64, Vec<String>)>>,
    listener: Mutex<Option<Arc<dyn EventListener>>>,
    failing_guild: Option<u64>,
    stalling_guild: Option<u64>,
    stalled: Notify,
    resumed: Notify,
    unreachable: bool,
    connect_attempted: Mutex<bool>,
    connected: Notify,
    closed: watch::Sender<bool>,
    close_calls: AtomicUsize,
}

impl FakeGateway {
    pub fn new() -> Self {
        let (closed, _) = watch::channel(false);
        Self {
            overwrites: Mutex::new(Vec::new()),
            listener: Mutex::new(None),
            failing_guild: None,
            stalling_guild: None,
            stalled: Notify::new(),
            resumed: Notify::new(),
            unreachable: false,
            connect_attempted: Mutex::new(false),
            connected: Notify::new(),
            closed,
            close_calls: AtomicUsize::new(0),
        }
    }

    /// Reject the bulk overwrite for one guild
    pub fn failing_guild(mut self, guild_id: u64) -> Self {
        self.failing_guild = Some(guild_id);
        self
    }

    /// Park the overwrite for one guild until [`FakeGateway::resume`]
    pub fn stalling_guild(mut self, guild_id: u64) -> Self {
        self.stalling_guild = Some(guild_id);
        self
    }

    pub async fn wait_stalled(&self) {
        self.stalled.notified().await;
    }

    pub fn resume(&self) {
        self.resumed.notify_one();
    }

    /// Fail every connection attempt
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Guild ids and command names of every overwrite attempt, in order
    pub fn overwrites(&self) -> Vec<(u64, Vec<String>)> {
        self.overwrites.lock().unwrap().clone()
    }

    pub fn listener(&self) -> Option<Arc<dyn EventListener>> {
        self.listener.lock().unwrap().clone()
    }

    pub fn connect_attempted(&self) -> bool {
        *self.connect_attempted.lock().unwrap()
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    pub async fn wait_connected(&self) {
        self.connected.notified().await;
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn overwrite_guild_commands(
        &self,
        guild_id: u64,
        commands: &[CommandDescriptor],
    ) -> Result<(), GatewayError> {
        let names = commands.iter().map(|c| c.name.clone()).collect();
        self.overwrites.lock().unwrap().push((guild_id, names));
        if self.stalling_guild == Some(guild_id) {
            self.stalled.notify_one();
            self.resumed.notified().await;
        }
        if self.failing_guild == Some(guild_id) {
            return Err(GatewayError::Transport(format!("guild {guild_id} rejected commands")));
        }
        Ok(())
    }

    async fn connect(&self, listener: Arc<dyn EventListener>) -> Result<(), GatewayError> {
        *self.connect_attempted.lock().unwrap() = true;
        if self.unreachable {
            return Err(GatewayError::Transport("connection refused".to_string()));
        }

        *self.listener.lock().unwrap() = Some(listener);
        let mut closed = self.closed.subscribe();
        self.connected.notify_one();
        while !*closed.borrow_and_update() {
            if closed.changed().await.is_err() {
                break;
            }
        }
        Ok(())
    }

    async fn close(&self) {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.closed.send_replace(true);
    }
}
