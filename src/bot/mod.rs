//! # Bot Session
//!
//! Owns the gateway connection and the command registry, and drives the
//! session lifecycle:
//!
//! `Created → Registering → Started → Stopped`
//!
//! Handlers are registered before [`Bot::start`]; starting freezes the
//! registry, pushes every descriptor to each configured guild, connects, and
//! then waits until [`Bot::stop`] is called from another task.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Late and duplicate registrations are reported instead of overwritten
//! - 1.0.0: Initial session with guild command registration and dispatch

mod error;

pub use error::BotError;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use tokio::sync::watch;

use crate::commands::descriptor::CommandDescriptor;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::registry::CommandRegistry;
use crate::core::config::BotConfig;
use crate::gateway::{EventListener, Gateway, Interaction, InteractionKind, SerenityGateway};

/// Lifecycle state of a [`Bot`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Registering,
    Started,
    Stopped,
}

/// A bot session bound to one application and a set of guilds
pub struct Bot {
    guild_ids: Vec<u64>,
    gateway: Arc<dyn Gateway>,
    state: Mutex<SessionState>,
    registry: Mutex<CommandRegistry>,
    dispatching: Arc<AtomicBool>,
    shutdown: watch::Sender<bool>,
}

impl Bot {
    pub fn new(guild_ids: Vec<u64>, gateway: Arc<dyn Gateway>) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            guild_ids,
            gateway,
            state: Mutex::new(SessionState::Created),
            registry: Mutex::new(CommandRegistry::new()),
            dispatching: Arc::new(AtomicBool::new(false)),
            shutdown,
        }
    }

    /// Build a session connected to Discord through serenity
    pub fn from_config(config: &BotConfig) -> Result<Self> {
        let gateway = SerenityGateway::new(&config.token, config.application_id()?);
        Ok(Self::new(config.guild_ids()?, Arc::new(gateway)))
    }

    pub fn state(&self) -> SessionState {
        *lock(&self.state)
    }

    /// Register a command and its handler
    ///
    /// Only allowed before [`Bot::start`]. Duplicate names are rejected, and a
    /// session with a rejected registration refuses to start.
    pub fn register(
        &self,
        descriptor: CommandDescriptor,
        handler: Arc<dyn SlashCommandHandler>,
    ) -> Result<(), BotError> {
        let mut state = lock(&self.state);
        if !matches!(*state, SessionState::Created | SessionState::Registering) {
            return Err(BotError::RegistrationClosed(descriptor.name));
        }
        *state = SessionState::Registering;
        lock(&self.registry).register(descriptor, handler)
    }

    /// Register commands, connect, and wait for [`Bot::stop`]
    ///
    /// The first failing guild overwrite aborts the start without touching
    /// the remaining guilds, as does a [`Bot::stop`] issued mid-registration.
    /// Returns `Ok(())` after a clean shutdown.
    pub async fn start(&self) -> Result<(), BotError> {
        let registry = self.freeze()?;
        let result = self.run(registry).await;

        self.dispatching.store(false, Ordering::SeqCst);
        *lock(&self.state) = SessionState::Stopped;
        result
    }

    /// Close the connection and release a pending [`Bot::start`]
    ///
    /// Handlers already running are not interrupted. Calling this again is a
    /// no-op.
    pub async fn stop(&self) {
        let previous = std::mem::replace(&mut *lock(&self.state), SessionState::Stopped);
        if previous == SessionState::Stopped {
            debug!("Bot session already stopped");
            return;
        }

        info!("Stopping bot session");
        self.dispatching.store(false, Ordering::SeqCst);
        self.gateway.close().await;
        self.shutdown.send_replace(true);
    }

    /// Move to `Started` and take the registry out of reach of `register`
    fn freeze(&self) -> Result<Arc<CommandRegistry>, BotError> {
        let mut state = lock(&self.state);
        if !matches!(*state, SessionState::Created | SessionState::Registering) {
            return Err(BotError::AlreadyStarted);
        }

        let mut registry = lock(&self.registry);
        if !registry.rejected().is_empty() {
            *state = SessionState::Stopped;
            return Err(BotError::InvalidRegistration(registry.rejected().to_vec()));
        }

        *state = SessionState::Started;
        self.dispatching.store(true, Ordering::SeqCst);
        Ok(Arc::new(std::mem::take(&mut *registry)))
    }

    async fn run(&self, registry: Arc<CommandRegistry>) -> Result<(), BotError> {
        let listener = Arc::new(Dispatcher {
            registry: Arc::clone(&registry),
            dispatching: Arc::clone(&self.dispatching),
        });

        for &guild_id in &self.guild_ids {
            if !self.dispatching.load(Ordering::SeqCst) {
                info!("Session stopped during command registration");
                return Ok(());
            }
            info!("Registering commands for guild {guild_id}");
            self.gateway
                .overwrite_guild_commands(guild_id, registry.descriptors())
                .await
                .map_err(|source| BotError::CommandOverwrite { guild_id, source })?;
        }

        info!(
            "Connecting to gateway with {} commands registered",
            registry.len()
        );
        let shutdown = self.shutdown.subscribe();
        tokio::select! {
            biased;
            _ = wait_for_shutdown(shutdown) => Ok(()),
            result = self.gateway.connect(listener) => result.map_err(BotError::Connection),
        }
    }
}

/// Listener attached to the gateway for the lifetime of one start
struct Dispatcher {
    registry: Arc<CommandRegistry>,
    dispatching: Arc<AtomicBool>,
}

#[async_trait]
impl EventListener for Dispatcher {
    async fn on_ready(&self, identity: &str) {
        info!("Logged in as {identity}");
    }

    async fn on_interaction(&self, interaction: Interaction) {
        if !self.dispatching.load(Ordering::SeqCst) {
            debug!("Dropping /{} received after shutdown", interaction.command_name);
            return;
        }
        if interaction.kind != InteractionKind::ApplicationCommand {
            return;
        }
        self.registry.dispatch(&interaction).await;
    }
}

async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
