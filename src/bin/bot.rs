use std::fs::OpenOptions;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use log::{error, info};

use dmv::commands::create_all_handlers;
use dmv::core::Config;
use dmv::database::Database;
use dmv::features::user_config::{MemoryStore, UserConfigManager, UserConfigStore};
use dmv::Bot;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config_path = Config::path();
    let config = Config::load(&config_path)?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("Failed to open log file {}", config.log_file))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    info!("Starting bot");
    info!("Loaded config from {}", config_path.display());

    let store: Arc<dyn UserConfigStore> = match &config.db_path {
        Some(path) => Arc::new(Database::open(path).map_err(|e| {
            error!("Failed to open database: {e:#}");
            e
        })?),
        None => {
            info!("No db_path configured, user settings will only be kept in memory");
            Arc::new(MemoryStore::new())
        }
    };
    let user_configs = Arc::new(UserConfigManager::new(store));

    let bot = Arc::new(Bot::from_config(&config.bot)?);
    for (descriptor, handler) in create_all_handlers(user_configs) {
        bot.register(descriptor, handler)?;
    }

    let mut runner = tokio::spawn({
        let bot = Arc::clone(&bot);
        async move { bot.start().await }
    });

    tokio::select! {
        signal = shutdown_signal() => {
            signal?;
            info!("Shutting down");
            bot.stop().await;
            match runner.await {
                Ok(Ok(())) => info!("Bot stopped"),
                Ok(Err(e)) => error!("Bot stopped with error: {e:#}"),
                Err(e) => error!("Bot task failed: {e}"),
            }
        }
        finished = &mut runner => {
            // start only returns on its own when something went wrong
            if let Err(e) = finished.context("Bot task failed")? {
                error!("Fatal error: {e:#}");
                return Err(e.into());
            }
            info!("Gateway connection closed");
        }
    }

    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on unix
async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            interrupted = tokio::signal::ctrl_c() => interrupted?,
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}
