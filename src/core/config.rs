//! Bot configuration
//!
//! Loaded from a TOML file (`./bot.toml` unless `BOT_CONFIG_PATH` says
//! otherwise). The Discord token may be supplied through `DISCORD_TOKEN`
//! instead, including from a `.env` file.
//!
//! ```toml
//! db_path = "dmv.db"
//! log_file = "bot.log"
//!
//! [bot]
//! token = "..."
//! application_id = "1020304050"
//! guild_ids = ["1122334455"]
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "./bot.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// SQLite file for user settings; settings stay in memory when unset
    #[serde(default, alias = "DBPath")]
    pub db_path: Option<String>,
    #[serde(default = "default_log_file", alias = "LogFile")]
    pub log_file: String,
    #[serde(default = "default_log_level", alias = "LogLevel")]
    pub log_level: String,
    pub bot: BotConfig,
}

/// Credentials and guild targets for one bot application
#[derive(Clone, Deserialize)]
pub struct BotConfig {
    #[serde(default, alias = "Token")]
    pub token: String,
    #[serde(alias = "ApplicationId")]
    pub application_id: String,
    /// Guilds that receive the slash commands
    #[serde(default, alias = "GuildIds")]
    pub guild_ids: Vec<String>,
}

fn default_log_file() -> String {
    "bot.log".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Config file location, honoring `BOT_CONFIG_PATH`
    pub fn path() -> PathBuf {
        std::env::var("BOT_CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Read, parse and validate the config file, applying env overrides
    pub fn load(path: &Path) -> Result<Self> {
        let doc = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml_str(&doc)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        if let Ok(token) = std::env::var("DISCORD_TOKEN") {
            config.bot.token = token;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(doc: &str) -> Result<Self> {
        Ok(toml::from_str(doc)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bot.token.trim().is_empty() {
            bail!("bot.token is empty (set it in the config file or DISCORD_TOKEN)");
        }
        self.bot.application_id()?;
        self.bot.guild_ids()?;
        Ok(())
    }
}

impl BotConfig {
    pub fn application_id(&self) -> Result<u64> {
        parse_snowflake("bot.application_id", &self.application_id)
    }

    pub fn guild_ids(&self) -> Result<Vec<u64>> {
        self.guild_ids
            .iter()
            .map(|id| parse_snowflake("bot.guild_ids", id))
            .collect()
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("application_id", &self.application_id)
            .field("guild_ids", &self.guild_ids)
            .finish()
    }
}

fn parse_snowflake(field: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .with_context(|| format!("{field}: `{value}` is not a valid Discord id"))
}
