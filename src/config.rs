use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::services::random::RandomReplies;
use crate::utils::datetime::ReminderTimezone;
use crate::utils::logging::LogFormat;

/// Command line arguments
#[derive(Debug, Clone, Parser)]
#[command(name = "meow-bot", version, about = "Telegram bot with cat noises, fortunes and reminders")]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(short = 'f', long = "file", default_value = "config.yaml")]
    pub file: PathBuf,
    /// Log filter used when neither RUST_LOG nor the config file sets one
    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bot: BotConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    #[serde(default)]
    pub token: String,
    pub commands: CommandsConfig,
    #[serde(default)]
    pub reminder: ReminderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandsConfig {
    pub help: HelpConfig,
    pub meow: ChoicesConfig,
    #[serde(default)]
    pub chance: ChanceConfig,
    pub fortune: ChoicesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HelpConfig {
    pub message: String,
}

/// Reply text mapped to its relative weight
#[derive(Debug, Clone, Deserialize)]
pub struct ChoicesConfig {
    pub choices: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChanceConfig {
    pub min: i64,
    pub max: i64,
}

impl Default for ChanceConfig {
    fn default() -> Self {
        Self { min: 0, max: 100 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// JSON file holding the scheduled reminder names
    pub file: PathBuf,
    /// IANA zone (`Asia/Taipei`) or UTC offset (`+08:00`) of the reminder times
    pub timezone: String,
    pub message: String,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("reminders.json"),
            timezone: "+00:00".to_string(),
            message: "Reminder!".to_string(),
        }
    }
}

impl ReminderConfig {
    pub fn timezone(&self) -> Result<ReminderTimezone> {
        ReminderTimezone::parse(&self.timezone)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    /// `full`, `compact` or `pretty`
    pub format: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

impl Config {
    /// Reads the YAML file, applies environment overrides and validates the result.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// `TELEGRAM_BOT_TOKEN` and `HTTP_PORT` take precedence over the file.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(token) = env::var("TELEGRAM_BOT_TOKEN") {
            if !token.trim().is_empty() {
                self.bot.token = token;
            }
        }

        if let Ok(port_str) = env::var("HTTP_PORT") {
            self.http.port = port_str
                .trim()
                .parse()
                .map_err(|_| anyhow!("Invalid HTTP_PORT"))?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.bot.token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        RandomReplies::from_config(&self.bot.commands)?;
        self.bot.reminder.timezone().context("Invalid reminder timezone")?;

        Ok(())
    }

    /// Filter directive for the tracing subscriber, preferring the config file.
    pub fn log_filter(&self, fallback: &str) -> String {
        self.logging
            .level
            .as_deref()
            .map(str::trim)
            .filter(|level| !level.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }

    /// Output format of the log lines. Unknown values fall back to `full`.
    pub fn log_format(&self) -> LogFormat {
        self.logging
            .format
            .as_deref()
            .and_then(LogFormat::parse)
            .unwrap_or_default()
    }
}
