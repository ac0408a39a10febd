//! # Meow Bot Main Entry Point
//!
//! Loads configuration, initializes logging, restores saved reminders,
//! and runs the Telegram dispatcher next to the health endpoint.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;

use meow_bot::bot::handlers::{BotHandler, BotState, WarnErrorHandler};
use meow_bot::config::{Cli, Config};
use meow_bot::services::health::HealthService;
use meow_bot::services::random::RandomReplies;
use meow_bot::services::reminder::ReminderService;
use meow_bot::storage::ReminderStore;
use meow_bot::utils::logging::{init_tracing, LogFormat};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load(&cli.file)?;

    init_tracing(&config.log_filter(&cli.log_level), config.log_format());

    if let Some(format) = config.logging.format.as_deref() {
        if LogFormat::parse(format).is_none() {
            tracing::warn!("Unknown logging.format '{}', using full", format);
        }
    }

    info!("Starting Meow Bot v{}", env!("CARGO_PKG_VERSION"));
    info!("Config file: {}", cli.file.display());

    let bot = Bot::new(&config.bot.token);
    let replies = RandomReplies::from_config(&config.bot.commands)?;

    // Initialize reminder service and restore saved reminders
    info!("Initializing reminder service...");
    let reminder_config = &config.bot.reminder;
    let reminders = Arc::new(
        ReminderService::new(
            bot.clone(),
            ReminderStore::new(&reminder_config.file),
            reminder_config.timezone()?,
            reminder_config.message.clone(),
        )
        .await?,
    );
    let restored = reminders.load().await?;
    info!("Restored {} reminders", restored);

    if let Err(e) = reminders.start().await {
        tracing::error!("Failed to start reminder service: {}", e);
        return Err(e.into());
    }

    let handler = BotHandler::new(BotState {
        replies,
        reminders: reminders.clone(),
    });

    let health_service = HealthService::new(reminders.clone());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http.port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http.port, e))?;

    info!("Health check server starting on port {}", config.http.port);

    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, handler.schema())
            .error_handler(Arc::new(WarnErrorHandler))
            .default_handler(|upd| async move {
                tracing::debug!("Unhandled update: {:?}", upd.id);
            })
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    // Either task finishing means shutdown
    tokio::select! {
        result1 = bot_task => {
            if let Err(e) = result1 {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result2 = health_task => {
            if let Err(e) = result2 {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    if let Err(e) = reminders.stop().await {
        tracing::warn!("Error stopping reminder service: {}", e);
    }

    info!("Application stopped");
    Ok(())
}
