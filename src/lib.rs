//! # Meow Bot
//!
//! A small Telegram bot with a handful of playful commands.
//!
//! ## Features
//! - Weighted random cat noises and fortunes
//! - Random percentages, picks and dice
//! - Echo of plain text messages
//! - Daily per-chat reminders persisted to a JSON file

/// Bot command handlers and message processing
pub mod bot;
/// Configuration file, environment overrides and CLI arguments
pub mod config;
/// Background services: reminders, random replies, health endpoint
pub mod services;
/// Reminder persistence
pub mod storage;
/// Utility functions for datetime, validation, logging and replies
pub mod utils;
