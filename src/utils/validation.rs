use anyhow::{anyhow, Result};
use chrono::NaiveTime;

/// Parses a reminder time written as `H:MM` or `HH:MM` on a 24 hour clock.
pub fn validate_reminder_time(input: &str) -> Result<NaiveTime> {
    let input = input.trim();

    if input.is_empty() {
        return Err(anyhow!("Reminder time cannot be empty"));
    }

    let (hour, minute) = input
        .split_once(':')
        .ok_or_else(|| anyhow!("Reminder time '{}' must look like HH:MM", input))?;

    if hour.is_empty() || hour.len() > 2 || !hour.chars().all(|c| c.is_ascii_digit()) {
        return Err(anyhow!("Invalid hour in '{}'", input));
    }
    if minute.len() != 2 || !minute.chars().all(|c| c.is_ascii_digit()) {
        return Err(anyhow!("Invalid minute in '{}'", input));
    }

    let hour: u32 = hour.parse()?;
    let minute: u32 = minute.parse()?;

    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| anyhow!("Reminder time '{}' is out of range", input))
}

/// Largest Telegram user id: ids are guaranteed to fit in 52 bits.
pub const MAX_USER_CHAT_ID: i64 = (1 << 52) - 1;

pub fn validate_telegram_chat_id(chat_id: i64) -> Result<()> {
    // Telegram chat IDs should be non-zero
    if chat_id == 0 {
        return Err(anyhow!("Chat ID cannot be zero"));
    }

    // Positive IDs are user chats
    if chat_id > MAX_USER_CHAT_ID {
        return Err(anyhow!("Invalid user chat ID range"));
    }

    // Supergroups and channels go down to around -1000000000000
    if chat_id < -2000000000000 {
        return Err(anyhow!("Chat ID out of valid range"));
    }

    Ok(())
}
