use chrono::NaiveTime;
use std::fmt;
use std::str::FromStr;

use crate::services::reminder::ReminderError;
use crate::utils::datetime::format_time;
use crate::utils::validation::{validate_reminder_time, validate_telegram_chat_id};

/// One daily reminder: a chat and the local time of day it fires at.
///
/// The job name `"{chat_id}@{HH:MM}"` is what gets persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReminderKey {
    pub chat_id: i64,
    pub time: NaiveTime,
}

impl ReminderKey {
    pub fn new(chat_id: i64, time: NaiveTime) -> Self {
        Self { chat_id, time }
    }

    pub fn job_name(&self) -> String {
        self.to_string()
    }

    pub fn time_label(&self) -> String {
        format_time(&self.time)
    }
}

impl fmt::Display for ReminderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.chat_id, format_time(&self.time))
    }
}

impl FromStr for ReminderKey {
    type Err = ReminderError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let malformed = || ReminderError::MalformedEntry(name.to_string());

        let (chat, time) = name.rsplit_once('@').ok_or_else(malformed)?;
        let chat_id: i64 = chat.trim().parse().map_err(|_| malformed())?;
        validate_telegram_chat_id(chat_id).map_err(|_| malformed())?;
        let time = validate_reminder_time(time).map_err(|_| malformed())?;

        Ok(Self { chat_id, time })
    }
}
