use chrono::{DateTime, FixedOffset, NaiveTime, Utc};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use teloxide::prelude::*;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use uuid::Uuid;

use crate::storage::{ReminderKey, ReminderStore};
use crate::utils::datetime::{daily_cron, format_datetime, ReminderTimezone};
use crate::utils::logging::log_system_event;
use crate::utils::validation::{validate_reminder_time, validate_telegram_chat_id};

pub const INVALID_TIME: &str = "Invalid time!";
pub const NOT_FOUND: &str = "Reminder not found!";
pub const USAGE: &str = "Usage: /reminder [get | add HH:MM | remove HH:MM | clear]";

#[derive(Debug, Error)]
pub enum ReminderError {
    #[error("invalid reminder time '{0}'")]
    InvalidTime(String),
    #[error("invalid chat id {0}")]
    InvalidChat(i64),
    #[error("unknown reminder action '{0}'")]
    UnknownAction(String),
    #[error("malformed reminder entry '{0}'")]
    MalformedEntry(String),
    #[error("reminder file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("reminder file is not a JSON list of names: {0}")]
    Format(#[from] serde_json::Error),
    #[error("scheduler error: {0}")]
    Scheduler(#[from] JobSchedulerError),
}

impl ReminderError {
    /// Text shown to the chat when a `/reminder` action fails
    pub fn user_message(&self) -> &'static str {
        match self {
            ReminderError::InvalidTime(_) => INVALID_TIME,
            ReminderError::UnknownAction(_) => USAGE,
            _ => "Failed to update reminders!",
        }
    }
}

/// Sub-command of `/reminder`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderAction {
    Get,
    Add(String),
    Remove(String),
    Clear,
}

impl ReminderAction {
    /// No arguments lists reminders. A missing time is kept empty and rejected later.
    pub fn parse(args: &[String]) -> Result<Self, ReminderError> {
        let Some((action, rest)) = args.split_first() else {
            return Ok(Self::Get);
        };
        let time = rest.first().cloned().unwrap_or_default();

        match action.as_str() {
            "get" => Ok(Self::Get),
            "add" => Ok(Self::Add(time)),
            "remove" => Ok(Self::Remove(time)),
            "clear" => Ok(Self::Clear),
            other => Err(ReminderError::UnknownAction(other.to_string())),
        }
    }
}

/// A live reminder and when it fires next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledReminder {
    pub key: ReminderKey,
    /// `None` only if the time never occurs again in the timezone
    pub next_at: Option<DateTime<FixedOffset>>,
}

/// Outcome of scheduling a reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyScheduled,
}

/// Daily reminders per chat, backed by a cron scheduler and a JSON file of job names.
pub struct ReminderService {
    bot: Bot,
    scheduler: JobScheduler,
    store: ReminderStore,
    timezone: ReminderTimezone,
    message: String,
    jobs: Mutex<BTreeMap<ReminderKey, Uuid>>,
}

impl ReminderService {
    pub async fn new(
        bot: Bot,
        store: ReminderStore,
        timezone: ReminderTimezone,
        message: String,
    ) -> Result<Self, ReminderError> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            bot,
            scheduler,
            store,
            timezone,
            message,
            jobs: Mutex::new(BTreeMap::new()),
        })
    }

    pub async fn start(&self) -> Result<(), ReminderError> {
        self.scheduler.start().await?;
        log_system_event("Reminder scheduler started", Some(&format!("timezone {}", self.timezone)));
        Ok(())
    }

    pub async fn stop(&self) -> Result<(), ReminderError> {
        let mut scheduler = self.scheduler.clone();
        scheduler.shutdown().await?;
        log_system_event("Reminder scheduler stopped", None);
        Ok(())
    }

    /// Schedules every entry of the reminder file. Bad entries are skipped.
    pub async fn load(&self) -> Result<usize, ReminderError> {
        let names = self.store.load().await?;
        let mut jobs = self.jobs.lock().await;
        let mut loaded = 0;

        for name in names {
            let key = match name.parse::<ReminderKey>() {
                Ok(key) => key,
                Err(e) => {
                    tracing::warn!("Skipping reminder entry: {}", e);
                    continue;
                }
            };
            if jobs.contains_key(&key) {
                continue;
            }
            let uuid = self.schedule(key).await?;
            jobs.insert(key, uuid);
            loaded += 1;
        }

        log_system_event("Reminders loaded", Some(&format!("{} from {}", loaded, self.store.path().display())));
        Ok(loaded)
    }

    pub async fn count(&self) -> usize {
        self.jobs.lock().await.len()
    }

    /// Reminders of one chat in time order
    pub async fn list(&self, chat_id: i64, now: DateTime<Utc>) -> Vec<ScheduledReminder> {
        self.jobs
            .lock()
            .await
            .keys()
            .filter(|key| key.chat_id == chat_id)
            .map(|key| ScheduledReminder {
                key: *key,
                next_at: self.timezone.next_fire(now, key.time),
            })
            .collect()
    }

    /// Nothing changes unless the job is both scheduled and saved.
    pub async fn add(&self, chat_id: i64, time: NaiveTime) -> Result<AddOutcome, ReminderError> {
        validate_telegram_chat_id(chat_id).map_err(|_| ReminderError::InvalidChat(chat_id))?;
        let key = ReminderKey::new(chat_id, time);
        let mut jobs = self.jobs.lock().await;

        if jobs.contains_key(&key) {
            return Ok(AddOutcome::AlreadyScheduled);
        }

        let uuid = self.schedule(key).await?;
        jobs.insert(key, uuid);

        if let Err(e) = self.persist(&jobs).await {
            jobs.remove(&key);
            if let Err(undo) = self.scheduler.remove(&uuid).await {
                tracing::error!("Failed to unschedule reminder {}: {}", key, undo);
            }
            return Err(e);
        }

        tracing::info!("Scheduled reminder {}", key);
        Ok(AddOutcome::Added)
    }

    /// Returns whether a reminder existed. A failed save keeps the reminder.
    pub async fn remove(&self, chat_id: i64, time: NaiveTime) -> Result<bool, ReminderError> {
        let key = ReminderKey::new(chat_id, time);
        let mut jobs = self.jobs.lock().await;

        let Some(uuid) = jobs.get(&key).copied() else {
            return Ok(false);
        };

        self.scheduler.remove(&uuid).await?;
        jobs.remove(&key);

        if let Err(e) = self.persist(&jobs).await {
            self.restore(&mut jobs, &[key]).await;
            return Err(e);
        }

        tracing::info!("Removed reminder {}", key);
        Ok(true)
    }

    /// Removes every reminder of the chat and returns the removed keys
    pub async fn clear(&self, chat_id: i64) -> Result<Vec<ReminderKey>, ReminderError> {
        let mut jobs = self.jobs.lock().await;
        let keys: Vec<ReminderKey> = jobs.keys().filter(|key| key.chat_id == chat_id).copied().collect();

        if keys.is_empty() {
            return Ok(keys);
        }

        let mut removed = Vec::with_capacity(keys.len());
        for key in &keys {
            let Some(uuid) = jobs.get(key).copied() else {
                continue;
            };
            if let Err(e) = self.scheduler.remove(&uuid).await {
                self.restore(&mut jobs, &removed).await;
                return Err(e.into());
            }
            jobs.remove(key);
            removed.push(*key);
        }

        if let Err(e) = self.persist(&jobs).await {
            self.restore(&mut jobs, &removed).await;
            return Err(e);
        }

        tracing::info!("Cleared {} reminders in chat {}", removed.len(), chat_id);
        Ok(removed)
    }

    /// Runs a `/reminder` action and builds the reply text.
    pub async fn respond(
        &self,
        chat_id: i64,
        action: ReminderAction,
        now: DateTime<Utc>,
    ) -> Result<String, ReminderError> {
        match action {
            ReminderAction::Get => {
                let reminders = self.list(chat_id, now).await;
                if reminders.is_empty() {
                    return Ok(NOT_FOUND.to_string());
                }
                Ok(reminders
                    .iter()
                    .map(|r| {
                        let next = r.next_at.as_ref().map_or_else(|| "-".to_string(), format_datetime);
                        format!("{}, next at {}", r.key.time_label(), next)
                    })
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            ReminderAction::Add(input) => {
                let Ok(time) = validate_reminder_time(&input) else {
                    return Err(ReminderError::InvalidTime(input));
                };
                self.add(chat_id, time).await?;
                Ok(format!("Send reminder at {}", ReminderKey::new(chat_id, time).time_label()))
            }
            ReminderAction::Remove(input) => {
                let Ok(time) = validate_reminder_time(&input) else {
                    return Err(ReminderError::InvalidTime(input));
                };
                if self.remove(chat_id, time).await? {
                    Ok(format!("Remove reminder at {}", ReminderKey::new(chat_id, time).time_label()))
                } else {
                    Ok(NOT_FOUND.to_string())
                }
            }
            ReminderAction::Clear => {
                let removed = self.clear(chat_id).await?;
                if removed.is_empty() {
                    return Ok(NOT_FOUND.to_string());
                }
                Ok(removed
                    .iter()
                    .map(|key| format!("Remove reminder at {}", key.time_label()))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
        }
    }

    async fn schedule(&self, key: ReminderKey) -> Result<Uuid, ReminderError> {
        let cron = daily_cron(key.time);
        let run = reminder_job(self.bot.clone(), key, self.message.clone());

        let job = match self.timezone {
            ReminderTimezone::Named(tz) => Job::new_async_tz(cron.as_str(), tz, run)?,
            ReminderTimezone::Fixed(offset) => Job::new_async_tz(cron.as_str(), offset, run)?,
        };

        Ok(self.scheduler.add(job).await?)
    }

    /// Schedules `keys` again after a failed update
    async fn restore(&self, jobs: &mut BTreeMap<ReminderKey, Uuid>, keys: &[ReminderKey]) {
        for key in keys {
            match self.schedule(*key).await {
                Ok(uuid) => {
                    jobs.insert(*key, uuid);
                }
                Err(e) => tracing::error!("Failed to restore reminder {}: {}", key, e),
            }
        }
    }

    async fn persist(&self, jobs: &BTreeMap<ReminderKey, Uuid>) -> Result<(), ReminderError> {
        let names: Vec<String> = jobs.keys().map(ReminderKey::job_name).collect();
        self.store.save(&names).await
    }
}

type JobFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

fn reminder_job(
    bot: Bot,
    key: ReminderKey,
    message: String,
) -> impl FnMut(Uuid, JobScheduler) -> JobFuture + Send + Sync + 'static {
    move |_uuid, _l| {
        let bot = bot.clone();
        let message = message.clone();
        let fut: JobFuture = Box::pin(async move {
            match fire_reminder(&bot, key, &message).await {
                Ok(()) => tracing::info!("Sent reminder {}", key),
                Err(e) => tracing::error!("Failed to send reminder {}: {}", key, e),
            }
        });
        fut
    }
}

/// Sends the reminder text to the chat of `key`.
pub async fn fire_reminder(bot: &Bot, key: ReminderKey, message: &str) -> ResponseResult<()> {
    bot.send_message(ChatId(key.chat_id), message).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_action() {
        assert_eq!(ReminderAction::parse(&[]).unwrap(), ReminderAction::Get);
        assert_eq!(ReminderAction::parse(&args(&["get"])).unwrap(), ReminderAction::Get);
        assert_eq!(
            ReminderAction::parse(&args(&["add", "09:00"])).unwrap(),
            ReminderAction::Add("09:00".to_string())
        );
        assert_eq!(
            ReminderAction::parse(&args(&["remove", "9:00", "extra"])).unwrap(),
            ReminderAction::Remove("9:00".to_string())
        );
        assert_eq!(ReminderAction::parse(&args(&["clear"])).unwrap(), ReminderAction::Clear);
    }

    #[test]
    fn test_parse_action_missing_time_is_empty() {
        assert_eq!(ReminderAction::parse(&args(&["add"])).unwrap(), ReminderAction::Add(String::new()));
    }

    #[test]
    fn test_parse_unknown_action() {
        let err = ReminderAction::parse(&args(&["snooze"])).unwrap_err();
        assert!(matches!(err, ReminderError::UnknownAction(ref a) if a == "snooze"));
    }
}
