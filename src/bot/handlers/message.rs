use std::sync::Arc;

use teloxide::prelude::*;

use super::{BotState, HandlerResult};
use crate::bot::commands::{fun, reminders, split_args, Command};
use crate::utils::logging::{log_command_start, log_command_success};

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<BotState>,
) -> HandlerResult {
    let (user, user_id) = msg
        .from()
        .map(|u| (u.full_name(), u.id.0))
        .unwrap_or_else(|| ("unknown".to_string(), 0));
    let chat_id = msg.chat.id.0;
    let name = command_name(&cmd);
    let details = command_details(&cmd);

    log_command_start(name, &user, user_id, chat_id, details.as_deref());

    let replies = &state.replies;
    match cmd {
        Command::Start | Command::Help => fun::handle_help(bot, msg, replies).await?,
        Command::Meow => fun::handle_meow(bot, msg, replies).await?,
        Command::Greet => fun::handle_greet(bot, msg).await?,
        Command::Chance(raw) => fun::handle_chance(bot, msg, &split_args(&raw), replies).await?,
        Command::Fortune(raw) => fun::handle_fortune(bot, msg, &split_args(&raw), replies).await?,
        Command::Pick(raw) => fun::handle_pick(bot, msg, &split_args(&raw), replies).await?,
        Command::Dice => fun::handle_dice(bot, msg).await?,
        Command::Reminder(raw) => {
            reminders::handle_reminder(bot, msg, &split_args(&raw), &state.reminders).await?
        }
    }

    log_command_success(name, &user, user_id, chat_id, details.as_deref());
    Ok(())
}

pub fn command_name(cmd: &Command) -> &'static str {
    match cmd {
        Command::Start => "/start",
        Command::Help => "/help",
        Command::Meow => "/meow",
        Command::Greet => "/greet",
        Command::Chance(_) => "/chance",
        Command::Fortune(_) => "/fortune",
        Command::Pick(_) => "/pick",
        Command::Dice => "/dice",
        Command::Reminder(_) => "/reminder",
    }
}

/// Arguments of the command for the log line, if it took any
pub fn command_details(cmd: &Command) -> Option<String> {
    let raw = match cmd {
        Command::Chance(raw) | Command::Fortune(raw) | Command::Pick(raw) | Command::Reminder(raw) => raw,
        _ => return None,
    };
    let args = split_args(raw);
    (!args.is_empty()).then(|| format!("args: {}", args.join(" ")))
}
