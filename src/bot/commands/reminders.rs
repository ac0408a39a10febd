use chrono::Utc;
use teloxide::prelude::*;

use crate::services::reminder::{ReminderAction, ReminderError, ReminderService};
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_command_error, log_validation_error};

pub async fn handle_reminder(
    bot: Bot,
    msg: Message,
    args: &[String],
    reminders: &ReminderService,
) -> ResponseResult<()> {
    let feedback = CommandFeedback::new(bot, &msg);
    let chat_id = feedback.chat_id().0;

    let result = match ReminderAction::parse(args) {
        Ok(action) => reminders.respond(chat_id, action, Utc::now()).await,
        Err(e) => Err(e),
    };

    let text = match result {
        Ok(text) => text,
        Err(e) => {
            report_failure(&msg, args, &e);
            e.user_message().to_string()
        }
    };

    feedback.reply(text).await?;
    Ok(())
}

fn report_failure(msg: &Message, args: &[String], error: &ReminderError) {
    let chat_id = msg.chat.id.0;
    match error {
        ReminderError::InvalidTime(value) => {
            log_validation_error("/reminder", "time", value, &error.to_string(), chat_id)
        }
        ReminderError::UnknownAction(value) => {
            log_validation_error("/reminder", "action", value, &error.to_string(), chat_id)
        }
        _ => {
            let (user, user_id) = msg
                .from()
                .map(|u| (u.full_name(), u.id.0))
                .unwrap_or_else(|| ("unknown".to_string(), 0));
            log_command_error(
                &format!("/reminder {}", args.join(" ")),
                &user,
                user_id,
                chat_id,
                &error.to_string(),
            );
        }
    }
}
