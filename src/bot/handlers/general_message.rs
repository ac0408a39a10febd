use teloxide::prelude::*;

use super::HandlerResult;
use crate::utils::feedback::CommandFeedback;

/// Plain text that is not an attempted command
pub fn is_echoable(msg: &Message) -> bool {
    msg.text().is_some_and(is_echo_text)
}

pub fn is_echo_text(text: &str) -> bool {
    !text.is_empty() && !text.starts_with('/')
}

pub async fn handle_general_message(bot: Bot, msg: Message) -> HandlerResult {
    if let Some(text) = msg.text() {
        CommandFeedback::new(bot, &msg).reply(text).await?;
    }
    Ok(())
}
