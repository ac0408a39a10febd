use teloxide::prelude::*;
use teloxide::types::MessageId;

/// Sends command output back into the chat the command came from
pub struct CommandFeedback {
    bot: Bot,
    chat_id: ChatId,
    message_id: MessageId,
}

impl CommandFeedback {
    pub fn new(bot: Bot, msg: &Message) -> Self {
        Self {
            bot,
            chat_id: msg.chat.id,
            message_id: msg.id,
        }
    }

    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    /// Reply quoting the triggering message
    pub async fn reply(&self, text: impl Into<String>) -> ResponseResult<Message> {
        self.bot
            .send_message(self.chat_id, text.into())
            .reply_to_message_id(self.message_id)
            .await
    }

    /// Plain message without a quote
    pub async fn send(&self, text: impl Into<String>) -> ResponseResult<Message> {
        self.bot.send_message(self.chat_id, text.into()).await
    }

    pub async fn dice(&self) -> ResponseResult<Message> {
        self.bot.send_dice(self.chat_id).await
    }
}
