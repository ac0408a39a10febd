pub mod general_message;
pub mod message;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use teloxide::{
    dispatching::{HandlerExt, UpdateFilterExt, UpdateHandler},
    error_handlers::ErrorHandler,
    prelude::*,
};

use crate::bot::commands::Command;
use crate::services::random::RandomReplies;
use crate::services::reminder::ReminderService;

pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type HandlerResult = Result<(), HandlerError>;

/// Shared by every handler for the lifetime of the dispatcher
pub struct BotState {
    pub replies: RandomReplies,
    pub reminders: Arc<ReminderService>,
}

pub struct BotHandler {
    pub state: Arc<BotState>,
}

impl BotHandler {
    pub fn new(state: BotState) -> Self {
        Self { state: Arc::new(state) }
    }

    pub fn schema(&self) -> UpdateHandler<HandlerError> {
        let state = self.state.clone();

        Update::filter_message()
            .branch(
                dptree::entry()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let state = state.clone();
                        async move { message::command_handler(bot, msg, cmd, state).await }
                    }),
            )
            .branch(
                dptree::filter(|msg: Message| general_message::is_echoable(&msg))
                    .endpoint(general_message::handle_general_message),
            )
    }
}

/// Logs dispatcher errors as warnings and keeps polling.
pub struct WarnErrorHandler;

impl<E> ErrorHandler<E> for WarnErrorHandler
where
    E: std::fmt::Display + Send + 'static,
{
    fn handle_error(self: Arc<Self>, error: E) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        tracing::warn!("Update handler failed: {}", error);
        Box::pin(async {})
    }
}
