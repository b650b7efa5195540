use crate::domain::entities::Message;
use crate::domain::traits::{Bot, GroupStore};
use crate::application::errors::BotError;
use crate::application::messaging::MessageDispatcher;

/// Service for processing messages: dispatch, then reply on the originating chat
pub struct MessageService<B: Bot, S: GroupStore> {
    bot: B,
    dispatcher: MessageDispatcher<S>,
}

impl<B: Bot, S: GroupStore> MessageService<B, S> {
    pub fn new(bot: B, dispatcher: MessageDispatcher<S>) -> Self {
        Self { bot, dispatcher }
    }

    pub fn bot(&self) -> &B {
        &self.bot
    }

    pub fn dispatcher(&self) -> &MessageDispatcher<S> {
        &self.dispatcher
    }

    /// Process an incoming message and send the reply, if any
    pub async fn process(&self, message: Message) -> Result<Option<String>, BotError> {
        let reply = self.dispatcher.process(&message)?;

        if let Some(text) = &reply {
            self.respond(&message.chat_id, text, message.id.as_deref()).await?;
        }

        Ok(reply)
    }

    /// Send a response message
    pub async fn respond(&self, chat_id: &str, text: &str, reply_to: Option<&str>) -> Result<String, BotError> {
        self.bot.send_message(chat_id, text, reply_to).await
    }
}
