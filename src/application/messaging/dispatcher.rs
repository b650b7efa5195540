//! Message dispatcher - Routes messages to handlers

use crate::domain::entities::{Command, CommandKind, Content, Message};
use crate::domain::traits::GroupStore;
use crate::application::errors::BotError;
use crate::application::services::CommandProcessor;
use super::parser::MessageParser;

/// Handler result: `None` means the message gets no reply
pub type HandlerResult = Result<Option<String>, BotError>;

/// Message dispatcher - routes commands to the processor
pub struct MessageDispatcher<S: GroupStore> {
    parser: MessageParser,
    processor: CommandProcessor<S>,
}

impl<S: GroupStore> MessageDispatcher<S> {
    pub fn new(processor: CommandProcessor<S>) -> Self {
        Self {
            parser: MessageParser::new(),
            processor,
        }
    }

    pub fn with_parser(mut self, parser: MessageParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn parser(&self) -> &MessageParser {
        &self.parser
    }

    pub fn processor(&self) -> &CommandProcessor<S> {
        &self.processor
    }

    /// Process a raw text message
    pub fn process_text(&self, chat_id: impl Into<String>, text: impl Into<String>) -> HandlerResult {
        let message = self.parser.parse(chat_id, text);
        self.process(&message)
    }

    /// Process a message through the dispatcher
    pub fn process(&self, message: &Message) -> HandlerResult {
        let Content::Command { name, args } = &message.content else {
            return Ok(None);
        };

        let Some(command) = Command::find(name) else {
            tracing::debug!("[{}] Ignoring unknown command /{}", message.chat_id, name);
            return Ok(None);
        };

        tracing::debug!("[{}] /{} {:?}", message.chat_id, command.name, args);

        let chat_id = message.chat_id.as_str();
        let reply = match command.kind {
            CommandKind::Help => self.processor.help(),
            CommandKind::Group => self.processor.group_edit(args.as_deref(), chat_id)?,
            CommandKind::Call => self.processor.call(chat_id)?,
            CommandKind::List => self.processor.list(chat_id)?,
        };

        Ok(Some(reply))
    }
}
