//! Message parser - Parses raw messages into structured messages

use crate::domain::entities::{Content, Message};

/// Parses incoming text into structured Message objects
#[derive(Debug, Clone, Default)]
pub struct MessageParser {
    bot_username: Option<String>,
}

impl MessageParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands addressed as `/cmd@other_bot` are ignored once the own username is known
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    /// Parse a text message
    pub fn parse(&self, chat_id: impl Into<String>, text: impl Into<String>) -> Message {
        let text = text.into();
        let chat_id = chat_id.into();

        match text.strip_prefix('/').and_then(|body| self.parse_command(body)) {
            Some(content) => Message::new(chat_id, content),
            None => Message::from_text(chat_id, text),
        }
    }

    /// Parse the part after `/`. Returns None when the command targets another bot.
    fn parse_command(&self, body: &str) -> Option<Content> {
        let (token, rest) = match body.find(char::is_whitespace) {
            Some(i) => body.split_at(i),
            None => (body, ""),
        };

        let name = match token.split_once('@') {
            Some((name, target)) => {
                if let Some(own) = &self.bot_username {
                    if !own.eq_ignore_ascii_case(target) {
                        return None;
                    }
                }
                name
            }
            None => token,
        };

        let args = rest.trim_start();
        let args = (!args.is_empty()).then(|| args.to_string());

        Some(Content::Command {
            name: name.to_string(),
            args,
        })
    }
}
