use async_trait::async_trait;
use crate::domain::entities::Command;
use crate::application::errors::BotError;

/// Bot trait - abstraction for messaging platform adapters
#[async_trait]
pub trait Bot: Send + Sync {
    /// Prepare the bot for receiving messages
    async fn start(&self) -> Result<(), BotError>;

    /// Send a message to a chat, optionally as a reply to `reply_to`
    async fn send_message(&self, chat_id: &str, text: &str, reply_to: Option<&str>) -> Result<String, BotError>;

    /// Advertise the command menu to the platform
    async fn register_commands(&self, commands: &[Command]) -> Result<(), BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}
