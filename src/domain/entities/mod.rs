//! Domain entities - Core business objects with no external dependencies

pub mod group;
pub mod message;
pub mod command;

pub use group::{GroupTable, Handle, MentionGroup};
pub use message::{Message, Content};
pub use command::{Command, CommandKind, COMMANDS};
