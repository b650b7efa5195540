//! Application services - Business logic orchestration

pub mod group_service;
pub mod command_processor;
pub mod message_service;

pub use group_service::GroupService;
pub use command_processor::{CommandProcessor, EditOp, GroupEdit};
pub use message_service::MessageService;
