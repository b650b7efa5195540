//! Domain layer - Core business logic with no external dependencies
//! 
//! This layer contains:
//! - Entities: Core business objects (Handle, MentionGroup, GroupTable, Message, Command)
//! - Traits: Abstractions for infrastructure (Bot, GroupStore)

pub mod entities;
pub mod traits;
