//! allo-bot - per-chat mention groups for Telegram
//!
//! Members of a chat add and remove handles with `/g`, then `/call` mentions
//! everyone in the group at once. Groups are kept in one JSON document.

pub mod domain;
pub mod application;
pub mod infrastructure;
