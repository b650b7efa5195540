//! Command processor - turns command arguments into group mutations and replies

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::{Mutex, MutexGuard};

use crate::application::errors::{BotError, CommandError};
use crate::domain::entities::{Handle, COMMANDS};
use crate::domain::traits::GroupStore;
use super::GroupService;

/// `<sign> <handle>`: sign is `+` or `-`, one or more spaces, optional `@`.
/// `\w` is Unicode-aware, so non-Latin handles are accepted.
static EDIT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([+-]) +@?(\w+)$").expect("edit pattern compiles"));

const INVALID_FORMAT: &str =
    "⚠️ Invalid format!\nUse `/g + @username` to add or `/g - @username` to remove.";
const NOBODY_TO_CALL: &str =
    "Nobody to call! The group is empty.\nAdd users with `/g + @username`.";
const GROUP_EMPTY: &str =
    "ℹ️ The mention group is empty.  Add users with `/g + @username`.";

/// Direction of a `/g` edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Add,
    Remove,
}

/// A validated `/g` argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEdit {
    pub op: EditOp,
    pub handle: Handle,
}

impl GroupEdit {
    pub fn parse(args: &str) -> Result<Self, CommandError> {
        let caps = EDIT_PATTERN
            .captures(args)
            .ok_or_else(|| CommandError::InvalidFormat(args.to_string()))?;

        let op = match &caps[1] {
            "+" => EditOp::Add,
            _ => EditOp::Remove,
        };

        Ok(Self {
            op,
            handle: Handle::new(&caps[2]),
        })
    }
}

/// Handles the bot's commands against a single shared group table
///
/// All table access goes through one mutex, so an edit's
/// read-modify-write-save never interleaves with another.
pub struct CommandProcessor<S: GroupStore> {
    groups: Mutex<GroupService<S>>,
}

impl<S: GroupStore> CommandProcessor<S> {
    pub fn new(groups: GroupService<S>) -> Self {
        Self {
            groups: Mutex::new(groups),
        }
    }

    fn groups(&self) -> Result<MutexGuard<'_, GroupService<S>>, BotError> {
        self.groups
            .lock()
            .map_err(|_| BotError::Internal("Lock poisoned".to_string()))
    }

    /// `/g <+|-> @handle`
    pub fn group_edit(&self, args: Option<&str>, chat_id: &str) -> Result<String, BotError> {
        let edit = match args.map(GroupEdit::parse) {
            Some(Ok(edit)) => edit,
            Some(Err(e)) => {
                tracing::debug!("[{}] Rejected /g: {}", chat_id, e);
                return Ok(INVALID_FORMAT.to_string());
            }
            None => return Ok(INVALID_FORMAT.to_string()),
        };

        let mut groups = self.groups()?;
        match edit.op {
            EditOp::Add => {
                if groups.add_member(chat_id, edit.handle.clone())? {
                    tracing::info!("[{}] Added {}", chat_id, edit.handle);
                }
                Ok(format!("✅ User {} has been added to the mention group.", edit.handle))
            }
            EditOp::Remove => {
                // Same reply whether or not the handle was there
                if groups.remove_member(chat_id, &edit.handle)? {
                    tracing::info!("[{}] Removed {}", chat_id, edit.handle);
                }
                Ok(format!("🗑️ User {} has been removed from the mention group.", edit.handle))
            }
        }
    }

    /// `/call`
    pub fn call(&self, chat_id: &str) -> Result<String, BotError> {
        let groups = self.groups()?;
        match groups.members(chat_id).filter(|g| !g.is_empty()) {
            Some(group) => {
                let mentions: Vec<String> = group.iter().map(Handle::to_string).collect();
                Ok(format!("📣 Calling all members!\n\n{}", mentions.join(" ")))
            }
            None => Ok(NOBODY_TO_CALL.to_string()),
        }
    }

    /// `/list`
    pub fn list(&self, chat_id: &str) -> Result<String, BotError> {
        let groups = self.groups()?;
        match groups.members(chat_id).filter(|g| !g.is_empty()) {
            Some(group) => {
                let lines: Vec<String> = group
                    .iter()
                    .enumerate()
                    .map(|(i, handle)| format!("{}. {}", i + 1, handle))
                    .collect();
                Ok(format!("👥 Users in the mention group:\n\n{}", lines.join("\n")))
            }
            None => Ok(GROUP_EMPTY.to_string()),
        }
    }

    /// `/help`
    pub fn help(&self) -> String {
        let lines: Vec<String> = COMMANDS
            .iter()
            .map(|cmd| format!("/{} - {}", cmd.name, cmd.description))
            .collect();
        format!("Available commands:\n\n{}", lines.join("\n"))
    }

    /// Run `f` against the current group service
    pub fn with_groups<T>(&self, f: impl FnOnce(&GroupService<S>) -> T) -> Result<T, BotError> {
        Ok(f(&*self.groups()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::StorageError;
    use crate::domain::entities::GroupTable;
    use crate::infrastructure::storage::MemoryStore;

    fn processor() -> CommandProcessor<MemoryStore> {
        CommandProcessor::new(GroupService::open(MemoryStore::new()))
    }

    fn members(p: &CommandProcessor<MemoryStore>, chat_id: &str) -> Vec<String> {
        p.with_groups(|g| {
            g.members(chat_id)
                .map(|group| group.iter().map(|h| h.as_str().to_string()).collect::<Vec<_>>())
                .unwrap_or_default()
        })
        .unwrap()
    }

    struct FailingStore;

    impl GroupStore for FailingStore {
        fn load(&self) -> GroupTable {
            GroupTable::new()
        }

        fn save(&self, _table: &GroupTable) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    #[test]
    fn test_parse_edit() {
        let edit = GroupEdit::parse("+ @alice").unwrap();
        assert_eq!(edit.op, EditOp::Add);
        assert_eq!(edit.handle.as_str(), "alice");

        let edit = GroupEdit::parse("-   bob_1").unwrap();
        assert_eq!(edit.op, EditOp::Remove);
        assert_eq!(edit.handle.as_str(), "bob_1");

        let edit = GroupEdit::parse("+ @Вася").unwrap();
        assert_eq!(edit.handle.as_str(), "Вася");

        let edit = GroupEdit::parse("+ josé").unwrap();
        assert_eq!(edit.handle.as_str(), "josé");
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        for bad in ["alice", "+alice", "+ @@alice", "* alice", "+ alice bob", "+ al-ice", "", "+ @"] {
            assert!(
                matches!(GroupEdit::parse(bad), Err(CommandError::InvalidFormat(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_add_then_list() {
        let p = processor();
        let reply = p.group_edit(Some("+ @alice"), "1").unwrap();
        assert_eq!(reply, "✅ User @alice has been added to the mention group.");

        let reply = p.list("1").unwrap();
        assert!(reply.starts_with("👥 Users in the mention group:"));
        assert!(reply.contains("1. @alice"));
    }

    #[test]
    fn test_non_ascii_handles_are_added() {
        let p = processor();
        assert_eq!(
            p.group_edit(Some("+ Вася"), "1").unwrap(),
            "✅ User @Вася has been added to the mention group."
        );
        p.group_edit(Some("+ @josé"), "1").unwrap();
        assert_eq!(members(&p, "1"), vec!["Вася", "josé"]);
    }

    #[test]
    fn test_add_twice_keeps_single_entry() {
        let p = processor();
        let first = p.group_edit(Some("+ alice"), "1").unwrap();
        let second = p.group_edit(Some("+ @alice"), "1").unwrap();
        assert_eq!(first, second);
        assert_eq!(members(&p, "1"), vec!["alice"]);
    }

    #[test]
    fn test_remove_absent_reports_success() {
        let p = processor();
        p.group_edit(Some("+ bob"), "1").unwrap();

        let reply = p.group_edit(Some("- @alice"), "1").unwrap();
        assert_eq!(reply, "🗑️ User @alice has been removed from the mention group.");
        assert_eq!(members(&p, "1"), vec!["bob"]);
    }

    #[test]
    fn test_invalid_format_leaves_table_unchanged() {
        let p = processor();
        assert_eq!(p.group_edit(Some("alice"), "1").unwrap(), INVALID_FORMAT);
        assert_eq!(p.group_edit(None, "1").unwrap(), INVALID_FORMAT);
        assert!(p.with_groups(|g| g.table().is_empty()).unwrap());
        assert_eq!(p.with_groups(|g| g.store().save_count()).unwrap(), 0);
    }

    #[test]
    fn test_call_in_insertion_order() {
        let p = processor();
        p.group_edit(Some("+ alice"), "1").unwrap();
        p.group_edit(Some("+ bob"), "1").unwrap();

        assert_eq!(p.call("1").unwrap(), "📣 Calling all members!\n\n@alice @bob");
    }

    #[test]
    fn test_empty_group_replies() {
        let p = processor();
        assert_eq!(p.call("1").unwrap(), NOBODY_TO_CALL);
        assert_eq!(p.list("unknown").unwrap(), GROUP_EMPTY);

        // A chat whose last member left is empty again
        p.group_edit(Some("+ alice"), "1").unwrap();
        p.group_edit(Some("- alice"), "1").unwrap();
        assert_eq!(p.list("1").unwrap(), GROUP_EMPTY);
    }

    #[test]
    fn test_chats_are_isolated() {
        let p = processor();
        p.group_edit(Some("+ alice"), "1").unwrap();
        assert_eq!(p.call("2").unwrap(), NOBODY_TO_CALL);
    }

    #[test]
    fn test_help_lists_all_commands() {
        let help = processor().help();
        assert_eq!(
            help,
            "Available commands:\n\n\
             /help - Show this help message\n\
             /g - Add/remove a user. Usage: /g [+/-] @username\n\
             /call - Mention all users in the group\n\
             /list - Show all users in the mention group"
        );
    }

    #[test]
    fn test_save_failure_propagates() {
        let p = CommandProcessor::new(GroupService::open(FailingStore));
        let result = p.group_edit(Some("+ alice"), "1");
        assert!(matches!(result, Err(BotError::Storage(_))));
    }
}
