//! Mention groups and the per-chat table that holds them

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A user handle, stored without the leading `@`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(String);

impl Handle {
    /// Build a handle from raw user input, stripping one leading `@`
    pub fn new(raw: impl AsRef<str>) -> Self {
        let raw = raw.as_ref();
        Self(raw.strip_prefix('@').unwrap_or(raw).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Ordered, duplicate-free set of handles belonging to one chat
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct MentionGroup {
    members: Vec<Handle>,
}

impl MentionGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `handle` unless it is already present. Returns true if added.
    pub fn insert(&mut self, handle: Handle) -> bool {
        if self.contains(&handle) {
            return false;
        }
        self.members.push(handle);
        true
    }

    /// Remove `handle` if present. Returns true if something was removed.
    pub fn remove(&mut self, handle: &Handle) -> bool {
        let before = self.members.len();
        self.members.retain(|h| h != handle);
        self.members.len() != before
    }

    pub fn contains(&self, handle: &Handle) -> bool {
        self.members.contains(handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Handle> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

// Loaded documents may carry `@` prefixes or repeats; first occurrence wins.
impl From<Vec<String>> for MentionGroup {
    fn from(raw: Vec<String>) -> Self {
        let mut group = MentionGroup::new();
        for name in raw {
            group.insert(Handle::new(name));
        }
        group
    }
}

impl From<MentionGroup> for Vec<String> {
    fn from(group: MentionGroup) -> Self {
        group.members.into_iter().map(|h| h.0).collect()
    }
}

/// Mapping from chat identifier to its mention group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupTable {
    chats: BTreeMap<String, MentionGroup>,
}

impl GroupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group for `chat_id`; an unknown chat has no group
    pub fn group(&self, chat_id: &str) -> Option<&MentionGroup> {
        self.chats.get(chat_id)
    }

    fn group_mut(&mut self, chat_id: &str) -> &mut MentionGroup {
        self.chats.entry(chat_id.to_string()).or_default()
    }

    /// Add `handle` to the chat's group, creating the group if needed
    pub fn add_member(&mut self, chat_id: &str, handle: Handle) -> bool {
        self.group_mut(chat_id).insert(handle)
    }

    /// Remove `handle` from the chat's group. The chat entry is created
    /// even when there was nothing to remove.
    pub fn remove_member(&mut self, chat_id: &str, handle: &Handle) -> bool {
        self.group_mut(chat_id).remove(handle)
    }

    pub fn chats(&self) -> impl Iterator<Item = (&str, &MentionGroup)> {
        self.chats.iter().map(|(id, group)| (id.as_str(), group))
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_strips_single_at() {
        assert_eq!(Handle::new("@alice").as_str(), "alice");
        assert_eq!(Handle::new("alice").as_str(), "alice");
        assert_eq!(Handle::new("@alice").to_string(), "@alice");
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut table = GroupTable::new();
        assert!(table.add_member("1", Handle::new("alice")));
        assert!(!table.add_member("1", Handle::new("@alice")));

        let group = table.group("1").unwrap();
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn test_add_then_remove_restores_group() {
        let mut table = GroupTable::new();
        table.add_member("1", Handle::new("bob"));
        let before = table.group("1").cloned();

        table.add_member("1", Handle::new("alice"));
        assert!(table.remove_member("1", &Handle::new("alice")));

        assert_eq!(table.group("1").cloned(), before);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut table = GroupTable::new();
        table.add_member("1", Handle::new("bob"));

        assert!(!table.remove_member("1", &Handle::new("carol")));
        let names: Vec<_> = table.group("1").unwrap().iter().map(Handle::as_str).collect();
        assert_eq!(names, vec!["bob"]);
    }

    #[test]
    fn test_remove_creates_chat_entry() {
        let mut table = GroupTable::new();
        table.remove_member("42", &Handle::new("nobody"));
        assert!(table.group("42").is_some_and(MentionGroup::is_empty));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut table = GroupTable::new();
        for name in ["carol", "alice", "bob"] {
            table.add_member("1", Handle::new(name));
        }
        let names: Vec<_> = table.group("1").unwrap().iter().map(Handle::as_str).collect();
        assert_eq!(names, vec!["carol", "alice", "bob"]);
    }

    #[test]
    fn test_deserialize_dedupes_and_normalizes() {
        let table: GroupTable =
            serde_json::from_str(r#"{"1": ["alice", "@alice", "bob"]}"#).unwrap();
        let names: Vec<_> = table.group("1").unwrap().iter().map(Handle::as_str).collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }

    #[test]
    fn test_serialize_shape() {
        let mut table = GroupTable::new();
        table.add_member("1", Handle::new("alice"));
        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(value, serde_json::json!({"1": ["alice"]}));
    }

    #[test]
    fn test_non_mapping_rejected() {
        assert!(serde_json::from_str::<GroupTable>("[1, 2]").is_err());
        assert!(serde_json::from_str::<GroupTable>(r#"{"1": "alice"}"#).is_err());
    }
}
