use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::value::FieldValue;

/// Stored fields that are integers (or 0/1 flags) on every post.
pub const INT_FIELDS: [&str; 11] = [
    "uid",
    "pid",
    "tid",
    "deleted",
    "timestamp",
    "upvotes",
    "downvotes",
    "deleterUid",
    "edited",
    "replies",
    "bookmarks",
];

/// Fields computed on read. They are never written to the store.
pub const DERIVED_FIELDS: [&str; 3] = ["votes", "timestampISO", "editedISO"];

/// Storage key for a post.
pub fn post_key(pid: i64) -> String {
    format!("post:{}", pid)
}

/// Post entity - a forum post as returned to callers.
///
/// Known integer fields get their own slot; everything else (content, handles,
/// plugin-contributed fields) lives in `extra`. A `None` slot means the field
/// was not part of the fetched record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tid: Option<i64>,
    /// 0/1 flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleter_uid: Option<i64>,
    /// Creation time, epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// Last edit time, epoch milliseconds. 0 means never edited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upvotes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downvotes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replies: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmarks: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votes: Option<i64>,
    #[serde(
        default,
        rename = "timestampISO",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp_iso: Option<String>,
    #[serde(default, rename = "editedISO", skip_serializing_if = "Option::is_none")]
    pub edited_iso: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, FieldValue>,
}

impl Post {
    /// Mutable access to the typed slot of a known integer field.
    pub fn int_slot_mut(&mut self, name: &str) -> Option<&mut Option<i64>> {
        let slot = match name {
            "pid" => &mut self.pid,
            "uid" => &mut self.uid,
            "tid" => &mut self.tid,
            "deleted" => &mut self.deleted,
            "deleterUid" => &mut self.deleter_uid,
            "timestamp" => &mut self.timestamp,
            "edited" => &mut self.edited,
            "upvotes" => &mut self.upvotes,
            "downvotes" => &mut self.downvotes,
            "replies" => &mut self.replies,
            "bookmarks" => &mut self.bookmarks,
            _ => return None,
        };
        Some(slot)
    }

    fn int_slot(&self, name: &str) -> Option<Option<i64>> {
        let slot = match name {
            "pid" => self.pid,
            "uid" => self.uid,
            "tid" => self.tid,
            "deleted" => self.deleted,
            "deleterUid" => self.deleter_uid,
            "timestamp" => self.timestamp,
            "edited" => self.edited,
            "upvotes" => self.upvotes,
            "downvotes" => self.downvotes,
            "replies" => self.replies,
            "bookmarks" => self.bookmarks,
            _ => return None,
        };
        Some(slot)
    }

    /// Numeric value of an integer field, whether it was coerced into its
    /// slot or left raw in `extra`.
    pub fn int_value(&self, name: &str) -> Option<i64> {
        self.int_slot(name)
            .flatten()
            .or_else(|| self.extra.get(name).map(FieldValue::to_int_lenient))
    }

    /// Value of any named field, including derived ones.
    pub fn get(&self, name: &str) -> Option<FieldValue> {
        match name {
            "votes" => self.votes.map(FieldValue::Int),
            "timestampISO" => self.timestamp_iso.clone().map(FieldValue::Text),
            "editedISO" => self.edited_iso.clone().map(FieldValue::Text),
            _ => match self.int_slot(name) {
                Some(Some(n)) => Some(FieldValue::Int(n)),
                _ => self.extra.get(name).cloned(),
            },
        }
    }
}
