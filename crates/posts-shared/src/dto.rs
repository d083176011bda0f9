//! Data Transfer Objects - request/response types for the posts API.

use serde::{Deserialize, Serialize};

/// Query string for batched reads: `?pids=1,2,3&fields=uid,content`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostsQuery {
    #[serde(default)]
    pub pids: String,
    #[serde(default)]
    pub fields: Option<String>,
}

impl PostsQuery {
    /// Comma-separated pids. Blank entries are skipped; anything else that is
    /// not an integer is an error naming the offending entry.
    pub fn parse_pids(&self) -> Result<Vec<i64>, String> {
        self.pids
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse().map_err(|_| format!("invalid pid: {}", s)))
            .collect()
    }

    /// Requested projection; empty when no `fields` were given.
    pub fn field_list(&self) -> Vec<String> {
        self.fields
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

/// A single field read back from a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldResponse {
    pub pid: i64,
    pub field: String,
    pub value: serde_json::Value,
}
