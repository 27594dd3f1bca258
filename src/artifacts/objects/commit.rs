//! Commit object
//!
//! Commits are snapshots of the repository. They contain:
//! - The root tree object ID
//! - Parent commit ID(s); none for the root commit, two for a merge
//! - The author name and creation timestamp
//! - The commit message
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name>
//! date <nanos-since-epoch>
//!
//! <commit message>
//! ```
//!
//! ## Ordering
//!
//! Commits are totally ordered by date, then author, then message, then root
//! tree, then parents (count first, then element-wise). History listings
//! sort on this order.

use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{MyGitError, Result};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use derive_new::new;
use std::cmp::Ordering;
use std::io::BufRead;

/// Environment variable holding the commit author name
pub const AUTHOR_NAME_VAR: &str = "MYGIT_AUTHOR_NAME";

/// Fallback variables consulted when no author is configured
const USER_NAME_VARS: [&str; 2] = ["USER", "USERNAME"];

const UNKNOWN_AUTHOR: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Commit {
    tree_oid: ObjectId,
    parents: Vec<ObjectId>,
    author: String,
    created_at: DateTime<Utc>,
    message: String,
}

impl Commit {
    /// Resolve the author name from the environment
    ///
    /// Reads `MYGIT_AUTHOR_NAME`, then the operating system user name, and
    /// falls back to `"unknown"`. Only the first line of the value is used.
    pub fn author_from_env() -> String {
        std::iter::once(AUTHOR_NAME_VAR)
            .chain(USER_NAME_VARS)
            .filter_map(|var| std::env::var(var).ok())
            .map(|name| name.lines().next().unwrap_or_default().trim().to_string())
            .find(|name| !name.is_empty())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn short_message(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

impl PartialOrd for Commit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Commit {
    fn cmp(&self, other: &Self) -> Ordering {
        self.created_at
            .cmp(&other.created_at)
            .then_with(|| self.author.cmp(&other.author))
            .then_with(|| self.message.cmp(&other.message))
            .then_with(|| self.tree_oid.cmp(&other.tree_oid))
            .then_with(|| self.parents.len().cmp(&other.parents.len()))
            .then_with(|| self.parents.cmp(&other.parents))
    }
}

impl Packable for Commit {
    fn serialize(&self) -> Result<Bytes> {
        let nanos = self.created_at.timestamp_nanos_opt().ok_or_else(|| {
            MyGitError::invalid_argument(format!(
                "commit timestamp cannot be stored: {}",
                self.created_at
            ))
        })?;

        let mut lines = vec![format!("tree {}", self.tree_oid)];
        lines.extend(self.parents.iter().map(|parent| format!("parent {parent}")));
        lines.push(format!("author {}", self.author));
        lines.push(format!("date {nanos}"));
        lines.push(String::new());
        lines.push(self.message.clone());

        Ok(frame(self.object_type(), lines.join("\n").as_bytes()))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|e| MyGitError::corrupt_state(format!("unreadable commit: {e}")))?;

        let (headers, message) = content
            .split_once("\n\n")
            .ok_or_else(|| MyGitError::corrupt_state("commit has no message separator"))?;

        let mut tree_oid = None;
        let mut parents = Vec::new();
        let mut author = None;
        let mut created_at = None;

        for line in headers.lines() {
            let (key, value) = line
                .split_once(' ')
                .ok_or_else(|| MyGitError::corrupt_state(format!("bad commit header {line:?}")))?;

            match key {
                "tree" => tree_oid = Some(parse_oid(value)?),
                "parent" => parents.push(parse_oid(value)?),
                "author" => author = Some(value.to_string()),
                "date" => {
                    let nanos = value.parse::<i64>().map_err(|_| {
                        MyGitError::corrupt_state(format!("bad commit date {value:?}"))
                    })?;
                    created_at = Some(DateTime::from_timestamp_nanos(nanos));
                }
                _ => {
                    return Err(MyGitError::corrupt_state(format!(
                        "unknown commit header {key:?}"
                    )));
                }
            }
        }

        Ok(Commit::new(
            tree_oid.ok_or_else(|| MyGitError::corrupt_state("commit has no tree"))?,
            parents,
            author.ok_or_else(|| MyGitError::corrupt_state("commit has no author"))?,
            created_at.ok_or_else(|| MyGitError::corrupt_state("commit has no date"))?,
            message.to_string(),
        ))
    }
}

fn parse_oid(value: &str) -> Result<ObjectId> {
    ObjectId::try_parse(value.to_string())
        .map_err(|_| MyGitError::corrupt_state(format!("bad object ID in commit: {value:?}")))
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}
