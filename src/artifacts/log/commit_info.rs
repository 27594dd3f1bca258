use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use chrono::{DateTime, Utc};
use colored::Colorize;

/// One entry of a history listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub revision: ObjectId,
    pub message: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

impl CommitInfo {
    pub fn from_commit(revision: ObjectId, commit: &Commit) -> Self {
        CommitInfo {
            revision,
            message: commit.message().to_string(),
            author: commit.author().to_string(),
            created_at: commit.created_at(),
        }
    }

    /// Format timestamp like "Mon Jan 1 12:34:56 2024 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.created_at
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }
}

impl std::fmt::Display for CommitInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", format!("commit {}", self.revision).yellow())?;
        writeln!(f, "Author: {}", self.author)?;
        writeln!(f, "Date:   {}", self.readable_timestamp())?;
        writeln!(f)?;
        for line in self.message.lines() {
            writeln!(f, "    {line}")?;
        }

        Ok(())
    }
}
