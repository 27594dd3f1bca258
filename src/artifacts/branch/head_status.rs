use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{MyGitError, Result};

const ATTACHED_MARKER: &str = "branch";
const DETACHED_MARKER: &str = "commit";

/// Where HEAD points: at a branch, or directly at a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadStatus {
    Attached(BranchName),
    Detached(ObjectId),
}

impl HeadStatus {
    /// Parse the two-line HEAD file
    pub fn parse(content: &str) -> Result<Self> {
        let lines = content.lines().collect::<Vec<_>>();
        let [marker, target] = lines.as_slice() else {
            return Err(MyGitError::corrupt_state(format!(
                "HEAD must contain exactly two lines, found {}",
                lines.len()
            )));
        };

        let corrupt = |e: MyGitError| MyGitError::corrupt_state(format!("bad HEAD target: {e}"));
        match *marker {
            ATTACHED_MARKER => Ok(HeadStatus::Attached(
                BranchName::try_parse(target.to_string()).map_err(corrupt)?,
            )),
            DETACHED_MARKER => Ok(HeadStatus::Detached(
                ObjectId::try_parse(target.to_string()).map_err(corrupt)?,
            )),
            other => Err(MyGitError::corrupt_state(format!(
                "unknown HEAD kind {other:?}"
            ))),
        }
    }

    /// Render as the two-line HEAD file
    pub fn render(&self) -> String {
        match self {
            HeadStatus::Attached(branch) => format!("{ATTACHED_MARKER}\n{branch}\n"),
            HeadStatus::Detached(oid) => format!("{DETACHED_MARKER}\n{oid}\n"),
        }
    }

    pub fn branch(&self) -> Option<&BranchName> {
        match self {
            HeadStatus::Attached(branch) => Some(branch),
            HeadStatus::Detached(_) => None,
        }
    }
}

impl std::fmt::Display for HeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeadStatus::Attached(branch) => write!(f, "on branch {branch}"),
            HeadStatus::Detached(oid) => write!(f, "detached at {}", oid.to_short_oid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn attached_head_renders_two_lines() {
        let head = HeadStatus::Attached(BranchName::default_branch());

        assert_eq!(head.render(), "branch\nmaster\n");
        assert_eq!(HeadStatus::parse(&head.render()).unwrap(), head);
    }

    #[test]
    fn detached_head_keeps_the_hash() {
        let oid = ObjectId::hash_content(b"commit");
        let head = HeadStatus::Detached(oid.clone());

        assert_eq!(HeadStatus::parse(&head.render()).unwrap(), head);
        assert_eq!(head.branch(), None);
    }

    #[test]
    fn wrong_line_count_is_corrupt_state() {
        for content in ["", "branch\n", "branch\nmaster\nextra\n"] {
            assert!(matches!(
                HeadStatus::parse(content),
                Err(MyGitError::CorruptState(_))
            ));
        }
    }

    #[test]
    fn unknown_kind_is_corrupt_state() {
        assert!(matches!(
            HeadStatus::parse("tag\nv1\n"),
            Err(MyGitError::CorruptState(_))
        ));
    }
}
