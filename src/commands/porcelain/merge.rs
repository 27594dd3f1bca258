use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::head_status::HeadStatus;
use crate::artifacts::merge::tree_merge::TreeMerge;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{MyGitError, Result};
use chrono::Utc;
use std::path::Path;
use tracing::{info, instrument};

impl Repository {
    /// Merge another branch into the current one and return the merge commit
    ///
    /// The trees are combined by [`TreeMerge`]; the merge commit has the
    /// current tip as first parent and the other tip as second. The working
    /// tree is rewritten to the merged tree.
    #[instrument(skip(self))]
    pub fn merge(&self, other: &str) -> Result<ObjectId> {
        let _lock = self.lock_exclusive()?;

        {
            let mut index = self.index();
            index.rehydrate()?;
            if !index.is_empty() {
                return Err(MyGitError::missing_prerequisites(
                    "Unstaged changes detected: commit or reset staged paths before merging",
                ));
            }
        }

        let current = match self.refs().read_head()? {
            HeadStatus::Attached(branch) => branch,
            HeadStatus::Detached(_) => {
                return Err(MyGitError::missing_prerequisites(
                    "cannot merge while HEAD is detached",
                ));
            }
        };

        let other = BranchName::try_parse(other.to_string())?;
        if other == current {
            return Err(MyGitError::invalid_argument(format!(
                "cannot merge branch {other} into itself"
            )));
        }
        let other_id = self
            .refs()
            .read_branch(&other)?
            .ok_or_else(|| MyGitError::invalid_argument(format!("branch {other} does not exist")))?;

        let (head_id, head_commit) = self.head_commit()?;
        let head_tree = self.database().load_tree(head_commit.tree_oid())?;
        let other_commit = self.database().load_commit(&other_id)?;
        let other_tree = self.database().load_tree(other_commit.tree_oid())?;

        let merged_tree = TreeMerge::new(self.database()).merge(&head_tree, &other_tree)?;
        let merged_tree_oid = self.database().store(&merged_tree)?;

        let commit = Commit::new(
            merged_tree_oid,
            vec![head_id, other_id],
            Commit::author_from_env(),
            Utc::now(),
            format!("Merge branch '{other}' into {current}"),
        );
        let commit_oid = self.database().store(&commit)?;
        self.refs().write_branch(&current, &commit_oid)?;

        self.workspace()
            .delete_tree(self.database(), &head_tree, Path::new(""))?;
        self.workspace()
            .load_tree(self.database(), &merged_tree, Path::new(""))?;

        info!(%current, %other, oid = %commit_oid, "merged");
        Ok(commit_oid)
    }
}
