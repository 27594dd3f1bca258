use crate::areas::repository::Repository;
use crate::artifacts::branch::head_status::HeadStatus;
use crate::artifacts::branch::revision::Revision;
use crate::errors::{MyGitError, Result};
use std::path::Path;
use tracing::{info, instrument};

impl Repository {
    /// Switch the working tree and HEAD to a branch or a commit
    ///
    /// Files tracked by the current HEAD are removed before the target tree
    /// is written out. Untracked files survive unless the target overwrites
    /// them.
    #[instrument(skip(self))]
    pub fn checkout(&self, revision: &str) -> Result<HeadStatus> {
        let _lock = self.lock_exclusive()?;

        {
            let mut index = self.index();
            index.rehydrate()?;
            if !index.is_empty() {
                return Err(MyGitError::missing_prerequisites(
                    "Unstaged changes detected: commit or reset staged paths before checkout",
                ));
            }
        }

        let head = Revision::resolve(revision, self.refs(), self.database())?.into_head();
        let target_oid = match &head {
            HeadStatus::Attached(branch) => self.refs().read_branch(branch)?.ok_or_else(|| {
                MyGitError::corrupt_state(format!("branch {branch} vanished during checkout"))
            })?,
            HeadStatus::Detached(oid) => oid.clone(),
        };
        let target_commit = self.database().load_commit(&target_oid)?;
        let target_tree = self.database().load_tree(target_commit.tree_oid())?;

        let current_tree = self.head_tree()?;
        self.workspace()
            .delete_tree(self.database(), &current_tree, Path::new(""))?;
        self.workspace()
            .load_tree(self.database(), &target_tree, Path::new(""))?;
        self.refs().set_head(&head)?;

        info!(%head, "checked out");
        Ok(head)
    }
}
