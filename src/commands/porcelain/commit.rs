use crate::areas::repository::Repository;
use crate::artifacts::commit::tree_rebuild::TreeRebuild;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{MyGitError, Result};
use chrono::Utc;
use tracing::{info, instrument};

impl Repository {
    /// Record a new commit on top of HEAD and return its ID
    ///
    /// Tracked files are committed with their current working-tree content.
    /// The index decides which untracked paths are added and which missing
    /// tracked paths are dropped; it is cleared afterwards.
    #[instrument(skip(self))]
    pub fn commit(&self, message: &str) -> Result<ObjectId> {
        if message.trim().is_empty() {
            return Err(MyGitError::invalid_argument("commit message is empty"));
        }

        let _lock = self.lock_exclusive()?;
        let mut index = self.index();
        index.rehydrate()?;
        if index.is_empty() {
            return Err(MyGitError::EmptyCommit);
        }

        let (head_id, head_commit) = self.head_commit()?;
        let head_tree = self.database().load_tree(head_commit.tree_oid())?;
        let now = Utc::now();

        let tree_oid = TreeRebuild::new(self.database(), self.workspace(), index.entries(), now)
            .rebuild_root(&head_tree)?;
        let commit = Commit::new(
            tree_oid,
            vec![head_id],
            Commit::author_from_env(),
            now,
            message.to_string(),
        );
        let commit_oid = self.database().store(&commit)?;
        self.refs().advance_head(&commit_oid)?;

        index.clear();
        index.write_updates()?;

        info!(oid = %commit_oid, message = commit.short_message(), "committed");
        Ok(commit_oid)
    }
}
