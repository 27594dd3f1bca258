use crate::areas::repository::Repository;
use crate::artifacts::log::commit_info::CommitInfo;
use crate::artifacts::log::rev_list::RevList;
use crate::errors::Result;

impl Repository {
    /// Every commit reachable from HEAD, newest first
    pub fn log(&self) -> Result<Vec<CommitInfo>> {
        let _lock = self.lock_shared()?;
        let head_id = self.refs().head_commit_id()?;

        Ok(RevList::new(self.database())
            .walk(&head_id)?
            .into_iter()
            .map(|(oid, commit)| CommitInfo::from_commit(oid, &commit))
            .collect())
    }
}
