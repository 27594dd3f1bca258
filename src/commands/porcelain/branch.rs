use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::head_status::HeadStatus;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{MyGitError, Result};
use tracing::info;

impl Repository {
    /// Create a branch at the commit HEAD resolves to; HEAD does not move
    pub fn create_branch(&self, name: &str) -> Result<ObjectId> {
        let branch = BranchName::try_parse(name.to_string())?;
        let _lock = self.lock_exclusive()?;

        if self.refs().read_branch(&branch)?.is_some() {
            return Err(MyGitError::invalid_argument(format!(
                "branch {branch} already exists"
            )));
        }

        let head_id = self.refs().head_commit_id()?;
        self.refs().write_branch(&branch, &head_id)?;

        info!(%branch, oid = %head_id, "created branch");
        Ok(head_id)
    }

    /// Delete a branch other than the current one; returns its former tip
    pub fn delete_branch(&self, name: &str) -> Result<ObjectId> {
        let branch = BranchName::try_parse(name.to_string())?;
        let _lock = self.lock_exclusive()?;

        if self.refs().read_head()?.branch() == Some(&branch) {
            return Err(MyGitError::invalid_argument(format!(
                "cannot delete branch {branch}: it is checked out"
            )));
        }

        let oid = self.refs().delete_branch(&branch)?;
        info!(%branch, %oid, "deleted branch");
        Ok(oid)
    }

    pub fn list_branches(&self) -> Result<Vec<BranchName>> {
        let _lock = self.lock_shared()?;
        self.refs().list_branches()
    }

    pub fn head_status(&self) -> Result<HeadStatus> {
        let _lock = self.lock_shared()?;
        self.refs().read_head()
    }

    /// Commit HEAD currently resolves to
    pub fn head_commit_id(&self) -> Result<ObjectId> {
        let _lock = self.lock_shared()?;
        self.refs().head_commit_id()
    }
}
