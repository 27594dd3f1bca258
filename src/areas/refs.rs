//! HEAD and branch references
//!
//! ## File Format
//!
//! - `HEAD`: two lines, `branch` followed by a branch name, or `commit`
//!   followed by a 40-character hash (detached HEAD)
//! - `branches/<name>`: a single line holding the branch tip hash
//!
//! Reference files are rewritten in place.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::head_status::HeadStatus;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{IoResultExt, MyGitError, Result};
use derive_new::new;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the HEAD reference file
pub const HEAD_REF_NAME: &str = "HEAD";

/// Directory holding one file per branch
pub const BRANCHES_DIR: &str = "branches";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository marker directory (`.mygit`)
    path: Box<Path>,
}

impl Refs {
    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    pub fn branches_path(&self) -> PathBuf {
        self.path.join(BRANCHES_DIR)
    }

    pub fn read_head(&self) -> Result<HeadStatus> {
        let head_path = self.head_path();
        if !head_path.is_file() {
            return Err(MyGitError::corrupt_state("HEAD is missing"));
        }

        let content = std::fs::read_to_string(&head_path)
            .with_io_context(|| format!("Unable to read {}", head_path.display()))?;

        HeadStatus::parse(&content)
    }

    pub fn set_head(&self, head: &HeadStatus) -> Result<()> {
        let head_path = self.head_path();
        std::fs::write(&head_path, head.render())
            .with_io_context(|| format!("Unable to write {}", head_path.display()))?;

        debug!(%head, "moved HEAD");
        Ok(())
    }

    /// Commit HEAD currently resolves to
    pub fn head_commit_id(&self) -> Result<ObjectId> {
        match self.read_head()? {
            HeadStatus::Attached(branch) => self.read_branch(&branch)?.ok_or_else(|| {
                MyGitError::corrupt_state(format!("HEAD points at missing branch {branch}"))
            }),
            HeadStatus::Detached(oid) => Ok(oid),
        }
    }

    /// Move HEAD forward to a new commit, following the attached branch if any
    pub fn advance_head(&self, oid: &ObjectId) -> Result<()> {
        match self.read_head()? {
            HeadStatus::Attached(branch) => self.write_branch(&branch, oid),
            HeadStatus::Detached(_) => self.set_head(&HeadStatus::Detached(oid.clone())),
        }
    }

    pub fn read_branch(&self, name: &BranchName) -> Result<Option<ObjectId>> {
        let branch_path = self.branch_path(name);
        if !branch_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&branch_path)
            .with_io_context(|| format!("Unable to read branch file {}", branch_path.display()))?;
        let lines = content.lines().collect::<Vec<_>>();
        let [oid] = lines.as_slice() else {
            return Err(MyGitError::corrupt_state(format!(
                "branch {name} must hold exactly one line"
            )));
        };

        ObjectId::try_parse(oid.trim().to_string())
            .map(Some)
            .map_err(|e| MyGitError::corrupt_state(format!("branch {name}: {e}")))
    }

    pub fn write_branch(&self, name: &BranchName, oid: &ObjectId) -> Result<()> {
        let branch_path = self.branch_path(name);
        std::fs::write(&branch_path, format!("{oid}\n")).with_io_context(|| {
            format!("Unable to write branch file {}", branch_path.display())
        })?;

        debug!(branch = %name, %oid, "updated branch");
        Ok(())
    }

    pub fn delete_branch(&self, name: &BranchName) -> Result<ObjectId> {
        let oid = self
            .read_branch(name)?
            .ok_or_else(|| MyGitError::invalid_argument(format!("branch {name} does not exist")))?;

        let branch_path = self.branch_path(name);
        std::fs::remove_file(&branch_path).with_io_context(|| {
            format!("Unable to delete branch file {}", branch_path.display())
        })?;

        debug!(branch = %name, %oid, "deleted branch");
        Ok(oid)
    }

    /// Branch names in lexicographic order
    pub fn list_branches(&self) -> Result<Vec<BranchName>> {
        let branches_path = self.branches_path();
        if !branches_path.is_dir() {
            return Err(MyGitError::corrupt_state("branches directory is missing"));
        }

        let entries = std::fs::read_dir(&branches_path)
            .with_io_context(|| format!("Unable to list {}", branches_path.display()))?;

        let mut branches = Vec::new();
        for entry in entries {
            let entry =
                entry.with_io_context(|| format!("Unable to list {}", branches_path.display()))?;
            if !entry.path().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            let branch = BranchName::try_parse(name)
                .map_err(|e| MyGitError::corrupt_state(format!("stray branch file: {e}")))?;
            branches.push(branch);
        }

        branches.sort();
        Ok(branches)
    }

    fn branch_path(&self, name: &BranchName) -> PathBuf {
        self.branches_path().join(name.as_ref())
    }
}
