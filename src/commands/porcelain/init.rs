use crate::areas::repository::{INDEX_FILE_NAME, OBJECTS_DIR, Repository};
use crate::areas::refs::BRANCHES_DIR;
use crate::areas::workspace::MARKER_DIR;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::head_status::HeadStatus;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{IoResultExt, MyGitError, Result};
use chrono::Utc;
use std::fs;
use std::path::Path;
use tracing::info;

/// Message of the root commit every repository starts with
pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

impl Repository {
    /// Create a repository rooted at `path`
    ///
    /// The directory is created if needed. The new repository has HEAD
    /// attached to `master`, which points at a root commit of the empty tree.
    pub fn init(path: impl AsRef<Path>) -> Result<Repository> {
        let path = path.as_ref();
        if path.join(MARKER_DIR).exists() {
            return Err(MyGitError::AlreadyInitialized(path.to_path_buf()));
        }

        fs::create_dir_all(path)
            .with_io_context(|| format!("Unable to create directory {}", path.display()))?;
        let root = path
            .canonicalize()
            .with_io_context(|| format!("Unable to resolve {}", path.display()))?;

        let marker_dir = root.join(MARKER_DIR);
        for dir in [OBJECTS_DIR, BRANCHES_DIR] {
            let dir_path = marker_dir.join(dir);
            fs::create_dir_all(&dir_path).with_io_context(|| {
                format!("Unable to create directory {}", dir_path.display())
            })?;
        }
        let index_path = marker_dir.join(INDEX_FILE_NAME);
        fs::write(&index_path, b"")
            .with_io_context(|| format!("Unable to create index {}", index_path.display()))?;

        let repository = Repository::at(root.clone(), root);
        let _lock = repository.lock_exclusive()?;

        let master = BranchName::default_branch();
        let tree_oid = repository.database().store(&Tree::default())?;
        let commit = Commit::new(
            tree_oid,
            Vec::new(),
            Commit::author_from_env(),
            Utc::now(),
            INITIAL_COMMIT_MESSAGE.to_string(),
        );
        let commit_oid = repository.database().store(&commit)?;

        repository.refs().write_branch(&master, &commit_oid)?;
        repository.refs().set_head(&HeadStatus::Attached(master))?;

        info!(path = %repository.path().display(), "initialized repository");
        Ok(repository)
    }
}
