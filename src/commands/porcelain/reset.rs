use crate::areas::repository::Repository;
use crate::errors::{MyGitError, Result};
use std::path::Path;
use tracing::{debug, instrument};

impl Repository {
    /// Unstage paths and restore their committed content
    ///
    /// Tracked paths are rewritten from HEAD, directories recursively.
    /// Untracked paths are only unstaged and stay on disk.
    #[instrument(skip(self, paths))]
    pub fn reset<P: AsRef<Path>>(&self, paths: &[P]) -> Result<()> {
        let _lock = self.lock_exclusive()?;
        let head_tree = self.head_tree()?;

        let paths = self.resolve_paths(paths)?;
        for path in &paths {
            if !self.workspace().exists(path) && !self.is_tracked(&head_tree, path)? {
                return Err(MyGitError::invalid_argument(format!(
                    "pathspec '{}' did not match any files",
                    path.display()
                )));
            }
        }

        {
            let mut index = self.index();
            index.rehydrate()?;
            for path in &paths {
                index.remove(path);
            }
            index.write_updates()?;
        }

        for path in &paths {
            if path.as_os_str().is_empty() {
                self.workspace()
                    .load_tree(self.database(), &head_tree, path)?;
                continue;
            }

            let Some(edge) = self.find_edge(&head_tree, path)? else {
                continue;
            };
            debug!(path = %path.display(), "restoring from HEAD");

            if edge.is_tree() {
                let subtree = self.database().load_tree(&edge.oid)?;
                self.workspace()
                    .load_tree(self.database(), &subtree, path)?;
            } else {
                let blob = self.database().load_blob(&edge.oid)?;
                self.workspace().write_file(path, blob.content())?;
            }
        }

        Ok(())
    }
}
