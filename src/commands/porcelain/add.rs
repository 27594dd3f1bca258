use crate::areas::repository::Repository;
use crate::errors::{MyGitError, Result};
use std::path::Path;
use tracing::{debug, instrument};

impl Repository {
    /// Stage paths for the next commit
    ///
    /// Each path must exist in the working tree or be tracked by HEAD, so a
    /// deleted tracked file can be staged to record its removal. Nothing is
    /// staged unless every path is valid.
    #[instrument(skip(self, paths))]
    pub fn add<P: AsRef<Path>>(&self, paths: &[P]) -> Result<()> {
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

        let mut index = self.index();
        index.rehydrate()?;
        for path in paths {
            debug!(path = %path.display(), "staging");
            index.add(path);
        }

        index.write_updates()
    }
}
