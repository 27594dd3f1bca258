use crate::areas::repository::Repository;
use crate::errors::{MyGitError, Result};
use std::path::Path;
use tracing::{debug, instrument};

impl Repository {
    /// Remove paths from the working tree
    ///
    /// Removed tracked paths are staged so the next commit records their
    /// deletion. Every missing path is reported at once and nothing is
    /// removed in that case.
    #[instrument(skip(self, paths))]
    pub fn rm<P: AsRef<Path>>(&self, paths: &[P]) -> Result<()> {
        let _lock = self.lock_exclusive()?;
        let head_tree = self.head_tree()?;

        let paths = self.resolve_paths(paths)?;
        if paths.iter().any(|path| path.as_os_str().is_empty()) {
            return Err(MyGitError::invalid_argument(
                "refusing to remove the repository root",
            ));
        }

        let missing = paths
            .iter()
            .filter(|path| !self.workspace().exists(path))
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(MyGitError::invalid_argument(format!(
                "Following paths did not match any files: {}",
                missing.join(", ")
            )));
        }

        let mut index = self.index();
        index.rehydrate()?;
        for path in paths {
            self.workspace().remove(&path)?;
            index.remove(&path);
            if self.is_tracked(&head_tree, &path)? {
                debug!(path = %path.display(), "staging deletion");
                index.add(path);
            }
        }

        index.write_updates()
    }
}
