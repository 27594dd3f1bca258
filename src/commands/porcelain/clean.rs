use crate::areas::repository::Repository;
use crate::artifacts::status::inspector::Inspector;
use crate::errors::Result;
use std::path::PathBuf;
use tracing::{debug, instrument};

impl Repository {
    /// Delete untracked, unstaged paths and return them
    #[instrument(skip(self))]
    pub fn clean(&self) -> Result<Vec<PathBuf>> {
        let _lock = self.lock_exclusive()?;
        let head_tree = self.head_tree()?;

        let mut index = self.index();
        index.rehydrate()?;

        let strays = Inspector::new(self.database(), self.workspace(), index.entries())
            .stray_paths(&head_tree)?;
        for path in &strays {
            debug!(path = %path.display(), "cleaning");
            self.workspace().remove(path)?;
        }

        Ok(strays)
    }
}
