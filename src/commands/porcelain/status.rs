use crate::areas::repository::Repository;
use crate::artifacts::status::inspector::{Inspector, StatusMap};
use crate::errors::Result;

impl Repository {
    /// Classify every changed path in the working tree
    pub fn status(&self) -> Result<StatusMap> {
        let _lock = self.lock_shared()?;
        let head_tree = self.head_tree()?;

        let mut index = self.index();
        index.rehydrate()?;

        Inspector::new(self.database(), self.workspace(), index.entries()).status(&head_tree)
    }
}
