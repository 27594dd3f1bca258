//! Staging index
//!
//! The index records which paths were explicitly staged since the last
//! commit. It carries no content: the commit reads file bytes from the
//! working tree, and the index only decides which additions and deletions
//! are picked up.
//!
//! ## File Format
//!
//! Zero or more lines, each an absolute path inside the repository. In memory
//! the paths are held relative to the repository root.

use crate::artifacts::index::staged_paths::StagedPaths;
use crate::errors::{IoResultExt, MyGitError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug)]
pub struct Index {
    path: Box<Path>,
    root: Box<Path>,
    entries: StagedPaths,
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>, root: Box<Path>) -> Self {
        Index {
            path,
            root,
            entries: StagedPaths::default(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reload the staged paths from disk, discarding in-memory changes
    pub fn rehydrate(&mut self) -> Result<()> {
        if !self.path.is_file() {
            return Err(MyGitError::corrupt_state("index file is missing"));
        }

        let content = std::fs::read_to_string(&self.path)
            .with_io_context(|| format!("Unable to read index {}", self.path.display()))?;

        self.entries = content
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| {
                Path::new(line)
                    .strip_prefix(&self.root)
                    .map(Path::to_path_buf)
                    .map_err(|_| {
                        MyGitError::corrupt_state(format!(
                            "index entry {line} lies outside the repository"
                        ))
                    })
            })
            .collect::<Result<StagedPaths>>()?;
        self.changed = false;

        Ok(())
    }

    pub fn add(&mut self, path: PathBuf) {
        self.changed |= self.entries.insert(path);
    }

    /// Unstage `path` and anything staged beneath it
    pub fn remove(&mut self, path: &Path) {
        self.changed |= self.entries.remove_under(path);
    }

    pub fn clear(&mut self) {
        self.changed |= !self.entries.is_empty();
        self.entries.clear();
    }

    pub fn entries(&self) -> &StagedPaths {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Persist the staged paths if anything changed since the last load
    pub fn write_updates(&mut self) -> Result<()> {
        if !self.changed {
            return Ok(());
        }

        let content = self
            .entries
            .iter()
            .map(|path| format!("{}\n", self.root.join(path).display()))
            .collect::<String>();

        std::fs::write(&self.path, content)
            .with_io_context(|| format!("Unable to write index {}", self.path.display()))?;
        self.changed = false;

        debug!(entries = self.entries.iter().count(), "wrote index");
        Ok(())
    }
}
