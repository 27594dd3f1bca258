//! Working tree access
//!
//! All paths handed to the workspace are relative to the repository root,
//! with the empty path standing for the root itself. The marker directory is
//! never listed, read or written.

use crate::areas::database::Database;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{IoResultExt, MyGitError, Result};
use bytes::Bytes;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::trace;

/// Name of the directory holding repository metadata
pub const MARKER_DIR: &str = ".mygit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_ignored(path: &Path) -> bool {
        path.components()
            .any(|component| component.as_os_str() == MARKER_DIR)
    }

    pub fn kind(&self, path: &Path) -> Option<EntryKind> {
        let metadata = std::fs::metadata(self.path.join(path)).ok()?;
        if metadata.is_dir() {
            Some(EntryKind::Directory)
        } else {
            Some(EntryKind::File)
        }
    }

    pub fn exists(&self, path: &Path) -> bool {
        self.kind(path).is_some()
    }

    /// Children of a directory keyed by name; empty when the directory is gone
    pub fn list_dir(&self, dir: &Path) -> Result<BTreeMap<String, EntryKind>> {
        let dir_path = self.path.join(dir);
        if !dir_path.is_dir() {
            return Ok(BTreeMap::new());
        }

        let mut children = BTreeMap::new();
        let entries = std::fs::read_dir(&dir_path)
            .with_io_context(|| format!("Unable to list {}", dir_path.display()))?;
        for entry in entries {
            let entry = entry.with_io_context(|| format!("Unable to list {}", dir_path.display()))?;
            let name = entry.file_name().into_string().map_err(|name| {
                MyGitError::invalid_argument(format!(
                    "file name {name:?} in {} is not valid UTF-8",
                    dir_path.display()
                ))
            })?;
            if name == MARKER_DIR {
                continue;
            }

            let kind = if entry.path().is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            children.insert(name, kind);
        }

        Ok(children)
    }

    pub fn read_file(&self, path: &Path) -> Result<Bytes> {
        let file_path = self.path.join(path);
        std::fs::read(&file_path)
            .map(Bytes::from)
            .with_io_context(|| format!("Unable to read {}", file_path.display()))
    }

    /// Write a file, replacing a directory that occupies its path
    pub fn write_file(&self, path: &Path, content: &[u8]) -> Result<()> {
        if self.kind(path) == Some(EntryKind::Directory) {
            self.remove(path)?;
        }
        if let Some(parent) = path.parent() {
            self.make_directory(parent)?;
        }

        let file_path = self.path.join(path);
        std::fs::write(&file_path, content)
            .with_io_context(|| format!("Unable to write {}", file_path.display()))?;

        trace!(path = %path.display(), "wrote file");
        Ok(())
    }

    /// Create a directory, replacing a file that occupies its path
    pub fn make_directory(&self, path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Ok(());
        }
        if self.kind(path) == Some(EntryKind::File) {
            self.remove(path)?;
        }

        let dir_path = self.path.join(path);
        std::fs::create_dir_all(&dir_path)
            .with_io_context(|| format!("Unable to create directory {}", dir_path.display()))
    }

    /// Remove a file or a whole directory
    pub fn remove(&self, path: &Path) -> Result<()> {
        let full_path = self.path.join(path);
        match self.kind(path) {
            Some(EntryKind::Directory) => std::fs::remove_dir_all(&full_path)
                .with_io_context(|| format!("Unable to remove {}", full_path.display()))?,
            Some(EntryKind::File) => std::fs::remove_file(&full_path)
                .with_io_context(|| format!("Unable to remove {}", full_path.display()))?,
            None => return Ok(()),
        }

        trace!(path = %path.display(), "removed");
        Ok(())
    }

    /// Materialize a tree into `dir`
    ///
    /// Existing files are overwritten and paths whose kind disagrees with the
    /// tree are replaced. Untracked paths are left alone.
    pub fn load_tree(&self, database: &Database, tree: &Tree, dir: &Path) -> Result<()> {
        self.make_directory(dir)?;

        for edge in tree.edges() {
            let path = dir.join(&edge.name);
            if edge.is_tree() {
                let subtree = database.load_tree(&edge.oid)?;
                self.load_tree(database, &subtree, &path)?;
            } else {
                let blob = database.load_blob(&edge.oid)?;
                self.write_file(&path, blob.content())?;
            }
        }

        Ok(())
    }

    /// Remove exactly the paths a tree describes under `dir`
    ///
    /// Directories are descended only when they are still directories on
    /// disk, and are removed afterwards if nothing else is left in them.
    pub fn delete_tree(&self, database: &Database, tree: &Tree, dir: &Path) -> Result<()> {
        for edge in tree.edges() {
            let path = dir.join(&edge.name);
            match (self.kind(&path), edge.is_tree()) {
                (Some(EntryKind::Directory), true) => {
                    let subtree = database.load_tree(&edge.oid)?;
                    self.delete_tree(database, &subtree, &path)?;
                    self.remove_if_empty(&path)?;
                }
                (Some(EntryKind::File), false) => self.remove(&path)?,
                // the path changed kind or is already gone
                _ => {}
            }
        }

        Ok(())
    }

    fn remove_if_empty(&self, path: &Path) -> Result<()> {
        let dir_path = self.path.join(path);
        let is_empty = std::fs::read_dir(&dir_path)
            .with_io_context(|| format!("Unable to list {}", dir_path.display()))?
            .next()
            .is_none();

        if is_empty {
            std::fs::remove_dir(&dir_path)
                .with_io_context(|| format!("Unable to remove {}", dir_path.display()))?;
        }

        Ok(())
    }
}
