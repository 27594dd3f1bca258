use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::lock::RepositoryLock;
use crate::areas::refs::Refs;
use crate::areas::workspace::{MARKER_DIR, Workspace};
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{Tree, TreeEdge};
use crate::errors::{MyGitError, Result};
use std::cell::{RefCell, RefMut};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

pub const OBJECTS_DIR: &str = "objects";
pub const INDEX_FILE_NAME: &str = "index";

/// Repository context passed to every command
///
/// Holds no state between commands: HEAD, branches and the index are read
/// from disk by each operation.
pub struct Repository {
    path: Box<Path>,
    working_dir: Box<Path>,
    index: RefCell<Index>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    /// Open the repository containing `start`
    ///
    /// Walks up from `start` until a directory holding `.mygit` is found.
    /// Relative path arguments given to later commands are resolved against
    /// `start`.
    pub fn open(start: impl AsRef<Path>) -> Result<Self> {
        let start = start.as_ref();
        let working_dir = start.canonicalize().map_err(|_| {
            MyGitError::invalid_argument(format!("{} does not exist", start.display()))
        })?;

        let root = working_dir
            .ancestors()
            .find(|candidate| candidate.join(MARKER_DIR).is_dir())
            .ok_or_else(|| {
                MyGitError::invalid_argument(format!(
                    "{} is not inside a mygit repository",
                    working_dir.display()
                ))
            })?
            .to_path_buf();

        debug!(root = %root.display(), "opened repository");
        Ok(Self::at(root, working_dir))
    }

    pub(crate) fn at(root: PathBuf, working_dir: PathBuf) -> Self {
        let marker_dir = root.join(MARKER_DIR);

        Repository {
            index: RefCell::new(Index::new(
                marker_dir.join(INDEX_FILE_NAME).into_boxed_path(),
                root.clone().into_boxed_path(),
            )),
            database: Database::new(marker_dir.join(OBJECTS_DIR).into_boxed_path()),
            workspace: Workspace::new(root.clone().into_boxed_path()),
            refs: Refs::new(marker_dir.into_boxed_path()),
            path: root.into_boxed_path(),
            working_dir: working_dir.into_boxed_path(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn marker_path(&self) -> PathBuf {
        self.path.join(MARKER_DIR)
    }

    pub(crate) fn index(&self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub(crate) fn database(&self) -> &Database {
        &self.database
    }

    pub(crate) fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub(crate) fn refs(&self) -> &Refs {
        &self.refs
    }

    pub(crate) fn lock_exclusive(&self) -> Result<RepositoryLock> {
        RepositoryLock::exclusive(&self.marker_path())
    }

    pub(crate) fn lock_shared(&self) -> Result<RepositoryLock> {
        RepositoryLock::shared(&self.marker_path())
    }

    pub(crate) fn head_commit(&self) -> Result<(ObjectId, Commit)> {
        let head_id = self.refs.head_commit_id()?;
        let head_commit = self.database.load_commit(&head_id)?;

        Ok((head_id, head_commit))
    }

    pub(crate) fn head_tree(&self) -> Result<Tree> {
        let (_, head_commit) = self.head_commit()?;
        self.database.load_tree(head_commit.tree_oid())
    }

    /// Edge of `tree` reached by following `path`; `None` for the root or an
    /// untracked path
    pub(crate) fn find_edge(&self, tree: &Tree, path: &Path) -> Result<Option<TreeEdge>> {
        let names = path
            .components()
            .map(|component| component.as_os_str().to_string_lossy().to_string())
            .collect::<Vec<_>>();
        let Some((last, parents)) = names.split_last() else {
            return Ok(None);
        };

        let mut current = tree.clone();
        for name in parents {
            match current.get(name) {
                Some(edge) if edge.is_tree() => current = self.database.load_tree(&edge.oid)?,
                _ => return Ok(None),
            }
        }

        Ok(current.get(last).cloned())
    }

    /// Whether `path` is part of `tree`; the root always is
    pub(crate) fn is_tracked(&self, tree: &Tree, path: &Path) -> Result<bool> {
        Ok(path.as_os_str().is_empty() || self.find_edge(tree, path)?.is_some())
    }

    /// Turn a command argument into a path relative to the repository root
    ///
    /// Relative arguments are taken from the directory the repository was
    /// opened from. `.` and `..` are folded lexically, so the target does not
    /// need to exist. The repository root itself becomes the empty path.
    pub fn resolve_path(&self, argument: impl AsRef<Path>) -> Result<PathBuf> {
        let argument = argument.as_ref();
        let absolute = normalize(&self.working_dir.join(argument));

        let relative = match absolute.strip_prefix(&self.path) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => canonicalize_existing_prefix(&absolute)
                .strip_prefix(&self.path)
                .map(Path::to_path_buf)
                .map_err(|_| {
                    MyGitError::invalid_argument(format!(
                        "path {} is located outside the repository",
                        argument.display()
                    ))
                })?,
        };

        // the index stores one path per line
        let has_line_break = relative
            .components()
            .any(|component| component.as_os_str().to_string_lossy().contains(['\n', '\r']));
        if has_line_break {
            return Err(MyGitError::invalid_argument(format!(
                "path {argument:?} contains a line break"
            )));
        }

        if Workspace::is_ignored(&relative) {
            return Err(MyGitError::invalid_argument(format!(
                "path {} belongs to repository metadata",
                argument.display()
            )));
        }

        Ok(relative)
    }

    pub(crate) fn resolve_paths<P: AsRef<Path>>(&self, arguments: &[P]) -> Result<Vec<PathBuf>> {
        arguments
            .iter()
            .map(|argument| self.resolve_path(argument))
            .collect()
    }
}

/// Fold `.` and `..` components without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}

/// Canonicalize the longest existing ancestor and re-attach the rest
fn canonicalize_existing_prefix(path: &Path) -> PathBuf {
    let mut missing = Vec::new();
    let mut current = path;

    loop {
        if let Ok(canonical) = current.canonicalize() {
            return missing
                .iter()
                .rev()
                .fold(canonical, |acc: PathBuf, name| acc.join(name));
        }

        match (current.parent(), current.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                current = parent;
            }
            _ => return path.to_path_buf(),
        }
    }
}
