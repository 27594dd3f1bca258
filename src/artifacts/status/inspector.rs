use crate::areas::database::Database;
use crate::areas::workspace::{EntryKind, Workspace};
use crate::artifacts::index::staged_paths::StagedPaths;
use crate::artifacts::objects::tree::{Tree, TreeEdge};
use crate::artifacts::status::file_status::FileStatus;
use crate::errors::Result;
use derive_new::new;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub type StatusMap = BTreeMap<PathBuf, FileStatus>;

/// Compares the committed tree, the staged paths and the working tree
///
/// Precedence, highest first: a tracked path missing on disk is `Deleted`;
/// an explicitly staged path, or a covered path with new content, is
/// `Staged`; a tracked path with other content is `Modified`; anything else
/// on disk that is not tracked is `Unstaged`. Unchanged tracked files are
/// not reported.
#[derive(new)]
pub struct Inspector<'r> {
    database: &'r Database,
    workspace: &'r Workspace,
    staged: &'r StagedPaths,
}

impl Inspector<'_> {
    pub fn status(&self, committed: &Tree) -> Result<StatusMap> {
        let mut statuses = StatusMap::new();
        self.inspect_dir(Some(committed), Path::new(""), &mut statuses)?;

        Ok(statuses)
    }

    /// Untracked, unstaged paths, outermost first
    ///
    /// Untracked directories holding staged paths are descended instead of
    /// being reported whole.
    pub fn stray_paths(&self, committed: &Tree) -> Result<Vec<PathBuf>> {
        let mut strays = Vec::new();
        self.collect_strays(Some(committed), Path::new(""), &mut strays)?;

        Ok(strays)
    }

    fn inspect_dir(
        &self,
        committed: Option<&Tree>,
        dir: &Path,
        statuses: &mut StatusMap,
    ) -> Result<()> {
        let mut on_disk = self.workspace.list_dir(dir)?;

        for edge in committed.into_iter().flat_map(Tree::edges) {
            let path = dir.join(&edge.name);

            match on_disk.remove(&edge.name) {
                None => self.report_deleted(edge, &path, statuses)?,
                Some(EntryKind::Directory) if edge.is_tree() => {
                    if self.staged.contains(&path) {
                        statuses.insert(path.clone(), FileStatus::Staged);
                    }
                    let subtree = self.database.load_tree(&edge.oid)?;
                    self.inspect_dir(Some(&subtree), &path, statuses)?;
                }
                Some(EntryKind::File) if !edge.is_tree() => {
                    let committed = self.database.load_blob(&edge.oid)?;
                    let changed = committed.content() != &self.workspace.read_file(&path)?;

                    if self.staged.contains(&path) || (changed && self.staged.covers(&path)) {
                        statuses.insert(path, FileStatus::Staged);
                    } else if changed {
                        statuses.insert(path, FileStatus::Modified);
                    }
                }
                // the path changed kind since the last commit
                Some(_) => {
                    let status = if self.staged.covers(&path) {
                        FileStatus::Staged
                    } else {
                        FileStatus::Modified
                    };
                    statuses.insert(path, status);
                }
            }
        }

        for (name, kind) in on_disk {
            let path = dir.join(&name);
            let status = if self.staged.covers(&path) {
                FileStatus::Staged
            } else {
                FileStatus::Unstaged
            };

            match kind {
                EntryKind::File => {
                    statuses.insert(path, status);
                }
                EntryKind::Directory => {
                    let before = statuses.len();
                    self.inspect_dir(None, &path, statuses)?;

                    // an empty directory is reported on its own
                    if self.staged.contains(&path) || statuses.len() == before {
                        statuses.insert(path, status);
                    }
                }
            }
        }

        Ok(())
    }

    fn report_deleted(&self, edge: &TreeEdge, path: &Path, statuses: &mut StatusMap) -> Result<()> {
        if !edge.is_tree() {
            statuses.insert(path.to_path_buf(), FileStatus::Deleted);
            return Ok(());
        }

        let subtree = self.database.load_tree(&edge.oid)?;
        if subtree.is_empty() {
            statuses.insert(path.to_path_buf(), FileStatus::Deleted);
        }
        for child in subtree.edges() {
            self.report_deleted(child, &path.join(&child.name), statuses)?;
        }

        Ok(())
    }

    fn collect_strays(
        &self,
        committed: Option<&Tree>,
        dir: &Path,
        strays: &mut Vec<PathBuf>,
    ) -> Result<()> {
        for (name, kind) in self.workspace.list_dir(dir)? {
            let path = dir.join(&name);
            let edge = committed.and_then(|tree| tree.get(&name));

            match (edge, kind) {
                (Some(edge), EntryKind::Directory) if edge.is_tree() => {
                    let subtree = self.database.load_tree(&edge.oid)?;
                    self.collect_strays(Some(&subtree), &path, strays)?;
                }
                (Some(_), _) => {}
                (None, _) if self.staged.covers(&path) => {}
                (None, EntryKind::Directory) if self.staged.has_staged_descendant(&path) => {
                    self.collect_strays(None, &path, strays)?;
                }
                (None, _) => strays.push(path),
            }
        }

        Ok(())
    }
}
