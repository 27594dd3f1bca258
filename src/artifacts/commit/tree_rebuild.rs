//! Tree rebuild for new commits
//!
//! Walks the committed tree and the working directory side by side:
//!
//! - tracked paths still on disk follow their current content; an unchanged
//!   file keeps its old edge (hash and timestamp)
//! - tracked paths missing from disk are dropped only when staged; a missing
//!   directory with staged paths inside loses just those paths
//! - untracked paths are picked up only when staged
//!
//! Subtrees are stored before the trees that reference them.

use crate::areas::database::Database;
use crate::areas::workspace::{EntryKind, Workspace};
use crate::artifacts::index::staged_paths::StagedPaths;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{EdgeType, Tree, TreeEdge};
use crate::errors::Result;
use chrono::{DateTime, Utc};
use derive_new::new;
use std::path::Path;
use tracing::trace;

#[derive(new)]
pub struct TreeRebuild<'r> {
    database: &'r Database,
    workspace: &'r Workspace,
    staged: &'r StagedPaths,
    now: DateTime<Utc>,
}

impl TreeRebuild<'_> {
    /// Rebuild the root tree and return its stored ID
    pub fn rebuild_root(&self, committed: &Tree) -> Result<ObjectId> {
        let tree = self.rebuild(Some(committed), Path::new(""))?;
        self.database.store(&tree)
    }

    fn rebuild(&self, committed: Option<&Tree>, dir: &Path) -> Result<Tree> {
        let mut on_disk = self.workspace.list_dir(dir)?;
        let mut tree = Tree::default();

        for edge in committed.into_iter().flat_map(Tree::edges) {
            let path = dir.join(&edge.name);

            let rebuilt = match on_disk.remove(&edge.name) {
                None if self.staged.covers(&path) => {
                    trace!(path = %path.display(), "dropping deleted path");
                    None
                }
                None if edge.is_tree() && self.staged.has_staged_descendant(&path) => {
                    let subtree = self.database.load_tree(&edge.oid)?;
                    let rebuilt = self.rebuild(Some(&subtree), &path)?;
                    if rebuilt.is_empty() {
                        None
                    } else {
                        Some(self.tree_edge(rebuilt, edge)?)
                    }
                }
                None => Some(edge.clone()),
                Some(EntryKind::File) => Some(self.rebuild_file(edge, &path)?),
                Some(EntryKind::Directory) if edge.is_tree() => {
                    let subtree = self.database.load_tree(&edge.oid)?;
                    let rebuilt = self.rebuild(Some(&subtree), &path)?;
                    Some(self.tree_edge(rebuilt, edge)?)
                }
                Some(EntryKind::Directory) => {
                    if self.staged.covers(&path) || self.staged.has_staged_descendant(&path) {
                        self.new_directory(&path, &edge.name)?
                    } else {
                        Some(edge.clone())
                    }
                }
            };

            if let Some(rebuilt) = rebuilt {
                tree.insert(rebuilt);
            }
        }

        for (name, kind) in on_disk {
            let path = dir.join(&name);
            let edge = match kind {
                EntryKind::File if self.staged.covers(&path) => Some(self.new_file(&path, &name)?),
                EntryKind::File => None,
                EntryKind::Directory => self.new_directory(&path, &name)?,
            };

            if let Some(edge) = edge {
                trace!(path = %path.display(), "adding path");
                tree.insert(edge);
            }
        }

        Ok(tree)
    }

    /// A tracked path that is a file on disk now
    fn rebuild_file(&self, edge: &TreeEdge, path: &Path) -> Result<TreeEdge> {
        if edge.is_tree() {
            return self.new_file(path, &edge.name);
        }

        let committed = self.database.load_blob(&edge.oid)?;
        let current = self.workspace.read_file(path)?;
        if committed.content() == &current {
            Ok(edge.clone())
        } else {
            let oid = self.database.store(&Blob::new(current))?;
            Ok(TreeEdge::new(oid, edge.name.clone(), EdgeType::Blob, self.now))
        }
    }

    /// Store a rebuilt subtree, keeping the old edge if nothing changed
    fn tree_edge(&self, rebuilt: Tree, previous: &TreeEdge) -> Result<TreeEdge> {
        let oid = self.database.store(&rebuilt)?;
        if oid == previous.oid {
            Ok(previous.clone())
        } else {
            Ok(TreeEdge::new(
                oid,
                previous.name.clone(),
                EdgeType::Tree,
                self.now,
            ))
        }
    }

    fn new_file(&self, path: &Path, name: &str) -> Result<TreeEdge> {
        let content = self.workspace.read_file(path)?;
        let oid = self.database.store(&Blob::new(content))?;

        Ok(TreeEdge::new(oid, name.to_string(), EdgeType::Blob, self.now))
    }

    /// An untracked directory: kept whole when staged, otherwise only for
    /// the staged paths inside it
    fn new_directory(&self, path: &Path, name: &str) -> Result<Option<TreeEdge>> {
        let covered = self.staged.covers(path);
        if !covered && !self.staged.has_staged_descendant(path) {
            return Ok(None);
        }

        let tree = self.rebuild(None, path)?;
        if tree.is_empty() && !covered {
            return Ok(None);
        }

        let oid = self.database.store(&tree)?;
        Ok(Some(TreeEdge::new(
            oid,
            name.to_string(),
            EdgeType::Tree,
            self.now,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::areas::workspace::MARKER_DIR;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use bytes::Bytes;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::path::PathBuf;

    struct Fixture {
        dir: TempDir,
        database: Database,
        workspace: Workspace,
    }

    #[fixture]
    fn fixture() -> Fixture {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let database = Database::new(dir.path().join(MARKER_DIR).join("objects").into());
        let workspace = Workspace::new(dir.path().into());
        Fixture {
            dir,
            database,
            workspace,
        }
    }

    fn staged(paths: &[&str]) -> StagedPaths {
        paths.iter().map(PathBuf::from).collect()
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(seconds, 0).unwrap()
    }

    fn rebuild(fixture: &Fixture, committed: &Tree, staged: &StagedPaths, now: i64) -> Tree {
        let oid = TreeRebuild::new(&fixture.database, &fixture.workspace, staged, at(now))
            .rebuild_root(committed)
            .unwrap();
        fixture.database.load_tree(&oid).unwrap()
    }

    fn names(tree: &Tree) -> Vec<&str> {
        tree.edges().map(|edge| edge.name.as_str()).collect()
    }

    #[rstest]
    fn only_staged_untracked_files_are_added(fixture: Fixture) {
        fixture.dir.child("staged.txt").write_str("1").unwrap();
        fixture.dir.child("stray.txt").write_str("2").unwrap();

        let tree = rebuild(&fixture, &Tree::default(), &staged(&["staged.txt"]), 10);

        assert_eq!(names(&tree), vec!["staged.txt"]);
        assert_eq!(tree.get("staged.txt").unwrap().created_at, at(10));
    }

    #[rstest]
    fn unchanged_files_keep_their_edge(fixture: Fixture) {
        fixture.dir.child("a.txt").write_str("same").unwrap();
        let first = rebuild(&fixture, &Tree::default(), &staged(&["a.txt"]), 10);

        let second = rebuild(&fixture, &first, &staged(&["a.txt"]), 20);

        assert_eq!(second, first);
    }

    #[rstest]
    fn changed_tracked_files_get_a_fresh_edge(fixture: Fixture) {
        fixture.dir.child("a.txt").write_str("old").unwrap();
        let first = rebuild(&fixture, &Tree::default(), &staged(&["a.txt"]), 10);
        fixture.dir.child("a.txt").write_str("new").unwrap();

        let second = rebuild(&fixture, &first, &staged(&["other"]), 20);
        let edge = second.get("a.txt").unwrap();

        assert_eq!(edge.created_at, at(20));
        assert_eq!(
            fixture.database.load_blob(&edge.oid).unwrap().content(),
            &Bytes::from("new")
        );
    }

    #[rstest]
    fn missing_paths_are_dropped_only_when_staged(fixture: Fixture) {
        fixture.dir.child("gone.txt").write_str("1").unwrap();
        fixture.dir.child("kept.txt").write_str("2").unwrap();
        let first = rebuild(&fixture, &Tree::default(), &staged(&[""]), 10);
        std::fs::remove_file(fixture.dir.child("gone.txt").path()).unwrap();
        std::fs::remove_file(fixture.dir.child("kept.txt").path()).unwrap();

        let second = rebuild(&fixture, &first, &staged(&["gone.txt"]), 20);

        assert_eq!(names(&second), vec!["kept.txt"]);
    }

    #[rstest]
    fn staged_paths_inside_a_missing_directory_are_dropped(fixture: Fixture) {
        fixture.dir.child("d/a.txt").write_str("a").unwrap();
        fixture.dir.child("d/b.txt").write_str("b").unwrap();
        let first = rebuild(&fixture, &Tree::default(), &staged(&[""]), 10);
        std::fs::remove_dir_all(fixture.dir.child("d").path()).unwrap();

        let second = rebuild(&fixture, &first, &staged(&["d/a.txt"]), 20);

        let d = second.get("d").unwrap();
        assert_eq!(d.created_at, at(20));
        assert_eq!(names(&fixture.database.load_tree(&d.oid).unwrap()), vec!["b.txt"]);

        let third = rebuild(&fixture, &second, &staged(&["d/b.txt"]), 30);
        assert_eq!(names(&third), Vec::<&str>::new());
    }

    #[rstest]
    fn staging_a_nested_file_adds_only_its_ancestors(fixture: Fixture) {
        fixture.dir.child("a/b/c.txt").write_str("c").unwrap();
        fixture.dir.child("a/b/other.txt").write_str("o").unwrap();
        fixture.dir.child("a/empty").create_dir_all().unwrap();

        let tree = rebuild(&fixture, &Tree::default(), &staged(&["a/b/c.txt"]), 10);

        let a = fixture.database.load_tree(&tree.get("a").unwrap().oid).unwrap();
        let b = fixture.database.load_tree(&a.get("b").unwrap().oid).unwrap();
        assert_eq!(names(&a), vec!["b"]);
        assert_eq!(names(&b), vec!["c.txt"]);
    }

    #[rstest]
    fn staged_empty_directories_are_kept(fixture: Fixture) {
        fixture.dir.child("empty").create_dir_all().unwrap();

        let tree = rebuild(&fixture, &Tree::default(), &staged(&["empty"]), 10);

        let edge = tree.get("empty").unwrap();
        assert!(edge.is_tree());
        assert!(fixture.database.load_tree(&edge.oid).unwrap().is_empty());
    }

    #[rstest]
    fn directory_replaced_by_file_becomes_a_blob(fixture: Fixture) {
        fixture.dir.child("x/inner.txt").write_str("i").unwrap();
        let first = rebuild(&fixture, &Tree::default(), &staged(&["x"]), 10);
        std::fs::remove_dir_all(fixture.dir.child("x").path()).unwrap();
        fixture.dir.child("x").write_str("now a file").unwrap();

        let second = rebuild(&fixture, &first, &staged(&["x"]), 20);

        assert_eq!(second.get("x").unwrap().kind, EdgeType::Blob);
    }

    #[rstest]
    fn unchanged_subtrees_keep_their_timestamp(fixture: Fixture) {
        fixture.dir.child("dir/a.txt").write_str("a").unwrap();
        fixture.dir.child("top.txt").write_str("t").unwrap();
        let first = rebuild(&fixture, &Tree::default(), &staged(&[""]), 10);
        fixture.dir.child("top.txt").write_str("changed").unwrap();

        let second = rebuild(&fixture, &first, &staged(&["top.txt"]), 20);

        assert_eq!(second.get("dir"), first.get("dir"));
        assert_eq!(second.get("top.txt").unwrap().created_at, at(20));
    }
}
