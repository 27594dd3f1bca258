use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Repository-relative paths explicitly staged with `add` or `rm`
///
/// The repository root is the empty path. Staging a directory stages
/// everything beneath it, so most questions are asked in terms of coverage
/// rather than exact membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedPaths(BTreeSet<PathBuf>);

impl StagedPaths {
    pub fn insert(&mut self, path: PathBuf) -> bool {
        self.0.insert(path)
    }

    /// Drop `path` and every staged path beneath it
    pub fn remove_under(&mut self, path: &Path) -> bool {
        let before = self.0.len();
        self.0.retain(|staged| !staged.starts_with(path));
        before != self.0.len()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.0.contains(path)
    }

    /// Whether `path` equals or lies under a staged path
    pub fn covers(&self, path: &Path) -> bool {
        self.0.iter().any(|staged| path.starts_with(staged))
    }

    /// Whether a staged path lies strictly beneath `path`
    pub fn has_staged_descendant(&self, path: &Path) -> bool {
        self.0
            .iter()
            .any(|staged| staged != path && staged.starts_with(path))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.0.iter()
    }
}

impl FromIterator<PathBuf> for StagedPaths {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
