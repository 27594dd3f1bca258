//! Advisory repository lock
//!
//! Mutating commands hold an exclusive lock on `.mygit/lock` for their whole
//! duration and read-only commands hold a shared one. The lock is released
//! when the guard is dropped.

use crate::errors::{IoResultExt, Result};
use file_guard::{FileGuard, Lock};
use std::fs::{File, OpenOptions};
use std::path::Path;
use tracing::trace;

pub const LOCK_FILE_NAME: &str = "lock";

pub struct RepositoryLock {
    _guard: FileGuard<Box<File>>,
}

impl RepositoryLock {
    pub fn exclusive(marker_dir: &Path) -> Result<Self> {
        Self::acquire(marker_dir, Lock::Exclusive)
    }

    pub fn shared(marker_dir: &Path) -> Result<Self> {
        Self::acquire(marker_dir, Lock::Shared)
    }

    fn acquire(marker_dir: &Path, lock: Lock) -> Result<Self> {
        let path = marker_dir.join(LOCK_FILE_NAME);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .with_io_context(|| format!("Unable to open lock file {}", path.display()))?;

        let exclusive = matches!(lock, Lock::Exclusive);
        let guard = file_guard::lock(Box::new(file), lock, 0, 1)
            .with_io_context(|| format!("Unable to lock {}", path.display()))?;

        trace!(exclusive, "acquired repository lock");
        Ok(Self { _guard: guard })
    }
}
