//! Core repository components
//!
//! - `database`: object store for blobs, trees and commits
//! - `index`: staged paths for the next commit
//! - `lock`: advisory lock held while a command runs
//! - `refs`: HEAD and branch references
//! - `repository`: context tying the other areas together
//! - `workspace`: working directory file system operations

pub(crate) mod database;
pub(crate) mod index;
pub(crate) mod lock;
pub(crate) mod refs;
pub mod repository;
pub(crate) mod workspace;
