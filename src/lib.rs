//! A minimal version-control engine
//!
//! Content lives in a content-addressed object store (blobs, trees and
//! commits) under `.mygit`. On top of it, [`Repository`] offers the usual
//! workflow: stage paths, commit, branch, check out, merge, and inspect the
//! working tree and history.
//!
//! ```no_run
//! use mygit::Repository;
//!
//! # fn main() -> mygit::Result<()> {
//! let repository = Repository::init("/tmp/project")?;
//! std::fs::write("/tmp/project/a.txt", "1").unwrap();
//! repository.add(&["a.txt"])?;
//! repository.commit("add a.txt")?;
//! # Ok(())
//! # }
//! ```

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;

pub use areas::repository::Repository;
pub use artifacts::branch::branch_name::BranchName;
pub use artifacts::branch::head_status::HeadStatus;
pub use artifacts::log::commit_info::CommitInfo;
pub use artifacts::objects::object_id::ObjectId;
pub use artifacts::status::file_status::FileStatus;
pub use errors::{MyGitError, Result};
