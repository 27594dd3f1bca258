//! Commit history traversal
//!
//! - `rev_list`: depth-first walk over every parent of a commit
//! - `commit_info`: the public view of a commit in a history listing
//!
//! Reachable commits are collected into the commit total order, which also
//! collapses diamonds in merge histories, and listed newest first.

pub mod commit_info;
pub mod rev_list;
