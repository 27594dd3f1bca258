//! Working tree status
//!
//! - `file_status`: per-path classification and its presentation
//! - `inspector`: walk comparing HEAD, the index and the working tree

pub mod file_status;
pub mod inspector;
