//! Porcelain commands (user-facing operations)
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `add`, `reset`, `rm`: Stage and unstage paths
//! - `commit`: Create a new commit
//! - `checkout`: Switch to a branch or commit
//! - `branch`: Create, list, or delete branches
//! - `merge`: Merge a branch into the current one
//! - `log`: Show commit history
//! - `status`, `clean`: Inspect and tidy the working tree

pub mod add;
pub mod branch;
pub mod checkout;
pub mod clean;
pub mod commit;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
