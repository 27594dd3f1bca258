//! Command implementations
//!
//! Each porcelain command is an `impl Repository` block in its own file.
//! Mutating commands hold the exclusive repository lock for their whole run;
//! read-only commands hold the shared one.

pub mod porcelain;
