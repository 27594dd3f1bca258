//! Error taxonomy for repository operations
//!
//! Every public operation returns [`Result`], whose error side is the closed
//! [`MyGitError`] enum. Callers match on the variant to decide how to react:
//!
//! - `InvalidArgument`: the caller passed something unusable (unknown branch,
//!   path outside the repository, bad hash)
//! - `CorruptState`: on-disk data does not match the expected layout
//! - `MissingPrerequisites`: the repository is in a state that forbids the
//!   operation (staged changes before checkout, detached HEAD before merge)
//! - `AlreadyInitialized`: `init` found an existing repository
//! - `EmptyCommit`: nothing is staged
//!
//! Raw filesystem failures are wrapped in `Io` together with a description of
//! what was being attempted.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MyGitError>;

#[derive(Debug, Error)]
pub enum MyGitError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("corrupt repository state: {0}")]
    CorruptState(String),
    #[error("missing prerequisites: {0}")]
    MissingPrerequisites(String),
    #[error("repository already initialized at {}", .0.display())]
    AlreadyInitialized(PathBuf),
    #[error("nothing to commit: the index is empty")]
    EmptyCommit,
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl MyGitError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        MyGitError::InvalidArgument(message.into())
    }

    pub fn corrupt_state(message: impl Into<String>) -> Self {
        MyGitError::CorruptState(message.into())
    }

    pub fn missing_prerequisites(message: impl Into<String>) -> Self {
        MyGitError::MissingPrerequisites(message.into())
    }
}

/// Attach a description of the attempted operation to an `io::Result`.
pub trait IoResultExt<T> {
    fn with_io_context<F, C>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_io_context<F, C>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|source| MyGitError::Io {
            context: context().into(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_context_is_kept_in_the_message() {
        let result: io::Result<()> = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let error = result
            .with_io_context(|| "Unable to read HEAD")
            .unwrap_err();

        assert_eq!(error.to_string(), "Unable to read HEAD");
        assert!(matches!(error, MyGitError::Io { .. }));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn already_initialized_names_the_path() {
        let error = MyGitError::AlreadyInitialized(PathBuf::from("/tmp/repo"));
        assert_eq!(
            error.to_string(),
            "repository already initialized at /tmp/repo"
        );
    }
}
