//! Error types for studyplan
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, unknown task, no user configured)
//! - 4: Operation failed (persistence error, lock contention)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the studyplan CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for studyplan operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("No user is signed in; pass --user or set a default in studyplan.toml")]
    AuthenticationRequired,

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    // Operation failures (exit code 4)
    #[error("Failed to fetch tasks: {0}")]
    FetchFailed(#[source] Box<Error>),

    #[error("Failed to persist task: {0}")]
    PersistFailed(#[source] Box<Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),
}

impl Error {
    /// Wrap a backend error as a load failure
    pub fn fetch(err: Error) -> Self {
        Error::FetchFailed(Box::new(err))
    }

    /// Wrap a backend error as a write failure
    pub fn persist(err: Error) -> Self {
        Error::PersistFailed(Box::new(err))
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::AuthenticationRequired
            | Error::TaskNotFound(_)
            | Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::InvalidDate(_) => exit_codes::USER_ERROR,

            // Operation failures
            Error::FetchFailed(_)
            | Error::PersistFailed(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::LockFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }
}

/// Result type alias for studyplan operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_exit_with_2() {
        assert_eq!(Error::AuthenticationRequired.exit_code(), 2);
        assert_eq!(Error::TaskNotFound("t1".into()).exit_code(), 2);
        assert_eq!(Error::InvalidDate("2025-13-01".into()).exit_code(), 2);
    }

    #[test]
    fn operation_failures_exit_with_4() {
        let io = Error::Io(std::io::Error::other("boom"));
        assert_eq!(io.exit_code(), 4);

        let persist = Error::persist(Error::LockFailed(PathBuf::from("/tmp/x.lock")));
        assert_eq!(persist.exit_code(), 4);
    }

    #[test]
    fn wrapped_errors_keep_their_cause_in_the_message() {
        let err = Error::fetch(Error::Io(std::io::Error::other("missing")));
        let message = err.to_string();
        assert!(message.contains("Failed to fetch tasks"));
        assert!(message.contains("missing"));
    }
}
