//! Error types for skip-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipError {
    /// A setter or `resolve` was handed a value of the wrong kind.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// `resolve` was called before its inputs existed.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Invalid RRULE: {0}")]
    InvalidRule(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// The resolver window never stabilized, or grew past the calendar.
    #[error("Convergence error: {0}")]
    Convergence(String),
}

pub type Result<T> = std::result::Result<T, SkipError>;
