//! Error types for local-days operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocalDaysError {
    #[error("Unknown timezone: '{0}' is not an IANA timezone identifier")]
    UnknownTimezone(String),

    #[error("Invalid instant: {0}")]
    InvalidInstant(String),
}

pub type Result<T> = std::result::Result<T, LocalDaysError>;
