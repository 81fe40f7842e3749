//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias.
//! Only [`Error::InvalidConfig`] ever crosses a public `generate` boundary; provider
//! failures are recovered inside the generators and placement exhaustion is not an
//! error at all (callers receive a shorter sequence).
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("geometry provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Returns `true` for configuration errors raised before any placement.
    pub fn is_config(&self) -> bool {
        matches!(self, Error::InvalidConfig(_))
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
