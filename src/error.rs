//! Error types for pattern generation and testset IO

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the generator and the testset writer
///
/// Every variant is terminal: nothing is retried and no partial sequence is
/// returned alongside an error.
#[derive(Error, Debug)]
pub enum PatternError {
    /// Sizes, geometry or an input file violate a generation invariant
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Strategy name outside the supported catalog
    #[error(
        "unknown strategy '{0}' (expected one of: linear, random, round_robin_sequential, \
         round_robin_random, round_robin_per_pages)"
    )]
    UnknownStrategy(String),

    /// Testset file could not be created, written or read
    #[error("testset IO failed for {}: {source}", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PatternError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoFailure {
            path: path.into(),
            source,
        }
    }
}
