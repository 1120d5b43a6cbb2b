use std::io;
use thiserror::Error;

use crate::publish::PublishError;

/// Errors that can occur while estimating, publishing or consuming a clock offset
#[derive(Debug, Error)]
pub enum SyncError {
    // ===== Round Errors =====
    /// A round could not assemble all of its measurements
    #[error("round {round} incomplete: collected {collected} of {expected} measurements")]
    IncompleteRound {
        /// The round number (0 when the round is not tracked)
        round: u64,
        /// Measurements collected before the failure
        collected: usize,
        /// Measurements required per round
        expected: usize,
        /// The underlying transport failure, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ===== Algorithm Errors =====
    /// No majority of sources agrees on a common interval
    #[error("no quorum among {candidates} candidates (tried up to {falsetickers} falsetickers)")]
    NoQuorum {
        /// Number of candidates in the round
        candidates: usize,
        /// Highest falseticker count that was tried
        falsetickers: usize,
    },

    /// Input rejected before it could produce a meaningless result
    #[error("invalid input: {name} - {message}")]
    InvalidInput {
        /// The name of the offending input
        name: String,
        /// Description of the error
        message: String,
    },

    /// A computation would have divided by zero
    #[error("division by zero: {context}")]
    DivisionByZero {
        /// Where the division happened
        context: String,
    },

    // ===== Publication Errors =====
    /// Reading or writing the published estimate failed
    #[error("publication error: {0}")]
    Publish(#[from] PublishError),

    // ===== Transport Errors =====
    /// Network I/O error
    #[error("network error: {0}")]
    NetworkError(#[from] io::Error),

    /// A probe did not complete in time
    #[error("probe timed out")]
    Timeout,

    // ===== Local I/O Errors =====
    /// Local file I/O error
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the error
        message: String,
        /// The underlying source of the error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl SyncError {
    /// Shorthand for an [`SyncError::InvalidInput`]
    pub(crate) fn invalid(name: &str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            name: name.to_string(),
            message: message.into(),
        }
    }

    /// Wrap a local I/O failure with context
    pub(crate) fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::IoError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Check if the next round may succeed where this one failed
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::IncompleteRound { .. }
                | Self::NoQuorum { .. }
                | Self::Publish(_)
                | Self::NetworkError(_)
                | Self::Timeout
        )
    }

    /// Check if this error means the sources disagreed
    #[must_use]
    pub fn is_quorum_failure(&self) -> bool {
        matches!(self, Self::NoQuorum { .. })
    }
}

/// Result type alias for clock synchronization operations
pub type Result<T> = std::result::Result<T, SyncError>;
