//! Error types for tracking runs
//!
//! Input validation failures abort the run before any edge becomes visible
//! to the caller. Degenerate geometry (zero-length vectors in angle
//! computations) is handled locally and is never an error.

use std::fmt;

/// Errors that can occur when starting a tracking run
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerError {
    /// The spot collection contains no spots
    EmptyCollection,

    /// A settings field failed validation
    InvalidSetting {
        /// Name of the offending field
        name: &'static str,
        /// Description of what is wrong with it
        reason: String,
    },
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::EmptyCollection => write!(f, "The spot collection is empty"),
            TrackerError::InvalidSetting { name, reason } => {
                write!(f, "Invalid setting {}: {}", name, reason)
            }
        }
    }
}

impl std::error::Error for TrackerError {}
