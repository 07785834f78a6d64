//! Errors for unit construction and measure arithmetic
//!
//! Every failure is local and deterministic; nothing here is worth retrying.
//! Equality, equivalence and ordering checks never produce errors: across
//! dimensions they simply answer `false`.

use thiserror::Error;
use crate::Dimension;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
    pub const MISSING_CONFIGURATION: &str = "MISSING_CONFIGURATION";
    pub const DIMENSION_MISMATCH: &str = "DIMENSION_MISMATCH";
}

pub type Result<T> = std::result::Result<T, UnitsError>;

/// Error type for unit and measure operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitsError {
    /// A numeric argument is outside the range the operation accepts
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A unit builder was asked to make a unit before it was fully configured
    #[error("Missing configuration: {0} was not set")]
    MissingConfiguration(&'static str),

    /// Two quantities of unrelated dimensions were combined
    #[error("Dimension mismatch in {operation}: expected {expected}, got {found}")]
    DimensionMismatch {
        operation: &'static str,
        expected: Dimension,
        found: Dimension,
    },
}

impl UnitsError {
    pub fn invalid_argument(details: impl Into<String>) -> Self {
        Self::InvalidArgument(details.into())
    }

    pub fn dimension_mismatch(operation: &'static str, expected: &Dimension, found: &Dimension) -> Self {
        Self::DimensionMismatch {
            operation,
            expected: expected.clone(),
            found: found.clone(),
        }
    }

    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => codes::INVALID_ARGUMENT,
            Self::MissingConfiguration(_) => codes::MISSING_CONFIGURATION,
            Self::DimensionMismatch { .. } => codes::DIMENSION_MISMATCH,
        }
    }
}
