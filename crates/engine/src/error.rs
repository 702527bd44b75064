use foundation::{BoundsError, CoordinateError};
use streaming::{FetchError, StoreError};
use thiserror::Error;

use crate::config::ConfigError;

/// Failures surfaced by engine operations.
///
/// All of them are recoverable: the failing operation aborts and the render
/// state it would have touched is left as it was.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The store could not be reached or refused the request.
    #[error("network failure: {0}")]
    NetworkFailure(#[from] StoreError),
    #[error("invalid viewport bounds: {0}")]
    InvalidBounds(#[from] BoundsError),
    #[error("invalid submission: {0}")]
    InvalidSubmission(#[from] CoordinateError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl From<FetchError> for EngineError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::InvalidBounds(b) => EngineError::InvalidBounds(b),
            FetchError::Store(s) => EngineError::NetworkFailure(s),
        }
    }
}
