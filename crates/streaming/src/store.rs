//! Store abstraction for sighting points.
//!
//! The engine only talks to a store through [`PointStore`]. Implementations
//! live next to this module: an in-memory store for tests and local runs, and
//! an HTTP client for the reference server.

use std::future::Future;
use std::pin::Pin;

use foundation::{GeoBounds, OwnerId};

use crate::point::{NewPoint, Point};

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// The store could not be reached.
    Unreachable,
    /// The store answered but refused the request.
    Rejected,
    /// The store answered with something we could not decode.
    Decode,
}

/// Error type for store operations.
#[derive(Debug)]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        kind: StoreErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Unreachable, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Rejected, message)
    }
}

/// Remote point store.
///
/// Methods return boxed futures for dyn-compatibility.
pub trait PointStore: Send + Sync {
    /// All points inside `bounds` (inclusive), most recent first.
    fn query_bounds(&self, bounds: GeoBounds) -> BoxFuture<'_, Result<Vec<Point>, StoreError>>;

    /// Insert a point; the store assigns id and creation time.
    fn insert(&self, point: NewPoint) -> BoxFuture<'_, Result<Point, StoreError>>;

    /// Delete every point owned by `owner`. Returns the number removed.
    fn delete_owned(&self, owner: OwnerId) -> BoxFuture<'_, Result<u64, StoreError>>;
}
