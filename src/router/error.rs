//! Error types for route registration and dispatch.

use thiserror::Error;

use crate::pattern::Error as PatternError;

/// Errors that can occur while registering routes or dispatching requests.
#[derive(Debug, Error)]
pub enum Error {
    /// A registration call was made with arguments that cannot form a route.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A route pattern could not be compiled, or a path could not be built from it.
    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),

    /// A handler failed while processing a request.
    #[error("Handler failed: {0}")]
    Handler(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl Error {
    /// Wrap any error, or a plain message, as a handler failure.
    pub fn handler(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Handler(err.into())
    }
}
