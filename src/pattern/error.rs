//! Error types for path pattern compilation and URL building.

use thiserror::Error;

/// Errors that can occur while compiling a path pattern or building a path from one.
#[derive(Debug, Error)]
pub enum Error {
    /// A `(` group is never closed.
    #[error("Unbalanced group in pattern: {0}")]
    UnbalancedGroup(String),

    /// A `()` group has no content.
    #[error("Empty group in pattern: {0}")]
    EmptyGroup(String),

    /// The generated regular expression was rejected.
    #[error("Invalid pattern {pattern}: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A required parameter was not supplied when building a path.
    #[error("Missing parameter: {0}")]
    MissingParam(String),

    /// A supplied parameter value does not fit its segment.
    #[error("Parameter {name} does not match its pattern: {value}")]
    ParamMismatch { name: String, value: String },
}
