//! Path pattern module.
//!
//! Compiles route patterns such as `/users/:id` into matchers that test a request
//! path and extract its named parameters.

mod compiler;
mod error;
mod join;
mod tests;

// Re-export public items
pub use compiler::{Key, MatchOptions, Params, PathPattern};
pub use error::Error;
pub use join::join_path;
