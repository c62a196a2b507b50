//! Route registration and dispatch.
//!
//! A `Router` stores `(method, pattern, handlers)` routes in registration order and
//! hands out dispatchers that run the first matching route's handler chain.

mod chain;
mod config;
mod context;
mod dispatcher;
mod error;
mod handler;
mod method;
mod route;
#[allow(clippy::module_inception)]
mod router;

// Re-export public items
pub use chain::{compose, Next};
pub use config::{RouterConfig, RouterOptions};
pub use context::Context;
pub use dispatcher::Dispatcher;
pub use error::Error;
pub use handler::{BoxFuture, Flow, Handler, HandlerFn, HandlerFuture, HandlerResult, LegacyFn};
pub use method::Method;
pub use route::{Route, RouteSpec, RouteTable};
pub use router::Router;
