//! A minimal route registry and dispatcher for async middleware pipelines.
//!
//! This library stores `(method, path pattern, handler chain)` routes, matches a request
//! context against them in registration order and runs the first match's handlers with
//! the extracted path parameters in the context.
//!
//! # Features
//!
//! - Path patterns with named, optional, repeated and custom-expression segments
//! - Router-wide prefix, rebindable at runtime
//! - Handler chains with explicit continuations and short-circuit on failure
//! - Two handler calling conventions, adapted to each other at the boundaries
//! - Per-verb registration methods (`get`, `post`, `put`, `delete`/`del`, ...)
//!
//! # Examples
//!
//! ## Basic usage
//!
//! ```
//! use microroute::{Context, Handler, Method, Next, Router};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), microroute::RouterError> {
//! let router = Router::new();
//! router
//!     .add_route("GET /users/:id", Handler::new(|mut ctx: Context, next: Next| async move {
//!         let id = ctx.param("id").unwrap_or_default().to_string();
//!         ctx.respond_json(200, &serde_json::json!({ "id": id }))?;
//!         next.run(ctx).await
//!     }), vec![])
//!     .await?;
//!
//! let ctx = router
//!     .dispatcher()
//!     .dispatch(Context::new(Method::GET, "/users/7"), Next::end())
//!     .await?;
//! assert_eq!(ctx.status, Some(200));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error handling
//!
//! ```
//! use microroute::{Router, RouterError};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let router = Router::new();
//! match router.create_route("FETCH", "/x", vec![]).await {
//!     Err(RouterError::InvalidArgument(reason)) => println!("Rejected: {reason}"),
//!     Err(err) => println!("Other error: {err}"),
//!     Ok(route) => println!("Built {route:?}"),
//! }
//! # }
//! ```
//!
//! ## Path patterns
//!
//! ```
//! use microroute::{MatchOptions, Params, PathPattern};
//!
//! let pattern = PathPattern::compile("/files/:path+", &MatchOptions::default()).unwrap();
//! let params = pattern.match_path("/files/a/b", &Params::new()).unwrap();
//! assert_eq!(params["path"], "a/b");
//! ```

// Export the pattern module
pub mod pattern;

// Export the router module
pub mod router;

// Re-export commonly used items for convenience
pub use pattern::{join_path, Error as PatternError, MatchOptions, Params, PathPattern};
pub use router::{
    compose, Context, Dispatcher, Error as RouterError, Flow, Handler, HandlerFn, HandlerResult,
    Method, Next, Route, RouteSpec, Router, RouterConfig, RouterOptions,
};
