//! Route records and the ordered route table.

use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::pattern::{join_path, MatchOptions, Params, PathPattern};
use crate::router::chain::{compose, Next};
use crate::router::context::Context;
use crate::router::error::Error;
use crate::router::handler::{Handler, HandlerFn, HandlerResult};
use crate::router::method::Method;

/// A registered binding of a method and path pattern to a handler chain.
///
/// Routes are immutable once built. A prefix change produces a rebound copy
/// through `RouteTable::rebind`.
#[derive(Clone)]
pub struct Route {
    method: Method,
    base_pattern: String,
    prefix: String,
    full_path: String,
    matcher: PathPattern,
    handlers: Vec<HandlerFn>,
    chain: HandlerFn,
}

impl Route {
    /// Build a route. Handlers are converted to the canonical convention and composed here.
    pub fn new(
        method: Method,
        pattern: impl Into<String>,
        handlers: Vec<Handler>,
        prefix: &str,
        options: &MatchOptions,
    ) -> Result<Self, Error> {
        let base_pattern = pattern.into();
        if handlers.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "route {method} {base_pattern} has no handlers"
            )));
        }

        let handlers: Vec<HandlerFn> = handlers.into_iter().map(Handler::into_modern).collect();
        let chain = compose(handlers.clone());
        let full_path = join_path(prefix, &base_pattern, options.strict);
        let matcher = PathPattern::compile(&full_path, options)?;

        Ok(Self {
            method,
            base_pattern,
            prefix: prefix.to_string(),
            full_path,
            matcher,
            handlers,
            chain,
        })
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// The pattern as registered, without the prefix.
    pub fn base_pattern(&self) -> &str {
        &self.base_pattern
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The prefix joined with the base pattern; what the matcher was compiled from.
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    pub fn matcher(&self) -> &PathPattern {
        &self.matcher
    }

    pub fn handlers(&self) -> &[HandlerFn] {
        &self.handlers
    }

    /// Match a request method and path, seeding the result with `seed`.
    pub fn matches(&self, method: Method, path: &str, seed: &Params) -> Option<Params> {
        if method != self.method {
            return None;
        }
        self.matcher.match_path(path, seed)
    }

    /// Build a concrete path for this route.
    pub fn url(&self, params: &Params) -> Result<String, Error> {
        Ok(self.matcher.url(params)?)
    }

    /// Run the composed handler chain with a terminal continuation.
    pub async fn invoke(&self, ctx: Context) -> HandlerResult {
        (self.chain)(ctx, Next::end()).await
    }

    fn rebind(&self, prefix: &str, options: &MatchOptions) -> Result<Self, Error> {
        let full_path = join_path(prefix, &self.base_pattern, options.strict);
        let matcher = PathPattern::compile(&full_path, options)?;
        Ok(Self {
            prefix: prefix.to_string(),
            full_path,
            matcher,
            ..self.clone()
        })
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("prefix", &self.prefix)
            .field("base_pattern", &self.base_pattern)
            .field("full_path", &self.full_path)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// The route argument of a registration call: a pattern, or the leading handler(s)
/// when the pattern is given inline in the method spec (`"GET /users"`).
#[derive(Debug, Clone)]
pub enum RouteSpec {
    Path(String),
    Handlers(Vec<Handler>),
}

impl From<&str> for RouteSpec {
    fn from(path: &str) -> Self {
        RouteSpec::Path(path.to_string())
    }
}

impl From<String> for RouteSpec {
    fn from(path: String) -> Self {
        RouteSpec::Path(path)
    }
}

impl From<Handler> for RouteSpec {
    fn from(handler: Handler) -> Self {
        RouteSpec::Handlers(vec![handler])
    }
}

impl From<Vec<Handler>> for RouteSpec {
    fn from(handlers: Vec<Handler>) -> Self {
        RouteSpec::Handlers(handlers)
    }
}

/// Routes in registration order; the first match wins.
#[derive(Clone, Default)]
pub struct RouteTable {
    routes: Vec<Arc<Route>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route. Duplicates are allowed; the earlier one keeps priority.
    pub fn push(&mut self, route: Route) -> Arc<Route> {
        let route = Arc::new(route);
        self.routes.push(Arc::clone(&route));
        route
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Route>> {
        self.routes.iter()
    }

    /// Find the first route matching `method` and `path`.
    pub fn find(&self, method: Method, path: &str, seed: &Params) -> Option<(Arc<Route>, Params)> {
        self.routes.iter().find_map(|route| {
            let params = route.matches(method, path, seed)?;
            trace!("{method} {path} matched {}", route.full_path);
            Some((Arc::clone(route), params))
        })
    }

    /// Rebind every route to a new prefix and match options.
    ///
    /// Either every route is rebound or, if any pattern fails to compile, none is.
    pub fn rebind(&mut self, prefix: &str, options: &MatchOptions) -> Result<(), Error> {
        let routes = self
            .routes
            .iter()
            .map(|route| route.rebind(prefix, options).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;
        self.routes = routes;
        Ok(())
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.routes.iter()).finish()
    }
}
