//! The router: configuration, route registration and dispatch entry points.

use std::sync::Arc;

use log::{debug, info};
use tokio::sync::RwLock;

use crate::pattern::Params;
use crate::router::config::{RouterConfig, RouterOptions};
use crate::router::dispatcher::Dispatcher;
use crate::router::error::Error;
use crate::router::handler::Handler;
use crate::router::method::Method;
use crate::router::route::{Route, RouteSpec, RouteTable};

/// Configuration and routes, shared by a router and every dispatcher it hands out.
#[derive(Debug)]
pub(crate) struct RouterState {
    pub(crate) config: RouterConfig,
    pub(crate) table: RouteTable,
}

impl RouterState {
    /// Merge `options` into the configuration, rebinding routes if their binding changed.
    fn apply(&mut self, options: &RouterOptions) -> Result<(), Error> {
        let mut config = self.config.clone();
        config.merge(options);

        if config.binding_differs(&self.config) {
            self.table.rebind(&config.prefix, &config.matching)?;
            info!(
                "Rebound {len} routes to prefix {prefix}",
                len = self.table.len(),
                prefix = config.prefix
            );
        }

        self.config = config;
        Ok(())
    }
}

/// A route registry and dispatcher.
///
/// ```
/// use microroute::{Context, Handler, Method, Next, Router};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), microroute::RouterError> {
/// let router = Router::new();
/// router
///     .get("/users/:id", vec![Handler::new(|mut ctx: Context, next: Next| async move {
///         ctx.status = Some(200);
///         next.run(ctx).await
///     })])
///     .await?;
///
/// let ctx = router
///     .dispatcher()
///     .dispatch(Context::new(Method::GET, "/users/42"), Next::end())
///     .await?;
/// assert_eq!(ctx.param("id"), Some("42"));
/// assert_eq!(ctx.status, Some(200));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Router {
    state: Arc<RwLock<RouterState>>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Create a router with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    /// Create a router with the given configuration.
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(RouterState {
                config,
                table: RouteTable::new(),
            })),
        }
    }

    /// A snapshot of the current configuration.
    pub async fn config(&self) -> RouterConfig {
        self.state.read().await.config.clone()
    }

    /// Merge options into the configuration.
    ///
    /// A changed prefix or changed match options rebinds every registered route at
    /// once. The change is visible to every dispatcher obtained from this router.
    pub async fn configure(&self, options: impl Into<RouterOptions>) -> Result<(), Error> {
        self.state.write().await.apply(&options.into())
    }

    /// Change the prefix of the router and all of its routes.
    pub async fn set_prefix(&self, prefix: impl Into<String>) -> Result<(), Error> {
        self.configure(RouterOptions::new().with_prefix(prefix)).await
    }

    /// Build a route without registering it.
    ///
    /// `method_spec` is a verb (`"GET"`, case-insensitive, empty means `GET`) optionally
    /// followed by a space and a path pattern (`"GET /users"`). `route` is either the
    /// pattern or the leading handler(s); in the latter case the pattern must be
    /// inline in `method_spec`. When both are given, `route` wins.
    pub async fn create_route(
        &self,
        method_spec: &str,
        route: impl Into<RouteSpec>,
        handlers: Vec<Handler>,
    ) -> Result<Route, Error> {
        let state = self.state.read().await;
        build_route(&state.config, method_spec, route.into(), handlers)
    }

    /// Build a route and append it to the route table.
    pub async fn add_route(
        &self,
        method_spec: &str,
        route: impl Into<RouteSpec>,
        handlers: Vec<Handler>,
    ) -> Result<&Self, Error> {
        let mut state = self.state.write().await;
        let route = build_route(&state.config, method_spec, route.into(), handlers)?;
        debug!("Registered route {} {}", route.method(), route.full_path());
        state.table.push(route);
        Ok(self)
    }

    /// The registered routes, in priority order.
    pub async fn routes(&self) -> Vec<Arc<Route>> {
        self.state.read().await.table.iter().cloned().collect()
    }

    /// Find the route a request would be dispatched to, without dispatching.
    pub async fn match_route(&self, method: Method, path: &str) -> Option<(Arc<Route>, Params)> {
        self.state.read().await.table.find(method, path, &Params::new())
    }

    /// The methods of all routes whose pattern matches `path`, in registration order.
    pub async fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let state = self.state.read().await;
        let mut methods = Vec::new();
        for route in state.table.iter() {
            if route.matcher().is_match(path) && !methods.contains(&route.method()) {
                methods.push(route.method());
            }
        }
        methods
    }

    /// Log the registered routes.
    pub async fn log_routes(&self) {
        let state = self.state.read().await;
        info!("Registered routes:");
        for route in state.table.iter() {
            info!("  {} {}", route.method(), route.full_path());
        }
    }

    /// A dispatcher over this router's routes.
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(Arc::clone(&self.state))
    }

    /// Merge `options` into the configuration and return the dispatch handler.
    ///
    /// `options` may be a `bool`, shorthand for the legacy flag. With the legacy flag
    /// set, the result is the legacy-convention dispatcher of `legacy_middleware`.
    pub async fn middleware(&self, options: impl Into<RouterOptions>) -> Result<Handler, Error> {
        let legacy = {
            let mut state = self.state.write().await;
            state.apply(&options.into())?;
            state.config.legacy
        };

        if legacy {
            return Ok(self.legacy_middleware());
        }
        Ok(self.dispatcher().into())
    }

    /// The dispatcher adapted to the legacy calling convention.
    pub fn legacy_middleware(&self) -> Handler {
        let modern: Handler = self.dispatcher().into();
        Handler::Legacy(modern.into_legacy())
    }
}

fn build_route(
    config: &RouterConfig,
    method_spec: &str,
    route: RouteSpec,
    handlers: Vec<Handler>,
) -> Result<Route, Error> {
    if method_spec.trim().is_empty() {
        return Err(Error::InvalidArgument("method spec must not be empty".to_string()));
    }

    let (verb, inline_pattern) = match method_spec.split_once(' ') {
        Some((verb, pattern)) => (verb.trim(), Some(pattern.trim()).filter(|p| !p.is_empty())),
        None => (method_spec.trim(), None),
    };
    let method = if verb.is_empty() {
        Method::default()
    } else {
        verb.parse()?
    };

    let (pattern, mut chain) = match route {
        RouteSpec::Path(pattern) => (pattern, Vec::new()),
        RouteSpec::Handlers(leading) => match inline_pattern {
            Some(pattern) => (pattern.to_string(), leading),
            None => {
                return Err(Error::InvalidArgument(format!(
                    "no path pattern given for {method_spec:?}"
                )))
            }
        },
    };
    chain.extend(handlers);

    Route::new(method, pattern, chain, &config.prefix, &config.matching)
}

macro_rules! verb_methods {
    ($($(#[$attr:meta])* $name:ident => $method:ident),* $(,)?) => {
        impl Router {
            $(
                $(#[$attr])*
                pub async fn $name(
                    &self,
                    route: impl Into<RouteSpec>,
                    handlers: Vec<Handler>,
                ) -> Result<&Self, Error> {
                    self.add_route(Method::$method.as_str(), route, handlers).await
                }
            )*
        }
    };
}

verb_methods! {
    /// Register a `GET` route.
    get => GET,
    /// Register a `POST` route.
    post => POST,
    /// Register a `PUT` route.
    put => PUT,
    /// Register a `DELETE` route.
    delete => DELETE,
    /// Register a `DELETE` route. Alias of `delete`.
    del => DELETE,
    /// Register a `PATCH` route.
    patch => PATCH,
    /// Register a `HEAD` route.
    head => HEAD,
    /// Register an `OPTIONS` route.
    options => OPTIONS,
    /// Register a `TRACE` route.
    trace => TRACE,
    /// Register a `CONNECT` route.
    connect => CONNECT,
}
