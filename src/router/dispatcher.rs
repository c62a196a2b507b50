//! Request dispatch over a router's route table.

use std::sync::Arc;

use log::trace;
use tokio::sync::RwLock;

use crate::router::chain::Next;
use crate::router::context::Context;
use crate::router::handler::{Handler, HandlerFn, HandlerFuture, HandlerResult};
use crate::router::router::RouterState;

/// Matches requests against a router's routes and runs the matched chain.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    state: Arc<RwLock<RouterState>>,
}

impl Dispatcher {
    pub(crate) fn new(state: Arc<RwLock<RouterState>>) -> Self {
        Self { state }
    }

    /// Dispatch a request.
    ///
    /// The first route (in registration order) whose method and pattern match wins:
    /// its parameters and the route itself are written to `ctx`, its chain runs, and
    /// on success `next` runs. A failing chain returns its error and `next` is not
    /// called. When nothing matches, `ctx` is passed to `next` untouched.
    pub async fn dispatch(&self, mut ctx: Context, next: Next) -> HandlerResult {
        let found = {
            let state = self.state.read().await;
            state.table.find(ctx.method, &ctx.path, &ctx.params)
        };

        let Some((route, params)) = found else {
            trace!("No route for {} {}", ctx.method, ctx.path);
            return next.run(ctx).await;
        };

        ctx.params = params;
        ctx.route = Some(Arc::clone(&route));
        let ctx = route.invoke(ctx).await?;
        next.run(ctx).await
    }

    /// Wrap the dispatcher as a canonical handler, so it can be mounted into another chain.
    pub fn into_handler(self) -> HandlerFn {
        Arc::new(move |ctx: Context, next: Next| -> HandlerFuture {
            let dispatcher = self.clone();
            Box::pin(async move { dispatcher.dispatch(ctx, next).await })
        })
    }
}

impl From<Dispatcher> for Handler {
    fn from(dispatcher: Dispatcher) -> Self {
        Handler::Modern(dispatcher.into_handler())
    }
}
