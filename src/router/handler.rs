//! Route handlers and calling-convention adapters.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::router::chain::Next;
use crate::router::context::Context;
use crate::router::error::Error;

/// Type alias for a boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What a handler hands back: the context, or the failure that stopped the chain.
pub type HandlerResult = Result<Context, Error>;

/// Type alias for the future returned by a canonical handler.
pub type HandlerFuture = BoxFuture<'static, HandlerResult>;

/// The canonical handler: takes the context and the continuation, returns the context.
pub type HandlerFn = Arc<dyn Fn(Context, Next) -> HandlerFuture + Send + Sync>;

/// The legacy handler: mutates the context in place and reports whether to proceed.
pub type LegacyFn =
    Arc<dyn for<'a> Fn(&'a mut Context) -> BoxFuture<'a, Result<Flow, Error>> + Send + Sync>;

/// Outcome of a legacy handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Proceed to the next handler.
    Next,
    /// Stop here; later handlers do not run.
    Halt,
}

/// A handler in either calling convention.
///
/// Routes convert every handler to the canonical convention once, at registration.
#[derive(Clone)]
pub enum Handler {
    Modern(HandlerFn),
    Legacy(LegacyFn),
}

impl Handler {
    /// Create a canonical handler from an async function or closure.
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(Context, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let handler: HandlerFn =
            Arc::new(move |ctx: Context, next: Next| -> HandlerFuture { Box::pin(handler(ctx, next)) });
        Handler::Modern(handler)
    }

    /// Create a legacy handler.
    ///
    /// ```
    /// use microroute::{Flow, Handler, RouterError};
    ///
    /// let handler = Handler::legacy(|ctx| {
    ///     Box::pin(async move {
    ///         ctx.status = Some(204);
    ///         Ok::<_, RouterError>(Flow::Halt)
    ///     })
    /// });
    /// assert!(handler.is_legacy());
    /// ```
    pub fn legacy<F>(handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, Result<Flow, Error>> + Send + Sync + 'static,
    {
        Handler::Legacy(Arc::new(handler))
    }

    /// Whether this handler uses the legacy convention.
    pub fn is_legacy(&self) -> bool {
        matches!(self, Handler::Legacy(_))
    }

    /// Convert to the canonical convention. Canonical handlers pass through unchanged.
    pub fn into_modern(self) -> HandlerFn {
        match self {
            Handler::Modern(handler) => handler,
            Handler::Legacy(handler) => legacy_to_modern(handler),
        }
    }

    /// Convert to the legacy convention. Legacy handlers pass through unchanged.
    pub fn into_legacy(self) -> LegacyFn {
        match self {
            Handler::Modern(handler) => modern_to_legacy(handler),
            Handler::Legacy(handler) => handler,
        }
    }

    /// Invoke the handler in the canonical convention.
    pub async fn call(&self, ctx: Context, next: Next) -> HandlerResult {
        let handler = self.clone().into_modern();
        handler(ctx, next).await
    }
}

impl From<HandlerFn> for Handler {
    fn from(handler: HandlerFn) -> Self {
        Handler::Modern(handler)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Modern(_) => f.write_str("Handler::Modern"),
            Handler::Legacy(_) => f.write_str("Handler::Legacy"),
        }
    }
}

fn legacy_to_modern(legacy: LegacyFn) -> HandlerFn {
    Arc::new(move |mut ctx: Context, next: Next| -> HandlerFuture {
        let legacy = Arc::clone(&legacy);
        Box::pin(async move {
            match legacy(&mut ctx).await? {
                Flow::Next => next.run(ctx).await,
                Flow::Halt => Ok(ctx),
            }
        })
    })
}

/// The canonical handler runs on a context taken out of the borrowed slot and written
/// back on success. On failure the slot is restored to the context it held before the call.
fn modern_to_legacy(handler: HandlerFn) -> LegacyFn {
    legacy_fn(move |ctx| {
        let handler = Arc::clone(&handler);
        Box::pin(async move {
            let reached = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&reached);
            let next = Next::from_fn(move |ctx| async move {
                flag.store(true, Ordering::SeqCst);
                Ok::<_, Error>(ctx)
            });

            let snapshot = ctx.clone();
            match handler(std::mem::take(ctx), next).await {
                Ok(done) => *ctx = done,
                Err(err) => {
                    *ctx = snapshot;
                    return Err(err);
                }
            }

            let flow = if reached.load(Ordering::SeqCst) {
                Flow::Next
            } else {
                Flow::Halt
            };
            Ok::<_, Error>(flow)
        })
    })
}

fn legacy_fn<F>(handler: F) -> LegacyFn
where
    F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, Result<Flow, Error>> + Send + Sync + 'static,
{
    Arc::new(handler)
}
