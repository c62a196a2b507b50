//! Handler chain composition.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::router::context::Context;
use crate::router::error::Error;
use crate::router::handler::{HandlerFn, HandlerFuture, HandlerResult};

type Tail = Box<dyn FnOnce(Context) -> HandlerFuture + Send>;

/// The continuation handed to a handler.
///
/// `run` invokes the next handler of the chain, or the tail continuation once the
/// chain is exhausted. It consumes `self`, so a handler can proceed at most once.
pub struct Next {
    chain: Arc<[HandlerFn]>,
    index: usize,
    tail: Option<Tail>,
}

impl Next {
    /// A terminal continuation that hands the context straight back.
    pub fn end() -> Self {
        Self {
            chain: Arc::new([]),
            index: 0,
            tail: None,
        }
    }

    /// A continuation backed by a function, typically the next stage of a host pipeline.
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(Context) -> Fut + Send + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self {
            chain: Arc::new([]),
            index: 0,
            tail: Some(Box::new(move |ctx: Context| -> HandlerFuture { Box::pin(f(ctx)) })),
        }
    }

    /// Pass control onwards.
    pub fn run(mut self, ctx: Context) -> HandlerFuture {
        if let Some(handler) = self.chain.get(self.index).cloned() {
            self.index += 1;
            return handler(ctx, self);
        }

        match self.tail.take() {
            Some(tail) => tail(ctx),
            None => Box::pin(async move { Ok::<_, Error>(ctx) }),
        }
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("remaining", &(self.chain.len() - self.index))
            .field("has_tail", &self.tail.is_some())
            .finish()
    }
}

/// Compose handlers into one handler that runs them strictly in order.
///
/// Each handler proceeds by calling `next.run(ctx)`; the continuation passed to the
/// composed handler runs after the last one. The first error short-circuits the rest.
pub fn compose(handlers: Vec<HandlerFn>) -> HandlerFn {
    let chain: Arc<[HandlerFn]> = handlers.into();
    Arc::new(move |ctx: Context, next: Next| -> HandlerFuture {
        let next = Next {
            chain: Arc::clone(&chain),
            index: 0,
            tail: Some(Box::new(move |ctx: Context| -> HandlerFuture { next.run(ctx) })),
        };
        next.run(ctx)
    })
}
