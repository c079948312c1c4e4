use crate::JobId;
use core::future::Future;

/// Work executed by a [`WorkerPool`](crate::WorkerPool) for every dequeued
/// job.
///
/// The pool awaits `handle` to completion before the worker pulls its next
/// job. There is no per-job timeout: a handler that never finishes stalls the
/// worker running it.
pub trait JobHandler: Send + Sync + 'static {
    fn handle(&self, id: JobId) -> impl Future<Output = ()> + Send;
}

/// [`JobHandler`] backed by an async closure. Created by [`handler_fn`].
#[derive(Clone, Copy, Debug)]
pub struct HandlerFn<F> {
    f: F,
}

/// Wraps `f` so it can be used as a [`JobHandler`].
///
/// # Example
/// ```
/// use pwdhash::{JobId, handler_fn};
///
/// let handler = handler_fn(|id: JobId| async move {
///     println!("processing {id}");
/// });
/// # let _ = handler;
/// ```
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(JobId) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send,
{
    HandlerFn { f }
}

impl<F, Fut> JobHandler for HandlerFn<F>
where
    F: Fn(JobId) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send,
{
    fn handle(&self, id: JobId) -> impl Future<Output = ()> + Send {
        (self.f)(id)
    }
}
