use super::handler::JobHandler;
use crate::JobId;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc, oneshot};

/// Worker task responsible for draining the shared job queue.
///
/// All workers of a pool share one receiver. A worker holds the receiver lock
/// only while waiting for the next job, so an idle worker always picks up the
/// oldest queued job while busy workers keep running their handlers.
///
/// This function is designed to be spawned as a Tokio task and loops until the
/// queue is closed *and* empty.
///
/// # Arguments
///
/// - `worker_id`: Index of this worker (used for logs/tracing).
/// - `queue`: The receiving half of the pool's bounded job queue.
/// - `handler`: Invoked once per dequeued job.
/// - `ready`: Signalled as soon as the worker is live.
pub(crate) async fn worker_loop<H: JobHandler>(
    worker_id: usize,
    queue: Arc<Mutex<mpsc::Receiver<JobId>>>,
    handler: Arc<H>,
    ready: oneshot::Sender<()>,
) {
    tracing::trace!("Worker {worker_id} started");

    if ready.send(()).is_err() {
        tracing::debug!("Worker {worker_id} started after the pool stopped waiting");
    }

    loop {
        // The guard is released at the end of this statement, before the
        // handler runs.
        let job = queue.lock().await.recv().await;
        let Some(id) = job else {
            break;
        };

        tracing::trace!(worker_id, id, "Processing job");
        handler.handle(id).await;
    }

    tracing::trace!("Worker {worker_id} stopped");
}
