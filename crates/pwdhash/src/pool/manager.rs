//! Asynchronous worker pool draining a single bounded job queue.
//!
//! This module defines the [`WorkerPool`] struct, which manages a fixed set of
//! asynchronous workers that consume job identifiers from one shared,
//! bounded [`mpsc`] queue. Idle workers pull the next job as soon as they are
//! free; no job is pinned to a particular worker.
//!
//! The pool moves through four [`PoolState`]s:
//!
//! ```text
//! Created --start()--> Running --stop()--> Stopping --(drained)--> Stopped
//! ```
//!
//! Shutdown is a barrier: [`WorkerPool::stop`] refuses new jobs, lets every
//! queued and in-flight job finish, joins all workers and only then returns.

use super::{handler::JobHandler, worker::worker_loop};
use crate::{Error, JobId, Result};
use futures::future::join_all;
use portable_atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::{
    sync::{Mutex, mpsc, oneshot},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

/// Lifecycle of a [`WorkerPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PoolState {
    /// Constructed; jobs are buffered but no worker runs yet.
    Created = 0,
    /// All workers are live and draining the queue.
    Running = 1,
    /// The queue is closed; remaining jobs are being drained.
    Stopping = 2,
    /// Every worker has exited.
    Stopped = 3,
}

impl PoolState {
    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Created,
            1 => Self::Running,
            2 => Self::Stopping,
            _ => Self::Stopped,
        }
    }
}

/// Sizing of a [`WorkerPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of worker tasks. Must be greater than zero.
    pub num_workers: usize,
    /// Number of jobs the queue buffers before `add_job` waits. Must be
    /// greater than zero.
    pub queue_capacity: usize,
}

/// A fixed-size pool of asynchronous workers sharing one bounded job queue.
///
/// Jobs are bare [`JobId`]s; the configured [`JobHandler`] is responsible for
/// fetching whatever payload it needs when the job runs.
pub struct WorkerPool<H> {
    config: PoolConfig,
    handler: Arc<H>,
    sender: parking_lot::Mutex<Option<mpsc::Sender<JobId>>>,
    receiver: Arc<Mutex<mpsc::Receiver<JobId>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    state: AtomicU8,
    shutdown_token: CancellationToken,
}

impl<H: JobHandler> WorkerPool<H> {
    /// Constructs a pool in the [`PoolState::Created`] state.
    ///
    /// The queue exists immediately, so jobs added before [`start`] are
    /// buffered (up to `queue_capacity`) and processed once workers run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `num_workers` or `queue_capacity`
    /// is zero.
    ///
    /// [`start`]: Self::start
    pub fn new(config: PoolConfig, handler: H) -> Result<Self> {
        if config.num_workers == 0 {
            return Err(Error::InvalidConfig {
                reason: "number of workers must be greater than 0".to_string(),
            });
        }
        if config.queue_capacity == 0 {
            return Err(Error::InvalidConfig {
                reason: "queue capacity must be greater than 0".to_string(),
            });
        }

        let (tx, rx) = mpsc::channel(config.queue_capacity);

        Ok(Self {
            config,
            handler: Arc::new(handler),
            sender: parking_lot::Mutex::new(Some(tx)),
            receiver: Arc::new(Mutex::new(rx)),
            workers: Mutex::new(Vec::with_capacity(config.num_workers)),
            state: AtomicU8::new(PoolState::Created as u8),
            shutdown_token: CancellationToken::new(),
        })
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> PoolState {
        PoolState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: PoolState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Returns `true` while [`add_job`](Self::add_job) can still accept jobs.
    pub fn is_accepting(&self) -> bool {
        !self.shutdown_token.is_cancelled()
    }

    pub const fn num_workers(&self) -> usize {
        self.config.num_workers
    }

    pub const fn queue_capacity(&self) -> usize {
        self.config.queue_capacity
    }

    /// Number of spawned workers that have not exited.
    #[cfg(test)]
    pub(super) async fn live_workers(&self) -> usize {
        self.workers
            .lock()
            .await
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Spawns the workers and waits until every one of them is live.
    ///
    /// Has no effect unless the pool is in [`PoolState::Created`].
    pub async fn start(&self) {
        let mut workers = self.workers.lock().await;
        if self.state() != PoolState::Created {
            return;
        }

        let mut ready = Vec::with_capacity(self.config.num_workers);
        for worker_id in 0..self.config.num_workers {
            let (ready_tx, ready_rx) = oneshot::channel();
            workers.push(tokio::spawn(worker_loop(
                worker_id,
                Arc::clone(&self.receiver),
                Arc::clone(&self.handler),
                ready_tx,
            )));
            ready.push(ready_rx);
        }

        // A worker that dies before signalling drops its sender; the join in
        // `stop` reports it.
        join_all(ready).await;

        self.set_state(PoolState::Running);
        tracing::info!(
            "All {} workers created, listening for jobs",
            self.config.num_workers
        );
    }

    /// Enqueues a job.
    ///
    /// Waits while the queue is full and returns once the job is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::QueueClosed`] if [`stop`](Self::stop) has been called.
    pub async fn add_job(&self, id: JobId) -> Result<()> {
        if self.shutdown_token.is_cancelled() {
            return Err(Error::QueueClosed);
        }

        let sender = self.sender.lock().clone().ok_or(Error::QueueClosed)?;
        sender.send(id).await.map_err(|_| Error::QueueClosed)
    }

    /// Gracefully shuts down the pool.
    ///
    /// - Cancels the shutdown token so new jobs are refused.
    /// - Drops the queue's sender; workers drain what is left and exit once
    ///   the queue is empty.
    /// - Joins every worker task.
    ///
    /// A pool that was never started is started first, so buffered jobs are
    /// still processed. Calling `stop` again, or concurrently, waits for the
    /// pool to reach [`PoolState::Stopped`] and returns `Ok(())`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Worker`] if any worker task panicked. All other
    /// workers are still joined first.
    pub async fn stop(&self) -> Result<()> {
        self.start().await;

        let mut workers = self.workers.lock().await;
        if self.state() == PoolState::Stopped {
            return Ok(());
        }

        // === Phase 1: Refuse new jobs ===
        tracing::info!("Refusing new jobs");
        self.set_state(PoolState::Stopping);
        self.shutdown_token.cancel();
        drop(self.sender.lock().take());

        // === Phase 2: Wait for the queue to drain and workers to exit ===
        tracing::debug!("Waiting for {} workers to drain the queue", workers.len());
        let results = join_all(workers.drain(..)).await;
        self.set_state(PoolState::Stopped);

        let failed = results.iter().filter(|res| res.is_err()).count();
        for err in results.into_iter().filter_map(|res| res.err()) {
            tracing::error!("Worker terminated abnormally: {err}");
        }
        if failed > 0 {
            return Err(Error::Worker {
                context: format!(
                    "{failed} of {} workers terminated abnormally",
                    self.config.num_workers
                ),
            });
        }

        tracing::info!("Worker pool shutdown complete");
        Ok(())
    }
}
