//! Request orchestration on top of the store, the digest and the worker pool.
//!
//! [`HashService`] is the only entry point an outer layer (HTTP, CLI, tests)
//! needs. It exposes four operations:
//!
//! - [`submit`](HashService::submit): validate, store, enqueue and return the
//!   new identifier without waiting for the digest.
//! - [`lookup`](HashService::lookup): report the [`Lookup`] state of an
//!   identifier.
//! - [`stats`](HashService::stats): read the aggregate counters.
//! - [`shutdown`](HashService::shutdown): drain the pool.

use crate::{
    Entry, EntryStore, JobHandler, JobId, PoolConfig, Result, Stats, StatsSnapshot, WorkerPool,
    digest,
};
use core::{future::Future, time::Duration};
use portable_atomic::{AtomicU64, Ordering};
use std::{sync::Arc, time::Instant};
use tracing::Instrument;

/// Runtime settings for a [`HashService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Number of worker tasks computing digests.
    pub num_workers: usize,
    /// Capacity of the job queue; submissions wait once it is full.
    pub queue_capacity: usize,
    /// Maximum accepted input length, in characters.
    pub max_input_len: usize,
    /// Artificial delay applied to every job before its digest is computed.
    pub job_delay: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            num_workers: 100,
            queue_capacity: 1000,
            max_input_len: 64,
            job_delay: Duration::from_secs(5),
        }
    }
}

/// Outcome of [`HashService::lookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The digest has been computed.
    Ready(String),
    /// The identifier is known but its job has not completed yet.
    NotReady,
    /// The identifier was never issued.
    NotFound,
}

/// The job run by every worker: wait, digest the stored input, attach it.
struct DigestJob {
    store: Arc<EntryStore>,
    stats: Arc<Stats>,
    delay: Duration,
}

impl JobHandler for DigestJob {
    fn handle(&self, id: JobId) -> impl Future<Output = ()> + Send {
        async move {
            let start = Instant::now();
            tokio::time::sleep(self.delay).await;

            // Read the input at processing time rather than carrying it in
            // the queue.
            let entry = self.store.get(id);
            let digest = digest(&entry.input);
            if self.store.attach_digest(id, digest) {
                tracing::debug!(id, "Digest attached");
            } else {
                tracing::warn!(id, "Job had no pending entry");
            }

            self.stats.record_completion(start.elapsed());
        }
        .instrument(tracing::debug_span!("digest_job", id))
    }
}

/// Accepts inputs, hands out identifiers and serves digests once computed.
///
/// Cloning is cheap; all clones share the same store, counters and pool.
#[derive(Clone)]
pub struct HashService {
    config: ServiceConfig,
    store: Arc<EntryStore>,
    stats: Arc<Stats>,
    pool: Arc<WorkerPool<DigestJob>>,
    next_id: Arc<AtomicU64>,
}

impl HashService {
    /// Creates the service and starts its worker pool.
    ///
    /// Returns once every worker is live.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`](crate::Error::InvalidConfig) if the
    /// worker count or queue capacity is zero.
    pub async fn start(config: ServiceConfig) -> Result<Self> {
        let store = Arc::new(EntryStore::new(config.max_input_len));
        let stats = Arc::new(Stats::new());
        let job = DigestJob {
            store: Arc::clone(&store),
            stats: Arc::clone(&stats),
            delay: config.job_delay,
        };
        let pool = WorkerPool::new(
            PoolConfig {
                num_workers: config.num_workers,
                queue_capacity: config.queue_capacity,
            },
            job,
        )?;
        pool.start().await;

        Ok(Self {
            config,
            store,
            stats,
            pool: Arc::new(pool),
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Submits `input` for hashing and returns its identifier.
    ///
    /// The call returns as soon as the job is queued; it only waits when the
    /// queue is full. Identifiers are strictly increasing.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`](crate::Error::Validation) if `input` is too
    ///   long. No identifier is consumed and nothing is stored.
    /// - [`Error::QueueClosed`](crate::Error::QueueClosed) once
    ///   [`shutdown`](Self::shutdown) has begun. Nothing is stored.
    pub async fn submit(&self, input: &str) -> Result<JobId> {
        if let Err(err) = self.store.validate(input) {
            tracing::info!("Rejecting input: {err}");
            return Err(err);
        }
        if !self.pool.is_accepting() {
            return Err(crate::Error::QueueClosed);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.store.put(id, Entry::new(input));

        if let Err(err) = self.pool.add_job(id).await {
            // Lost the race against shutdown.
            self.store.remove(id);
            return Err(err);
        }

        self.stats.record_submission();
        tracing::debug!(id, "Job queued");
        Ok(id)
    }

    /// Returns the state of the job identified by `id`.
    pub fn lookup(&self, id: JobId) -> Lookup {
        match self.store.try_get(id) {
            Some(Entry {
                digest: Some(digest),
                ..
            }) => Lookup::Ready(digest),
            Some(_) => Lookup::NotReady,
            None => Lookup::NotFound,
        }
    }

    /// Returns the submission count and mean processing time.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Refuses new submissions, waits for every queued job to finish and stops
    /// the workers.
    ///
    /// Safe to call more than once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Worker`](crate::Error::Worker) if a worker panicked.
    pub async fn shutdown(&self) -> Result<()> {
        self.pool.stop().await
    }
}
