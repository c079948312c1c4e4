//! Error types for the digest job service.
//!
//! This module defines the central `Error` enum, which captures every
//! recoverable and reportable failure of the core. Nothing here is fatal to the
//! process: each error is returned synchronously to the immediate caller.
//!
//! ## Error Cases
//! - `Validation`: The submitted input exceeded the configured length.
//! - `QueueClosed`: A job arrived after the worker pool started shutting down.
//! - `InvalidConfig`: A pool or service was configured with unusable values.
//! - `Worker`: A worker task terminated abnormally (e.g. its handler panicked).
//!
//! Looking up an unknown identifier is *not* an error; see
//! [`Lookup::NotFound`](crate::Lookup::NotFound).

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the digest job service.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// The input was rejected before any state was mutated.
    #[error("Invalid input: {reason}")]
    Validation { reason: String },

    /// The job queue no longer accepts work.
    #[error("Job queue is closed")]
    QueueClosed,

    /// A configuration value was out of range.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A worker task failed while the pool was being joined.
    #[error("Worker error: {context}")]
    Worker { context: String },
}
