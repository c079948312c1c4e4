#![doc = include_str!("../README.md")]

mod digest;
mod error;
mod pool;
mod service;
mod stats;
mod store;

pub use crate::digest::*;
pub use crate::error::*;
pub use crate::pool::*;
pub use crate::service::*;
pub use crate::stats::*;
pub use crate::store::*;

/// Identifier issued for every accepted submission.
///
/// Identifiers start at `1`; `0` is never issued.
pub type JobId = u64;
