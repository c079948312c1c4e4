//! Concurrency-safe storage for submitted inputs and their digests.
//!
//! [`EntryStore`] maps a [`JobId`] to an [`Entry`]. The map is sharded, so
//! writers to different identifiers rarely contend, while reads and writes of
//! the same identifier are serialized by the shard lock. Callers only ever
//! receive clones; no reference into the map escapes.

use crate::{Error, JobId, Result};
use dashmap::DashMap;

/// A submitted input and, once a worker has processed it, its digest.
///
/// `digest` moves from `None` to `Some` exactly once and never changes
/// afterwards. The default (empty) entry is what [`EntryStore::get`] returns
/// for unknown identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    /// The input exactly as it was submitted.
    pub input: String,
    /// The digest of `input`, or `None` while the job is pending.
    pub digest: Option<String>,
}

impl Entry {
    /// Creates a pending entry for `input`.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            digest: None,
        }
    }

    /// Returns `true` once the digest has been attached.
    pub const fn is_ready(&self) -> bool {
        self.digest.is_some()
    }

    /// Returns `true` if both fields are empty.
    ///
    /// An empty entry is indistinguishable from an identifier that was never
    /// submitted.
    pub fn is_empty(&self) -> bool {
        self.input.is_empty() && self.digest.is_none()
    }
}

/// Sharded map of identifiers to [`Entry`] values, with input validation.
#[derive(Debug)]
pub struct EntryStore {
    entries: DashMap<JobId, Entry>,
    max_input_len: usize,
}

impl EntryStore {
    /// Creates an empty store that accepts inputs of at most `max_input_len`
    /// characters.
    pub fn new(max_input_len: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_input_len,
        }
    }

    /// Maximum accepted input length, in characters.
    pub const fn max_input_len(&self) -> usize {
        self.max_input_len
    }

    /// Stores `entry` under `id`, replacing whatever was there.
    pub fn put(&self, id: JobId, entry: Entry) {
        self.entries.insert(id, entry);
    }

    /// Returns a copy of the entry for `id`, or [`Entry::default`] if there is
    /// none.
    pub fn get(&self, id: JobId) -> Entry {
        self.try_get(id).unwrap_or_default()
    }

    /// Returns a copy of the entry for `id`, or `None` if `id` was never
    /// stored.
    pub fn try_get(&self, id: JobId) -> Option<Entry> {
        self.entries.get(&id).map(|entry| entry.value().clone())
    }

    /// Returns `true` if an entry is stored under `id`, even an empty one.
    pub fn contains(&self, id: JobId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Attaches `digest` to the pending entry stored under `id`.
    ///
    /// Returns `false` and leaves the store untouched if `id` is unknown or
    /// already carries a digest.
    pub fn attach_digest(&self, id: JobId, digest: String) -> bool {
        match self.entries.get_mut(&id) {
            Some(mut entry) if entry.digest.is_none() => {
                entry.digest = Some(digest);
                true
            }
            _ => false,
        }
    }

    /// Drops the entry for a submission that was never enqueued.
    pub(crate) fn remove(&self, id: JobId) {
        self.entries.remove(&id);
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks that `input` is at most [`max_input_len`](Self::max_input_len)
    /// characters long.
    ///
    /// Length is measured in Unicode scalar values, not bytes, so short inputs
    /// with multi-byte characters are not rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the input is too long.
    pub fn validate(&self, input: &str) -> Result<()> {
        let len = input.chars().count();
        if len > self.max_input_len {
            return Err(Error::Validation {
                reason: format!(
                    "input length {len} exceeds maximum of {} characters",
                    self.max_input_len
                ),
            });
        }
        Ok(())
    }
}
