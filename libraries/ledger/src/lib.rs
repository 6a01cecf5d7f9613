//! This is a client library for a hosted document database of the kind community
//! apps are built on: documents are JSON field maps living at
//! collection/id/collection/id... paths, and all consistency is the backend's
//! problem, not ours.
//!
//! What the backend guarantees (and what we lean on):
//! 1. Point reads and namespace listings are plain snapshots.
//! 2. A [`model::WriteBatch`] commits atomically: every op applies, or none do.
//! 3. Numeric fields can be adjusted with an increment transform, so counters
//!    never go through a read-modify-write on the client.
//!
//! Backends live behind the [`DocumentStore`] trait. [`memory::MemoryStore`] is
//! the single-threaded reference backend used by tests; the `rest` feature adds
//! an HTTP backend for the hosted service.

pub mod memory;
pub mod model;

#[cfg(feature = "rest")]
pub mod rest;

use model::{CollectionPath, DocPath, Document, WriteBatch};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend rejected or failed the operation.
    #[error("backend error: {0}")]
    Backend(String),
    /// A batch op's precondition did not hold (e.g. incrementing a document
    /// that does not exist). The whole batch is discarded.
    #[error("failed precondition: {0}")]
    FailedPrecondition(String),
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
    #[cfg(feature = "rest")]
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// The store contract the sync layer is written against.
///
/// Absence of a document is `Ok(None)`, never an error; callers decide whether
/// a missing document is an empty render or a bug.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    async fn get_doc(&self, path: &DocPath) -> Result<Option<Document>, StoreError>;

    /// Every document directly under `collection`, in id order. Documents in
    /// nested subcollections are not included.
    async fn list_collection(
        &self,
        collection: &CollectionPath,
    ) -> Result<Vec<Document>, StoreError>;

    /// Apply `batch` atomically.
    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}
