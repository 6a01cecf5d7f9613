//! # In-memory backend
//! The reference backend: a `BTreeMap` keyed by rendered path, single-threaded
//! behind a `RefCell`. Tests and local development run against it. Commit is
//! validate-then-apply so a failed batch leaves the table untouched, matching
//! the atomicity the hosted service provides.
//!
//! The store counts reads and writes and accepts an injected commit failure,
//! which is how the sync layer's "no partial application" behavior is
//! exercised without a network.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{CollectionPath, DocPath, Document, Fields, WriteBatch, WriteOp};
use crate::{DocumentStore, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    docs: RefCell<BTreeMap<String, Fields>>,
    reads: Cell<usize>,
    writes: Cell<usize>,
    fail_next_commit: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document directly, bypassing the batch machinery and counters.
    pub fn insert<T: Serialize>(&self, path: DocPath, value: &T) -> Result<(), StoreError> {
        let doc = Document::encode(path, value)?;
        self.docs
            .borrow_mut()
            .insert(doc.path().to_string(), doc.fields().clone());
        Ok(())
    }

    /// Make the next `commit` fail with `message` before applying anything.
    pub fn fail_next_commit(&self, message: impl Into<String>) {
        *self.fail_next_commit.borrow_mut() = Some(message.into());
    }

    pub fn read_count(&self) -> usize {
        self.reads.get()
    }

    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    pub fn contains(&self, path: &DocPath) -> bool {
        self.docs.borrow().contains_key(&path.to_string())
    }

    /// Peek at a single field, for assertions.
    pub fn field(&self, path: &DocPath, field: &str) -> Option<serde_json::Value> {
        self.docs
            .borrow()
            .get(&path.to_string())
            .and_then(|fields| fields.get(field).cloned())
    }

    pub fn len(&self) -> usize {
        self.docs.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.borrow().is_empty()
    }
}

impl DocumentStore for MemoryStore {
    async fn get_doc(&self, path: &DocPath) -> Result<Option<Document>, StoreError> {
        self.reads.set(self.reads.get() + 1);
        Ok(self
            .docs
            .borrow()
            .get(&path.to_string())
            .map(|fields| Document::new(path.clone(), fields.clone())))
    }

    async fn list_collection(
        &self,
        collection: &CollectionPath,
    ) -> Result<Vec<Document>, StoreError> {
        self.reads.set(self.reads.get() + 1);
        let prefix = format!("{collection}/");
        let docs = self.docs.borrow();
        let mut out = Vec::new();
        for (key, fields) in docs.range(prefix.clone()..) {
            let Some(rest) = key.strip_prefix(&prefix) else {
                break; // BTreeMap range: past the prefix, nothing else matches
            };
            if rest.contains('/') {
                continue; // a document in a nested subcollection
            }
            out.push(Document::new(DocPath::parse(key)?, fields.clone()));
        }
        Ok(out)
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        self.writes.set(self.writes.get() + 1);
        if let Some(message) = self.fail_next_commit.borrow_mut().take() {
            return Err(StoreError::Backend(message));
        }

        let mut docs = self.docs.borrow_mut();

        // Validate every op before applying any.
        for op in batch.ops() {
            let WriteOp::Increment { path, field, .. } = op else {
                continue;
            };
            let Some(fields) = docs.get(&path.to_string()) else {
                return Err(StoreError::FailedPrecondition(format!(
                    "increment on missing document {path}"
                )));
            };
            match fields.get(field) {
                Some(value) if value.is_i64() => {}
                Some(_) => {
                    return Err(StoreError::FailedPrecondition(format!(
                        "increment on non-integer field {field:?} of {path}"
                    )));
                }
                None => {
                    return Err(StoreError::FailedPrecondition(format!(
                        "increment on missing field {field:?} of {path}"
                    )));
                }
            }
        }

        for op in batch.into_ops() {
            match op {
                WriteOp::Set { path, fields } => {
                    docs.insert(path.to_string(), fields);
                }
                WriteOp::Delete { path } => {
                    docs.remove(&path.to_string());
                }
                WriteOp::Increment { path, field, delta } => {
                    let fields = docs
                        .get_mut(&path.to_string())
                        .expect("increment target validated above");
                    let value = fields
                        .get_mut(&field)
                        .expect("increment field validated above");
                    let current = value.as_i64().expect("increment field validated above");
                    *value = serde_json::Value::from(current + delta);
                }
            }
        }
        Ok(())
    }
}
