//! # Write batches
//! A batch is an ordered list of writes the backend applies atomically. The
//! client never sees a partially applied batch: on failure the remote state is
//! exactly what it was before the commit, which is what lets the sync layer
//! hold local mutations back until the commit resolves.

use serde::Serialize;

use crate::StoreError;
use crate::model::{DocPath, Document, Fields};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum WriteOp {
    /// Create or replace the document at `path`.
    Set { path: DocPath, fields: Fields },
    /// Delete the document at `path`. Deleting an absent document is a no-op.
    Delete { path: DocPath },
    /// Adjust an integer field by `delta` without a client-side
    /// read-modify-write. The document must exist and the field must be an
    /// integer; otherwise the whole batch fails.
    Increment {
        path: DocPath,
        field: String,
        delta: i64,
    },
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<T: Serialize>(&mut self, path: DocPath, value: &T) -> Result<&mut Self, StoreError> {
        let doc = Document::encode(path, value)?;
        let (path, fields) = (doc.path().clone(), doc.fields().clone());
        self.ops.push(WriteOp::Set { path, fields });
        Ok(self)
    }

    pub fn delete(&mut self, path: DocPath) -> &mut Self {
        self.ops.push(WriteOp::Delete { path });
        self
    }

    pub fn increment(&mut self, path: DocPath, field: impl Into<String>, delta: i64) -> &mut Self {
        self.ops.push(WriteOp::Increment {
            path,
            field: field.into(),
            delta,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}
