use serde_json::Value as JsonValue;
use thiserror::Error;

use labelsync_core::DocumentRef;
use std::sync::Arc;

/// Stored document body: a schemaless field map.
pub type Document = serde_json::Map<String, JsonValue>;

/// Overwrite of a single top-level field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldUpdate {
    pub path: String,
    pub value: JsonValue,
}

impl FieldUpdate {
    pub fn new(path: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
        }
    }
}

/// A single write staged in a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Create a document; fails if it already exists.
    Create { doc_ref: DocumentRef, fields: Document },
    /// Overwrite the given fields; fails if the document does not exist.
    Update {
        doc_ref: DocumentRef,
        updates: Vec<FieldUpdate>,
    },
    /// Delete a document. With `must_exist`, fails if it is already gone.
    Delete { doc_ref: DocumentRef, must_exist: bool },
}

/// Document store operation error.
///
/// These are **infrastructure errors** (missing documents at write time,
/// batch limits, availability) as opposed to label domain errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("document {0} not found")]
    NotFound(DocumentRef),

    #[error("document {0} already exists")]
    AlreadyExists(DocumentRef),

    #[error("batch of {ops} operations exceeds the store limit of {max}")]
    BatchTooLarge { ops: usize, max: usize },

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Schemaless document store addressed by collection + id.
///
/// ## Commit Semantics
///
/// `commit()` applies every staged operation or none of them. It is not a
/// serializable transaction over earlier reads: callers that read, compute a
/// new field value and overwrite it race with concurrent writers
/// (last writer wins).
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a document. `Ok(None)` when it does not exist.
    async fn get(&self, doc_ref: &DocumentRef) -> Result<Option<Document>, StoreError>;

    /// Atomically apply a batch of writes.
    async fn commit(&self, ops: Vec<WriteOp>) -> Result<(), StoreError>;

    /// Maximum number of operations accepted by a single `commit`.
    fn max_batch_ops(&self) -> usize;
}

#[async_trait::async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn get(&self, doc_ref: &DocumentRef) -> Result<Option<Document>, StoreError> {
        (**self).get(doc_ref).await
    }

    async fn commit(&self, ops: Vec<WriteOp>) -> Result<(), StoreError> {
        (**self).commit(ops).await
    }

    fn max_batch_ops(&self) -> usize {
        (**self).max_batch_ops()
    }
}
