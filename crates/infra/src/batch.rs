//! Threshold-bounded write batches.
//!
//! Callers declare up front how many operations a logical operation will
//! stage. Staging beyond that threshold fails immediately; nothing is ever
//! split into several physical batches. A failed commit must be retried by
//! redoing the whole logical operation against fresh reads, not by
//! resubmitting the same operations.

use thiserror::Error;
use tracing::debug;

use labelsync_core::DocumentRef;

use crate::document_store::{Document, DocumentStore, FieldUpdate, StoreError, WriteOp};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// The declared threshold is larger than one physical batch can hold.
    #[error("requested batch of {requested} operations exceeds capacity {capacity}")]
    ThresholdExceedsCapacity { requested: usize, capacity: usize },

    /// More operations were staged than the batch was sized for.
    #[error("batch sized for {threshold} operations is full")]
    CapacityExceeded { threshold: usize },

    #[error("batch commit failed: {0}")]
    Commit(#[from] StoreError),
}

/// Hands out write batches bound to one store.
#[derive(Debug, Clone)]
pub struct BatchProvider<S> {
    store: S,
    capacity: usize,
}

impl<S> BatchProvider<S>
where
    S: DocumentStore + Clone,
{
    /// `capacity` is clamped to the store's own per-batch ceiling.
    pub fn new(store: S, capacity: usize) -> Self {
        let capacity = capacity.min(store.max_batch_ops());
        Self { store, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Open a batch sized for exactly `estimated_ops` operations.
    pub fn provide_with_threshold(&self, estimated_ops: usize) -> Result<WriteBatch<S>, BatchError> {
        if estimated_ops > self.capacity {
            return Err(BatchError::ThresholdExceedsCapacity {
                requested: estimated_ops,
                capacity: self.capacity,
            });
        }

        Ok(WriteBatch {
            store: self.store.clone(),
            threshold: estimated_ops,
            ops: Vec::with_capacity(estimated_ops),
        })
    }
}

/// Staged write operations plus the declared capacity.
///
/// Built entirely in memory; the only IO happens in `commit`.
#[derive(Debug)]
pub struct WriteBatch<S> {
    store: S,
    threshold: usize,
    ops: Vec<WriteOp>,
}

impl<S> WriteBatch<S>
where
    S: DocumentStore,
{
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn create(&mut self, doc_ref: DocumentRef, fields: Document) -> Result<(), BatchError> {
        self.push(WriteOp::Create { doc_ref, fields })
    }

    pub fn update(&mut self, doc_ref: DocumentRef, updates: Vec<FieldUpdate>) -> Result<(), BatchError> {
        self.push(WriteOp::Update { doc_ref, updates })
    }

    pub fn delete(&mut self, doc_ref: DocumentRef) -> Result<(), BatchError> {
        self.push(WriteOp::Delete {
            doc_ref,
            must_exist: false,
        })
    }

    /// Delete that fails the whole commit if the document is already gone.
    pub fn delete_existing(&mut self, doc_ref: DocumentRef) -> Result<(), BatchError> {
        self.push(WriteOp::Delete {
            doc_ref,
            must_exist: true,
        })
    }

    /// Flush every staged operation as one atomic request.
    ///
    /// Returns the number of operations applied. An empty batch commits
    /// nothing and never reaches the store.
    pub async fn commit(self) -> Result<usize, BatchError> {
        let n = self.ops.len();
        if n == 0 {
            return Ok(0);
        }

        debug!(ops = n, threshold = self.threshold, "committing batch");
        self.store.commit(self.ops).await?;
        Ok(n)
    }

    fn push(&mut self, op: WriteOp) -> Result<(), BatchError> {
        if self.ops.len() >= self.threshold {
            return Err(BatchError::CapacityExceeded {
                threshold: self.threshold,
            });
        }
        self.ops.push(op);
        Ok(())
    }
}
