//! Document store boundary.
//!
//! This module defines the store abstraction the label services are written
//! against: point reads by reference and atomic multi-operation batch
//! commits bounded by a per-batch operation ceiling. There is no general
//! cross-document transaction; the batch is the only atomicity boundary.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryDocumentStore;
pub use r#trait::{Document, DocumentStore, FieldUpdate, StoreError, WriteOp};

/// Default per-batch operation ceiling of the production store.
pub const DEFAULT_MAX_BATCH_OPS: usize = 500;
