//! Infrastructure layer: document store boundary, batched writes and the
//! label services that keep `Label.objects` and `Object.labels` consistent.

pub mod assignment;
pub mod batch;
pub mod config;
pub mod document_store;
pub mod error;
pub mod label_store;
pub mod object_refs;
pub mod permissions;
pub mod service;


pub use assignment::AssignmentEngine;
pub use batch::{BatchError, BatchProvider, WriteBatch};
pub use config::LabelsConfig;
pub use document_store::{
    Document, DocumentStore, FieldUpdate, InMemoryDocumentStore, StoreError, WriteOp,
};
pub use error::ServiceError;
pub use label_store::LabelStore;
pub use object_refs::{AccessShape, CollectionRefs, ObjectKind, ObjectReferenceResolver, RefSource};
pub use permissions::PermissionResolver;
pub use service::LabelsService;
