//! `labelsync-core`: storage-agnostic building blocks.
//!
//! Identifiers, document references and the domain error model shared by
//! every other crate. No IO lives here.

pub mod error;
pub mod id;
pub mod reference;

pub use error::DomainError;
pub use id::{CustomerId, LabelId, ObjectId};
pub use reference::DocumentRef;
