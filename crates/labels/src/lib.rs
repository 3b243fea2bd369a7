//! Labels domain module.
//!
//! Labels are customer-scoped tags attached to six kinds of analytics
//! objects. This crate holds the label model, the object kinds, the boundary
//! request types and the pure reference-set arithmetic used to keep
//! `Label.objects` and `Object.labels` in sync. It performs no IO.

pub mod diff;
pub mod error;
pub mod label;
pub mod object;
pub mod request;

pub use error::{ErrorKind, LabelError};
pub use label::{Label, LabelColor, LabelDocument, LabelUpdate, NewLabel, fields};
pub use object::{ObjectTarget, ObjectType};
pub use request::{AssignLabelsRequest, CreateLabelRequest, UpdateLabelRequest};
