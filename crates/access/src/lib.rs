//! `labelsync-access`: the shared owner + collaborators permission model.
//!
//! Five of the six labelable object kinds store an `Access` value on their
//! document. This crate is decoupled from storage: it only decides, given a
//! decoded `Access`, whether a requester may edit.

pub mod access;
pub mod roles;

pub use access::{Access, Collaborator};
pub use roles::CollaboratorRole;
