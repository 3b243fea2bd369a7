//! Kind-keyed table of labelable objects.
//!
//! Every object kind contributes one entry: where its documents live (a
//! `RefSource`, normally the owning domain store's `get_ref`) and how its
//! documents express edit rights (`AccessShape`). Reference resolution and
//! permission checks both dispatch through this one table.

use std::collections::HashMap;
use std::sync::Arc;

use labelsync_core::{DocumentRef, ObjectId};
use labelsync_labels::{LabelError, ObjectType};

use crate::config::LabelsConfig;

/// How an object document records who may edit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessShape {
    /// Shared `Access` value (`collaborators` + `public`).
    Shared,
    /// Bare `owner` email field.
    OwnerField,
}

impl AccessShape {
    pub fn for_type(object_type: ObjectType) -> Self {
        match object_type {
            ObjectType::Metric => AccessShape::OwnerField,
            ObjectType::Alert
            | ObjectType::AttributionGroup
            | ObjectType::Attribution
            | ObjectType::Budget
            | ObjectType::Report => AccessShape::Shared,
        }
    }
}

/// Domain data-access contract: id to reference, no existence check.
///
/// A stale or mistyped id still resolves; the failure surfaces later as a
/// store `NotFound` when the document is read or written.
pub trait RefSource: Send + Sync {
    fn get_ref(&self, id: &ObjectId) -> DocumentRef;
}

/// `RefSource` for kinds stored in a single collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRefs {
    collection: String,
}

impl CollectionRefs {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
        }
    }
}

impl RefSource for CollectionRefs {
    fn get_ref(&self, id: &ObjectId) -> DocumentRef {
        DocumentRef::new(self.collection.clone(), id.as_str())
    }
}

#[derive(Clone)]
pub struct ObjectKind {
    refs: Arc<dyn RefSource>,
    access: AccessShape,
}

impl ObjectKind {
    pub fn new(refs: Arc<dyn RefSource>, access: AccessShape) -> Self {
        Self { refs, access }
    }

    pub fn get_ref(&self, id: &ObjectId) -> DocumentRef {
        self.refs.get_ref(id)
    }

    pub fn access(&self) -> AccessShape {
        self.access
    }
}

impl core::fmt::Debug for ObjectKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ObjectKind").field("access", &self.access).finish_non_exhaustive()
    }
}

/// Maps `(object id, object type)` to a document reference.
#[derive(Debug, Clone, Default)]
pub struct ObjectReferenceResolver {
    kinds: HashMap<ObjectType, ObjectKind>,
}

impl ObjectReferenceResolver {
    /// Empty table; every lookup fails until kinds are registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// One collection-backed entry per object type.
    pub fn from_config(config: &LabelsConfig) -> Self {
        ObjectType::ALL.into_iter().fold(Self::new(), |table, t| {
            table.register(
                t,
                ObjectKind::new(
                    Arc::new(CollectionRefs::new(config.object_collection(t))),
                    AccessShape::for_type(t),
                ),
            )
        })
    }

    /// Add or replace the entry for `object_type`.
    pub fn register(mut self, object_type: ObjectType, kind: ObjectKind) -> Self {
        self.kinds.insert(object_type, kind);
        self
    }

    /// Entry for `object_type`. A missing entry is a wiring error.
    pub fn kind(&self, object_type: ObjectType) -> Result<&ObjectKind, LabelError> {
        self.kinds
            .get(&object_type)
            .ok_or_else(|| LabelError::InvalidObjectType(object_type.to_string()))
    }

    pub fn resolve(&self, object_id: &ObjectId, object_type: ObjectType) -> Result<DocumentRef, LabelError> {
        Ok(self.kind(object_type)?.get_ref(object_id))
    }
}
