//! Edit-permission checks for labelable objects.

use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::warn;

use labelsync_access::Access;
use labelsync_core::ObjectId;
use labelsync_labels::{ObjectType, fields};

use crate::document_store::{Document, DocumentStore, StoreError};
use crate::error::ServiceError;
use crate::object_refs::{AccessShape, ObjectReferenceResolver};

/// Decides whether a requester may edit an object, dispatching on the
/// object kind's access shape.
///
/// Only the object-mutation path consults this; label CRUD does not.
#[derive(Debug, Clone)]
pub struct PermissionResolver<S> {
    store: S,
    objects: Arc<ObjectReferenceResolver>,
}

impl<S> PermissionResolver<S>
where
    S: DocumentStore,
{
    pub fn new(store: S, objects: Arc<ObjectReferenceResolver>) -> Self {
        Self { store, objects }
    }

    /// - Shared kinds: decode `Access` from the document, `can_edit`.
    /// - Metrics: `owner == requester_email`.
    ///
    /// A missing document is a store `NotFound`; an undecodable access value
    /// or a missing owner denies.
    pub async fn check_edit_permission(
        &self,
        requester_email: &str,
        object_id: &ObjectId,
        object_type: ObjectType,
    ) -> Result<bool, ServiceError> {
        let kind = self.objects.kind(object_type)?;
        let doc_ref = kind.get_ref(object_id);

        let doc = self
            .store
            .get(&doc_ref)
            .await?
            .ok_or_else(|| StoreError::NotFound(doc_ref.clone()))?;

        let allowed = match kind.access() {
            AccessShape::Shared => match decode_access(doc) {
                Ok(access) => access.can_edit(requester_email),
                Err(e) => {
                    warn!(object = %doc_ref, error = %e, "undecodable access value; denying edit");
                    false
                }
            },
            AccessShape::OwnerField => {
                let owner = doc.get(fields::OWNER).and_then(JsonValue::as_str);
                !requester_email.is_empty() && owner == Some(requester_email)
            }
        };

        Ok(allowed)
    }
}

fn decode_access(doc: Document) -> Result<Access, serde_json::Error> {
    serde_json::from_value(JsonValue::Object(doc))
}
