//! Bulk add/remove of labels across a set of objects.
//!
//! ## Flow
//!
//! 1. Resolve the add and remove label sets (any unknown id aborts).
//! 2. For every target object: resolve its reference, check the requester
//!    may edit it, read its `labels` and stage the recomputed list.
//! 3. For every touched label: stage the recomputed `objects` list.
//! 4. Commit everything as one batch.
//!
//! Nothing is written until step 4, so a permission denial or an unresolved
//! reference leaves the store untouched.
//!
//! ## Conflicts
//!
//! Removal is evaluated against the lists as read, then additions are
//! appended. A label present in both sets therefore stays attached on both
//! sides. Concurrent calls touching the same label or object race; the
//! later commit overwrites the whole field (last writer wins).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use labelsync_core::{DocumentRef, LabelId};
use labelsync_labels::diff;
use labelsync_labels::{AssignLabelsRequest, Label, LabelError, fields};

use crate::document_store::DocumentStore;
use crate::error::ServiceError;
use crate::label_store::{LabelStore, refs_update};
use crate::object_refs::ObjectReferenceResolver;
use crate::permissions::PermissionResolver;

#[derive(Debug, Clone)]
pub struct AssignmentEngine<S> {
    labels: LabelStore<S>,
    objects: Arc<ObjectReferenceResolver>,
    permissions: PermissionResolver<S>,
}

impl<S> AssignmentEngine<S>
where
    S: DocumentStore + Clone,
{
    pub fn new(labels: LabelStore<S>, objects: Arc<ObjectReferenceResolver>, permissions: PermissionResolver<S>) -> Self {
        Self {
            labels,
            objects,
            permissions,
        }
    }

    /// Apply `request` on behalf of `requester_email`.
    ///
    /// The request is expected to have passed `AssignLabelsRequest::validate`.
    pub async fn assign_labels(&self, requester_email: &str, request: &AssignLabelsRequest) -> Result<(), ServiceError> {
        let add = self.resolve_labels(&request.add_labels).await?;
        let remove = self.resolve_labels(&request.remove_labels).await?;

        let remove_ids: HashSet<&str> = remove.iter().map(|l| l.id.as_str()).collect();
        let add_refs: Vec<DocumentRef> = add.iter().map(|l| l.doc_ref.clone()).collect();

        let mut batch = self
            .labels
            .batches()
            .provide_with_threshold(request.objects.len() + add.len() + remove.len())?;

        let mut target_refs = Vec::with_capacity(request.objects.len());
        for target in &request.objects {
            let object_ref = self.objects.resolve(&target.object_id, target.object_type)?;

            let allowed = self
                .permissions
                .check_edit_permission(requester_email, &target.object_id, target.object_type)
                .await?;
            if !allowed {
                warn!(
                    requester = requester_email,
                    object_type = %target.object_type,
                    object_id = %target.object_id,
                    "label assignment denied"
                );
                return Err(LabelError::no_permissions(target.object_type, target.object_id.clone()).into());
            }

            let current = self.labels.get_object_labels(&object_ref).await?;
            let labels = diff::relabel(&current, &remove_ids, &add_refs);
            debug!(object = %object_ref, before = current.len(), after = labels.len(), "staging object labels");

            batch.update(object_ref.clone(), vec![refs_update(fields::LABELS, &labels)])?;
            target_refs.push(object_ref);
        }

        let target_ids: HashSet<&str> = request.objects.iter().map(|t| t.object_id.as_str()).collect();
        for (label, objects) in label_side_updates(&remove, &add, &target_ids, &target_refs) {
            batch.update(label.doc_ref.clone(), vec![refs_update(fields::OBJECTS, &objects)])?;
        }

        let ops = batch.commit().await?;
        info!(
            customer = %request.customer_id,
            objects = request.objects.len(),
            added = add.len(),
            removed = remove.len(),
            ops,
            "labels assigned"
        );
        Ok(())
    }

    async fn resolve_labels(&self, ids: &[LabelId]) -> Result<Vec<Label>, ServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.labels.get_many(ids).await
    }
}

/// New `objects` list for every label in either set, one entry per label.
///
/// Removed labels drop every target id; added labels then gain every target
/// not already present. A label in both sets is added on top of its removal.
///
/// Membership is by object id. A target whose id already appears in a
/// label's `objects` under another kind's collection is not appended, even
/// though the target's own `labels` still gains the label.
fn label_side_updates<'a>(
    remove: &'a [Label],
    add: &'a [Label],
    target_ids: &HashSet<&str>,
    target_refs: &[DocumentRef],
) -> Vec<(&'a Label, Vec<DocumentRef>)> {
    let mut staged: Vec<(&Label, Vec<DocumentRef>)> = Vec::with_capacity(remove.len() + add.len());
    let mut index: HashMap<&LabelId, usize> = HashMap::new();

    for label in remove {
        if index.contains_key(&label.id) {
            continue;
        }
        index.insert(&label.id, staged.len());
        staged.push((label, diff::remove_ids(&label.objects, target_ids)));
    }

    for label in add {
        let existing = index.get(&label.id).copied();
        match existing {
            Some(i) => {
                let base = std::mem::take(&mut staged[i].1);
                staged[i].1 = diff::union_by_id(base, target_refs);
            }
            None => {
                index.insert(&label.id, staged.len());
                staged.push((label, diff::union_by_id(label.objects.clone(), target_refs)));
            }
        }
    }

    staged
}
