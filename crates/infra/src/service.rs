//! Label service surface.
//!
//! Validates boundary requests, then delegates to `LabelStore` and
//! `AssignmentEngine`. Owns the one cascade that starts from a label:
//! deleting a label detaches it from every object that carries it.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use labelsync_core::{DocumentRef, LabelId, ObjectId};
use labelsync_labels::diff;
use labelsync_labels::{
    AssignLabelsRequest, CreateLabelRequest, Label, LabelError, NewLabel, ObjectType, UpdateLabelRequest, fields,
};

use crate::assignment::AssignmentEngine;
use crate::config::LabelsConfig;
use crate::document_store::DocumentStore;
use crate::error::ServiceError;
use crate::label_store::{LabelStore, refs_update};
use crate::object_refs::ObjectReferenceResolver;
use crate::permissions::PermissionResolver;

#[derive(Debug, Clone)]
pub struct LabelsService<S> {
    store: S,
    labels: LabelStore<S>,
    objects: Arc<ObjectReferenceResolver>,
    engine: AssignmentEngine<S>,
    customers_collection: String,
}

impl<S> LabelsService<S>
where
    S: DocumentStore + Clone,
{
    /// Wire every component against `store` using collection-backed kinds.
    pub fn new(store: S, config: &LabelsConfig) -> Self {
        Self::with_resolver(store, config, ObjectReferenceResolver::from_config(config))
    }

    /// Like `new`, with a caller-supplied kind table.
    pub fn with_resolver(store: S, config: &LabelsConfig, objects: ObjectReferenceResolver) -> Self {
        let objects = Arc::new(objects);
        let labels = LabelStore::new(store.clone(), config);
        let permissions = PermissionResolver::new(store.clone(), objects.clone());
        let engine = AssignmentEngine::new(labels.clone(), objects.clone(), permissions);

        Self {
            store,
            labels,
            objects,
            engine,
            customers_collection: config.customers_collection.clone(),
        }
    }

    pub fn labels(&self) -> &LabelStore<S> {
        &self.labels
    }

    pub fn object_ref(&self, object_id: &ObjectId, object_type: ObjectType) -> Result<DocumentRef, ServiceError> {
        Ok(self.objects.resolve(object_id, object_type)?)
    }

    pub async fn get_label(&self, id: &LabelId) -> Result<Label, ServiceError> {
        self.labels.get(id).await
    }

    /// Create a label for an existing customer.
    pub async fn create_label(&self, request: &CreateLabelRequest) -> Result<Label, ServiceError> {
        request.validate()?;

        let customer = DocumentRef::new(self.customers_collection.clone(), request.customer_id.as_str());
        if self.store.get(&customer).await?.is_none() {
            return Err(LabelError::CustomerNotFound(request.customer_id.clone()).into());
        }

        self.labels
            .create(NewLabel {
                name: request.name.clone(),
                color: request.color,
                created_by: request.user_email.clone(),
                customer: Some(customer),
            })
            .await
    }

    pub async fn update_label(&self, request: &UpdateLabelRequest) -> Result<Label, ServiceError> {
        request.validate()?;
        self.labels.update(&request.label_id, request.update()).await
    }

    /// Delete a label and remove it from every object that references it.
    ///
    /// Every object listed in the label must still exist; a stale entry
    /// fails the whole delete.
    pub async fn delete_label(&self, id: &LabelId) -> Result<(), ServiceError> {
        let label = self.labels.get(id).await?;
        let objects = diff::remove_ids(&label.objects, &HashSet::new());
        let dropped = HashSet::from([label.id.as_str()]);

        let mut batch = self.labels.batches().provide_with_threshold(objects.len() + 1)?;
        batch.delete_existing(label.doc_ref.clone())?;
        for object_ref in &objects {
            let current = self.labels.get_object_labels(object_ref).await?;
            debug!(object = %object_ref, "staging label removal");
            batch.update(
                object_ref.clone(),
                vec![refs_update(fields::LABELS, &diff::remove_ids(&current, &dropped))],
            )?;
        }
        batch.commit().await?;

        info!(label = %label.doc_ref, objects = objects.len(), "label deleted");
        Ok(())
    }

    /// Validate, then apply an assignment on behalf of `requester_email`.
    pub async fn assign_labels(&self, requester_email: &str, request: &AssignLabelsRequest) -> Result<(), ServiceError> {
        request.validate()?;
        self.engine.assign_labels(requester_email, request).await
    }

    pub async fn delete_object_with_labels(&self, object_ref: &DocumentRef) -> Result<(), ServiceError> {
        self.labels.delete_object_with_labels(object_ref).await
    }

    pub async fn delete_many_objects_with_labels(&self, object_refs: &[DocumentRef]) -> Result<(), ServiceError> {
        self.labels.delete_many_objects_with_labels(object_refs).await
    }
}
