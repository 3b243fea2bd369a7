//! Label persistence and the object→label delete cascades.
//!
//! `LabelStore` owns every read and write of label documents plus the
//! `labels` field of labeled objects. Each mutating call reads what it needs,
//! computes the new reference lists in memory (`labelsync_labels::diff`) and
//! commits exactly one batch.
//!
//! ## Concurrency
//!
//! Reference lists are overwritten whole. Two calls racing on the same label
//! or object both succeed and the later commit wins; there is no isolation
//! between the reads and the batch.

use std::collections::HashSet;

use chrono::Utc;
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use labelsync_core::{DocumentRef, LabelId};
use labelsync_labels::diff;
use labelsync_labels::{Label, LabelDocument, LabelError, LabelUpdate, NewLabel, fields};

use crate::batch::{BatchError, BatchProvider};
use crate::config::LabelsConfig;
use crate::document_store::{Document, DocumentStore, FieldUpdate, StoreError};
use crate::error::ServiceError;

#[derive(Debug, Clone)]
pub struct LabelStore<S> {
    store: S,
    batches: BatchProvider<S>,
    collection: String,
}

impl<S> LabelStore<S>
where
    S: DocumentStore + Clone,
{
    pub fn new(store: S, config: &LabelsConfig) -> Self {
        Self {
            batches: BatchProvider::new(store.clone(), config.max_batch_ops),
            store,
            collection: config.labels_collection.clone(),
        }
    }

    pub fn batches(&self) -> &BatchProvider<S> {
        &self.batches
    }

    pub fn label_ref(&self, id: &LabelId) -> DocumentRef {
        DocumentRef::new(self.collection.clone(), id.as_str())
    }

    pub async fn get(&self, id: &LabelId) -> Result<Label, ServiceError> {
        if id.is_empty() {
            return Err(LabelError::InvalidLabelId.into());
        }
        self.get_by_ref(&self.label_ref(id)).await
    }

    /// Labels in input order. Stops at the first id that does not resolve.
    pub async fn get_many(&self, ids: &[LabelId]) -> Result<Vec<Label>, ServiceError> {
        if ids.is_empty() {
            return Err(LabelError::InvalidLabelId.into());
        }

        let mut labels = Vec::with_capacity(ids.len());
        for id in ids {
            labels.push(self.get(id).await?);
        }
        Ok(labels)
    }

    /// Persist a new label with a generated id and fresh timestamps.
    pub async fn create(&self, label: NewLabel) -> Result<Label, ServiceError> {
        if label.is_blank() {
            return Err(LabelError::InvalidLabel.into());
        }

        let now = Utc::now();
        let doc = LabelDocument {
            name: label.name,
            color: label.color,
            created_by: label.created_by,
            customer: label.customer,
            created_at: now,
            modified_at: now,
            objects: Vec::new(),
        };
        let doc_ref = self.label_ref(&LabelId::generate());

        let mut batch = self.batches.provide_with_threshold(1)?;
        batch.create(doc_ref.clone(), encode_label(&doc)?)?;
        batch.commit().await?;

        info!(label = %doc_ref, "label created");
        Ok(Label::from_document(doc_ref, doc))
    }

    /// Overwrite the provided fields and stamp `modifiedAt`.
    pub async fn update(&self, id: &LabelId, update: LabelUpdate) -> Result<Label, ServiceError> {
        if id.is_empty() {
            return Err(LabelError::InvalidLabelId.into());
        }

        let doc_ref = self.label_ref(id);
        let mut updates = Vec::with_capacity(3);
        if let Some(name) = update.name {
            updates.push(FieldUpdate::new(fields::NAME, name));
        }
        if let Some(color) = update.color {
            updates.push(FieldUpdate::new(fields::COLOR, color.hex()));
        }
        updates.push(FieldUpdate::new(fields::MODIFIED_AT, to_json(&Utc::now())?));

        let mut batch = self.batches.provide_with_threshold(1)?;
        batch.update(doc_ref.clone(), updates)?;
        match batch.commit().await {
            Ok(_) => {}
            Err(BatchError::Commit(StoreError::NotFound(_))) => {
                return Err(LabelError::LabelNotFound(id.clone()).into());
            }
            Err(e) => return Err(e.into()),
        }

        info!(label = %doc_ref, "label updated");
        self.get_by_ref(&doc_ref).await
    }

    /// The `labels` field of an object. An absent or malformed field reads as
    /// no labels; a missing document is a store `NotFound`.
    pub async fn get_object_labels(&self, object_ref: &DocumentRef) -> Result<Vec<DocumentRef>, ServiceError> {
        let doc = self.read_existing(object_ref).await?;
        Ok(labels_field(object_ref, &doc))
    }

    /// Delete an object and detach it from every label it carries.
    ///
    /// Stages one update per distinct label plus an existence-checked
    /// delete, so the whole cascade fails if the object is already gone or a
    /// label it references no longer exists.
    pub async fn delete_object_with_labels(&self, object_ref: &DocumentRef) -> Result<(), ServiceError> {
        let label_refs = diff::union_by_id(Vec::new(), &self.get_object_labels(object_ref).await?);

        let mut labels = Vec::with_capacity(label_refs.len());
        for label_ref in &label_refs {
            labels.push(self.get_by_ref(label_ref).await?);
        }

        let mut batch = self.batches.provide_with_threshold(labels.len() + 1)?;
        for label in &labels {
            let objects = diff::remove_ref(&label.objects, object_ref);
            batch.update(label.doc_ref.clone(), vec![refs_update(fields::OBJECTS, &objects)])?;
        }
        batch.delete_existing(object_ref.clone())?;
        batch.commit().await?;

        info!(object = %object_ref, labels = labels.len(), "object deleted with labels");
        Ok(())
    }

    /// Delete several objects and detach all of them from every affected
    /// label. Objects that are already gone contribute no labels.
    ///
    /// No permission check is performed here; callers own that decision.
    pub async fn delete_many_objects_with_labels(&self, object_refs: &[DocumentRef]) -> Result<(), ServiceError> {
        if object_refs.is_empty() {
            return Ok(());
        }

        let mut label_refs: Vec<DocumentRef> = Vec::new();
        for object_ref in object_refs {
            let Some(doc) = self.store.get(object_ref).await? else {
                debug!(object = %object_ref, "object already deleted");
                continue;
            };
            label_refs = diff::union_by_id(label_refs, &labels_field(object_ref, &doc));
        }

        let mut labels = Vec::with_capacity(label_refs.len());
        for label_ref in &label_refs {
            labels.push(self.get_by_ref(label_ref).await?);
        }

        let deleted: HashSet<&DocumentRef> = object_refs.iter().collect();

        let mut batch = self.batches.provide_with_threshold(object_refs.len() + labels.len())?;
        for label in &labels {
            let objects = diff::remove_refs(&label.objects, &deleted);
            batch.update(label.doc_ref.clone(), vec![refs_update(fields::OBJECTS, &objects)])?;
        }
        for object_ref in object_refs {
            batch.delete(object_ref.clone())?;
        }
        batch.commit().await?;

        info!(
            objects = object_refs.len(),
            labels = labels.len(),
            "objects deleted with labels"
        );
        Ok(())
    }

    pub(crate) async fn get_by_ref(&self, doc_ref: &DocumentRef) -> Result<Label, ServiceError> {
        let id = LabelId::new(doc_ref.id());
        let doc = self
            .store
            .get(doc_ref)
            .await?
            .ok_or_else(|| LabelError::LabelNotFound(id.clone()))?;

        let decoded: LabelDocument =
            serde_json::from_value(JsonValue::Object(doc)).map_err(|e| LabelError::CorruptLabel {
                id,
                reason: e.to_string(),
            })?;

        Ok(Label::from_document(doc_ref.clone(), decoded))
    }

    async fn read_existing(&self, doc_ref: &DocumentRef) -> Result<Document, StoreError> {
        self.store
            .get(doc_ref)
            .await?
            .ok_or_else(|| StoreError::NotFound(doc_ref.clone()))
    }
}

/// Overwrite of a reference-list field with path strings.
pub(crate) fn refs_update(field: &str, refs: &[DocumentRef]) -> FieldUpdate {
    FieldUpdate::new(
        field,
        JsonValue::Array(refs.iter().map(|r| JsonValue::String(r.path())).collect()),
    )
}

pub(crate) fn labels_field(object_ref: &DocumentRef, doc: &Document) -> Vec<DocumentRef> {
    let Some(raw) = doc.get(fields::LABELS) else {
        return Vec::new();
    };
    match serde_json::from_value(raw.clone()) {
        Ok(refs) => refs,
        Err(e) => {
            debug!(object = %object_ref, error = %e, "unreadable labels field; treating as empty");
            Vec::new()
        }
    }
}

fn encode_label(doc: &LabelDocument) -> Result<Document, StoreError> {
    match to_json(doc)? {
        JsonValue::Object(map) => Ok(map),
        other => Err(StoreError::Serialization(format!("label encoded as {other}"))),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<JsonValue, StoreError> {
    serde_json::to_value(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::document_store::InMemoryDocumentStore;
    use labelsync_labels::LabelColor;
    use serde_json::json;

    const ALERTS: &str = "cloudAnalytics/alerts/cloudAnalyticsAlerts";
    const BUDGETS: &str = "cloudAnalytics/budgets/cloudAnalyticsBudgets";

    fn setup() -> (Arc<InMemoryDocumentStore>, LabelStore<Arc<InMemoryDocumentStore>>) {
        let store = Arc::new(InMemoryDocumentStore::new());
        let labels = LabelStore::new(store.clone(), &LabelsConfig::default());
        (store, labels)
    }

    fn doc(value: JsonValue) -> Document {
        value.as_object().cloned().unwrap_or_default()
    }

    fn label_doc(name: &str, objects: &[&DocumentRef]) -> Document {
        doc(json!({
            "name": name,
            "color": "#9DC3F7",
            "createdBy": "owner@acme.io",
            "customer": "customers/c1",
            "createdAt": "2024-01-01T00:00:00Z",
            "modifiedAt": "2024-01-01T00:00:00Z",
            "objects": objects.iter().map(|r| r.path()).collect::<Vec<_>>(),
        }))
    }

    fn object_doc(labels: &[&DocumentRef]) -> Document {
        doc(json!({ "labels": labels.iter().map(|r| r.path()).collect::<Vec<_>>() }))
    }

    fn new_label() -> NewLabel {
        NewLabel {
            name: "prod".to_string(),
            color: LabelColor::Teal,
            created_by: "owner@acme.io".to_string(),
            customer: Some(DocumentRef::new("customers", "c1")),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips_through_the_store() {
        let (store, labels) = setup();

        let created = labels.create(new_label()).await.unwrap();
        assert_eq!(created.created_at, created.modified_at);
        assert!(created.objects.is_empty());
        assert_eq!(store.commit_count(), 1);

        let stored = store.snapshot(&created.doc_ref).unwrap();
        assert_eq!(stored["color"], "#BDE5E0");
        assert_eq!(stored["customer"], "customers/c1");

        assert_eq!(labels.get(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn blank_label_is_rejected_without_writes() {
        let (store, labels) = setup();
        let blank = NewLabel {
            name: String::new(),
            color: LabelColor::Gray,
            created_by: String::new(),
            customer: None,
        };

        assert_eq!(labels.create(blank).await.unwrap_err(), ServiceError::Label(LabelError::InvalidLabel));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn get_distinguishes_empty_missing_and_corrupt() {
        let (store, labels) = setup();
        store.insert(labels.label_ref(&LabelId::new("bad")), doc(json!({ "name": 7 }))).unwrap();

        assert_eq!(labels.get(&LabelId::new("")).await.unwrap_err(), ServiceError::Label(LabelError::InvalidLabelId));
        assert_eq!(
            labels.get(&LabelId::new("nope")).await.unwrap_err(),
            ServiceError::Label(LabelError::LabelNotFound(LabelId::new("nope")))
        );
        assert!(matches!(
            labels.get(&LabelId::new("bad")).await.unwrap_err(),
            ServiceError::Label(LabelError::CorruptLabel { .. })
        ));
    }

    #[tokio::test]
    async fn get_many_keeps_order_and_fails_fast() {
        let (store, labels) = setup();
        for id in ["l1", "l2"] {
            store.insert(labels.label_ref(&LabelId::new(id)), label_doc(id, &[])).unwrap();
        }

        let got = labels.get_many(&[LabelId::new("l2"), LabelId::new("l1")]).await.unwrap();
        assert_eq!(got.iter().map(|l| l.id.as_str()).collect::<Vec<_>>(), ["l2", "l1"]);

        let err = labels
            .get_many(&[LabelId::new("l1"), LabelId::new("ghost"), LabelId::new("")])
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::Label(LabelError::LabelNotFound(LabelId::new("ghost"))));

        assert_eq!(labels.get_many(&[]).await.unwrap_err(), ServiceError::Label(LabelError::InvalidLabelId));
    }

    #[tokio::test]
    async fn update_touches_only_provided_fields() {
        let (store, labels) = setup();
        let id = LabelId::new("l1");
        store.insert(labels.label_ref(&id), label_doc("prod", &[])).unwrap();

        let updated = labels
            .update(&id, LabelUpdate { name: None, color: Some(LabelColor::Red) })
            .await
            .unwrap();

        assert_eq!(updated.name, "prod");
        assert_eq!(updated.color, LabelColor::Red);
        assert!(updated.modified_at > updated.created_at);
    }

    #[tokio::test]
    async fn update_of_missing_label_is_not_found() {
        let (store, labels) = setup();
        let err = labels
            .update(&LabelId::new("ghost"), LabelUpdate { name: Some("x".to_string()), color: None })
            .await
            .unwrap_err();

        assert_eq!(err, ServiceError::Label(LabelError::LabelNotFound(LabelId::new("ghost"))));
        assert_eq!(store.commit_count(), 0);
    }

    #[tokio::test]
    async fn object_labels_tolerate_absent_or_malformed_field() {
        let (store, labels) = setup();
        let a1 = DocumentRef::new(ALERTS, "a1");
        let a2 = DocumentRef::new(ALERTS, "a2");
        store.insert(a1.clone(), doc(json!({ "name": "spike" }))).unwrap();
        store.insert(a2.clone(), doc(json!({ "labels": "labels/l1" }))).unwrap();

        assert!(labels.get_object_labels(&a1).await.unwrap().is_empty());
        assert!(labels.get_object_labels(&a2).await.unwrap().is_empty());

        let missing = DocumentRef::new(ALERTS, "gone");
        assert_eq!(
            labels.get_object_labels(&missing).await.unwrap_err(),
            ServiceError::Store(StoreError::NotFound(missing))
        );
    }

    #[tokio::test]
    async fn deleting_an_object_detaches_it_from_its_labels() {
        let (store, labels) = setup();
        let l1 = labels.label_ref(&LabelId::new("l1"));
        let a1 = DocumentRef::new(ALERTS, "a1");
        let b1 = DocumentRef::new(BUDGETS, "b1");

        store.insert(l1.clone(), label_doc("prod", &[&a1, &b1])).unwrap();
        store.insert(a1.clone(), object_doc(&[&l1])).unwrap();
        store.insert(b1.clone(), object_doc(&[&l1])).unwrap();

        labels.delete_object_with_labels(&a1).await.unwrap();

        assert!(store.snapshot(&a1).is_none());
        let l1_now = labels.get(&LabelId::new("l1")).await.unwrap();
        assert_eq!(l1_now.objects, vec![b1]);
        assert_eq!(store.commit_count(), 1);
    }

    #[tokio::test]
    async fn deleting_a_missing_object_fails() {
        let (store, labels) = setup();
        let gone = DocumentRef::new(ALERTS, "gone");

        assert!(labels.delete_object_with_labels(&gone).await.is_err());
        assert_eq!(store.commit_count(), 0);
    }

    #[tokio::test]
    async fn deleting_many_objects_shrinks_each_label_once() {
        let (store, labels) = setup();
        let l1 = labels.label_ref(&LabelId::new("l1"));
        let l2 = labels.label_ref(&LabelId::new("l2"));
        let o1 = DocumentRef::new(ALERTS, "o1");
        let o2 = DocumentRef::new(BUDGETS, "o2");
        let o3 = DocumentRef::new(BUDGETS, "o3");

        store.insert(l1.clone(), label_doc("prod", &[&o1, &o2, &o3])).unwrap();
        store.insert(l2.clone(), label_doc("team", &[&o2])).unwrap();
        store.insert(o1.clone(), object_doc(&[&l1])).unwrap();
        store.insert(o2.clone(), object_doc(&[&l1, &l2])).unwrap();
        store.insert(o3.clone(), object_doc(&[&l1])).unwrap();

        labels.delete_many_objects_with_labels(&[o1.clone(), o2.clone()]).await.unwrap();

        assert!(store.snapshot(&o1).is_none());
        assert!(store.snapshot(&o2).is_none());
        assert_eq!(labels.get(&LabelId::new("l1")).await.unwrap().objects, vec![o3.clone()]);
        assert!(labels.get(&LabelId::new("l2")).await.unwrap().objects.is_empty());
        assert_eq!(store.snapshot(&o3).unwrap()["labels"], json!([l1.path()]));
        assert_eq!(store.commit_count(), 1);
    }

    #[tokio::test]
    async fn deleting_many_objects_keeps_same_id_of_another_kind() {
        let (store, labels) = setup();
        let l1 = labels.label_ref(&LabelId::new("l1"));
        let alert_x = DocumentRef::new(ALERTS, "x");
        let budget_x = DocumentRef::new(BUDGETS, "x");

        store.insert(l1.clone(), label_doc("prod", &[&alert_x, &budget_x])).unwrap();
        store.insert(alert_x.clone(), object_doc(&[&l1])).unwrap();
        store.insert(budget_x.clone(), object_doc(&[&l1])).unwrap();

        labels.delete_many_objects_with_labels(&[budget_x.clone()]).await.unwrap();

        assert!(store.snapshot(&budget_x).is_none());
        assert_eq!(labels.get(&LabelId::new("l1")).await.unwrap().objects, vec![alert_x.clone()]);
        assert_eq!(store.snapshot(&alert_x).unwrap()["labels"], json!([l1.path()]));
    }

    #[tokio::test]
    async fn deleting_no_objects_is_a_no_op() {
        let (store, labels) = setup();
        labels.delete_many_objects_with_labels(&[]).await.unwrap();
        assert_eq!(store.commit_count(), 0);
    }
}
