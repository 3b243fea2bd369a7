//! Request shapes supplied by the boundary.
//!
//! `validate()` implements the boundary rules. The services assume requests
//! have already passed it and do not re-check shapes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use labelsync_core::{CustomerId, LabelId, ObjectId};

use crate::{LabelColor, LabelError, LabelUpdate, ObjectTarget};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLabelRequest {
    pub name: String,
    pub color: LabelColor,
    #[serde(rename = "customerID")]
    pub customer_id: CustomerId,
    pub user_email: String,
}

impl CreateLabelRequest {
    pub fn validate(&self) -> Result<(), LabelError> {
        if self.customer_id.is_empty() {
            return Err(LabelError::InvalidCustomer);
        }
        if self.user_email.is_empty() {
            return Err(LabelError::InvalidUser);
        }
        if self.name.trim().is_empty() {
            return Err(LabelError::InvalidName);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLabelRequest {
    #[serde(rename = "labelID")]
    pub label_id: LabelId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<LabelColor>,
}

impl UpdateLabelRequest {
    pub fn validate(&self) -> Result<(), LabelError> {
        if self.update().is_empty() {
            return Err(LabelError::EmptyRequest);
        }
        if self.label_id.as_str().parse::<LabelId>().is_err() {
            return Err(LabelError::InvalidLabelId);
        }
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(LabelError::InvalidName);
        }
        Ok(())
    }

    pub fn update(&self) -> LabelUpdate {
        LabelUpdate {
            name: self.name.clone(),
            color: self.color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignLabelsRequest {
    #[serde(rename = "customerID")]
    pub customer_id: CustomerId,
    pub objects: Vec<ObjectTarget>,
    #[serde(default)]
    pub add_labels: Vec<LabelId>,
    #[serde(default)]
    pub remove_labels: Vec<LabelId>,
}

impl AssignLabelsRequest {
    pub fn validate(&self) -> Result<(), LabelError> {
        if self.objects.is_empty() {
            return Err(LabelError::InvalidObjects);
        }

        let mut seen_objects = HashSet::with_capacity(self.objects.len());
        for target in &self.objects {
            if target.object_id.as_str().parse::<ObjectId>().is_err() {
                return Err(LabelError::InvalidObjectId);
            }
            if !seen_objects.insert(&target.object_id) {
                return Err(LabelError::DuplicatedObjectInRequest);
            }
        }

        if self.add_labels.is_empty() && self.remove_labels.is_empty() {
            return Err(LabelError::NoLabelsToAddOrRemove);
        }

        // One label may appear once across both lists.
        let mut seen_labels = HashSet::with_capacity(self.add_labels.len() + self.remove_labels.len());
        for id in self.add_labels.iter().chain(&self.remove_labels) {
            if id.as_str().parse::<LabelId>().is_err() {
                return Err(LabelError::InvalidLabelId);
            }
            if !seen_labels.insert(id) {
                return Err(LabelError::DuplicatedLabelInRequest);
            }
        }

        if self.customer_id.is_empty() {
            return Err(LabelError::InvalidCustomer);
        }

        Ok(())
    }
}
