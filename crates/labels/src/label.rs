use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use labelsync_core::{DocumentRef, LabelId};

use crate::LabelError;

/// Field names of the persisted label document and of the embedded
/// reference list on labeled objects.
pub mod fields {
    pub const NAME: &str = "name";
    pub const COLOR: &str = "color";
    pub const MODIFIED_AT: &str = "modifiedAt";
    pub const OBJECTS: &str = "objects";

    /// Reference list stored on every labeled object.
    pub const LABELS: &str = "labels";

    /// Bare owner email stored on metrics instead of an access value.
    pub const OWNER: &str = "owner";
}

/// Closed label palette. Stored as the hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LabelColor {
    Blue,
    LightBlue,
    Purple,
    Pink,
    Red,
    Orange,
    Yellow,
    LightGreen,
    Green,
    Teal,
    Gray,
}

impl LabelColor {
    pub const ALL: [LabelColor; 11] = [
        LabelColor::Blue,
        LabelColor::LightBlue,
        LabelColor::Purple,
        LabelColor::Pink,
        LabelColor::Red,
        LabelColor::Orange,
        LabelColor::Yellow,
        LabelColor::LightGreen,
        LabelColor::Green,
        LabelColor::Teal,
        LabelColor::Gray,
    ];

    pub fn hex(&self) -> &'static str {
        match self {
            LabelColor::Blue => "#9DC3F7",
            LabelColor::LightBlue => "#BEE1F5",
            LabelColor::Purple => "#DCC7F0",
            LabelColor::Pink => "#F5C6DC",
            LabelColor::Red => "#F5C4C4",
            LabelColor::Orange => "#F9D6B8",
            LabelColor::Yellow => "#FBEBB5",
            LabelColor::LightGreen => "#D6EFC2",
            LabelColor::Green => "#BDE5CF",
            LabelColor::Teal => "#BDE5E0",
            LabelColor::Gray => "#DDDDDD",
        }
    }

    /// Palette membership test used at the boundary.
    pub fn from_hex(hex: &str) -> Result<Self, LabelError> {
        LabelColor::ALL
            .into_iter()
            .find(|c| c.hex().eq_ignore_ascii_case(hex))
            .ok_or(LabelError::InvalidColor)
    }
}

impl core::fmt::Display for LabelColor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.hex())
    }
}

impl TryFrom<String> for LabelColor {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        LabelColor::from_hex(&value)
    }
}

impl From<LabelColor> for String {
    fn from(value: LabelColor) -> Self {
        value.hex().to_string()
    }
}

/// Persisted layout of a label document (the id lives in the reference).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDocument {
    pub name: String,
    pub color: LabelColor,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub customer: Option<DocumentRef>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    #[serde(default)]
    pub objects: Vec<DocumentRef>,
}

/// A label together with its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub id: LabelId,
    pub doc_ref: DocumentRef,
    pub name: String,
    pub color: LabelColor,
    pub created_by: String,
    pub customer: Option<DocumentRef>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    /// References of every object carrying this label. Never holds the same
    /// object twice.
    pub objects: Vec<DocumentRef>,
}

impl Label {
    pub fn from_document(doc_ref: DocumentRef, doc: LabelDocument) -> Self {
        Self {
            id: LabelId::new(doc_ref.id()),
            doc_ref,
            name: doc.name,
            color: doc.color,
            created_by: doc.created_by,
            customer: doc.customer,
            created_at: doc.created_at,
            modified_at: doc.modified_at,
            objects: doc.objects,
        }
    }

}

/// Input for label creation. Timestamps and the id are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLabel {
    pub name: String,
    pub color: LabelColor,
    pub created_by: String,
    pub customer: Option<DocumentRef>,
}

impl NewLabel {
    /// A label with no name, no creator and no customer carries nothing worth
    /// persisting.
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.created_by.is_empty() && self.customer.is_none()
    }
}

/// Partial update of a label's presentation fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelUpdate {
    pub name: Option<String>,
    pub color: Option<LabelColor>,
}

impl LabelUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_eleven_distinct_colors() {
        let mut hexes: Vec<_> = LabelColor::ALL.iter().map(|c| c.hex()).collect();
        hexes.sort();
        hexes.dedup();
        assert_eq!(hexes.len(), 11);
    }

    #[test]
    fn color_membership_is_case_insensitive() {
        assert_eq!(LabelColor::from_hex("#bee1f5"), Ok(LabelColor::LightBlue));
        assert_eq!(LabelColor::from_hex("invalidColor"), Err(LabelError::InvalidColor));
    }

    #[test]
    fn document_uses_persisted_field_names() {
        let doc = LabelDocument {
            name: "prod".to_string(),
            color: LabelColor::Green,
            created_by: "owner@acme.io".to_string(),
            customer: Some(DocumentRef::new("customers", "c1")),
            created_at: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
            modified_at: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
            objects: vec![DocumentRef::new("cloudAnalytics/budgets/cloudAnalyticsBudgets", "b1")],
        };

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["color"], "#BDE5CF");
        assert_eq!(json["createdBy"], "owner@acme.io");
        assert_eq!(json["customer"], "customers/c1");
        assert_eq!(json["objects"][0], "cloudAnalytics/budgets/cloudAnalyticsBudgets/b1");

        let label = Label::from_document(DocumentRef::new("labels", "l1"), doc.clone());
        assert_eq!(label.id, LabelId::new("l1"));
        assert_eq!(label.objects, doc.objects);
        assert_eq!(label.created_by, "owner@acme.io");
    }
}
