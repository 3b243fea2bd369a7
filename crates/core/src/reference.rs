//! Document references.
//!
//! A reference is a stable pointer to a document: the collection path plus
//! the document id. Collection paths may be nested
//! (`cloudAnalytics/alerts/cloudAnalyticsAlerts`), so the id is always the
//! final path segment.
//!
//! References are embedded as field values inside other documents
//! (`Label.objects`, `Object.labels`) and serialize as the full path string.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentRef {
    collection: String,
    id: String,
}

impl DocumentRef {
    /// Build a reference without any existence check.
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Full path, `<collection>/<id>`.
    pub fn path(&self) -> String {
        format!("{}/{}", self.collection, self.id)
    }
}

impl core::fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

impl FromStr for DocumentRef {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (collection, id) = s
            .trim_matches('/')
            .rsplit_once('/')
            .ok_or_else(|| DomainError::invalid_id(format!("reference '{s}' has no collection")))?;

        if collection.is_empty() || id.is_empty() {
            return Err(DomainError::invalid_id(format!("reference '{s}' is incomplete")));
        }

        Ok(Self::new(collection, id))
    }
}

impl TryFrom<String> for DocumentRef {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DocumentRef> for String {
    fn from(value: DocumentRef) -> Self {
        value.path()
    }
}
