use core::str::FromStr;

use serde::{Deserialize, Serialize};

use labelsync_core::ObjectId;

use crate::LabelError;

/// The kinds of objects a label can be attached to.
///
/// Used as the discriminator for both reference resolution and permission
/// dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Alert,
    AttributionGroup,
    Attribution,
    Budget,
    Metric,
    Report,
}

impl ObjectType {
    pub const ALL: [ObjectType; 6] = [
        ObjectType::Alert,
        ObjectType::AttributionGroup,
        ObjectType::Attribution,
        ObjectType::Budget,
        ObjectType::Metric,
        ObjectType::Report,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Alert => "alert",
            ObjectType::AttributionGroup => "attribution_group",
            ObjectType::Attribution => "attribution",
            ObjectType::Budget => "budget",
            ObjectType::Metric => "metric",
            ObjectType::Report => "report",
        }
    }
}

impl core::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| LabelError::InvalidObjectType(s.to_string()))
    }
}

/// One object named in an assignment request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectTarget {
    #[serde(rename = "objectID")]
    pub object_id: ObjectId,
    #[serde(rename = "objectType")]
    pub object_type: ObjectType,
}

impl ObjectTarget {
    pub fn new(object_id: impl Into<ObjectId>, object_type: ObjectType) -> Self {
        Self {
            object_id: object_id.into(),
            object_type,
        }
    }
}
