//! Label engine configuration.

use std::collections::BTreeMap;

use tracing::warn;

use labelsync_labels::ObjectType;

use crate::document_store::DEFAULT_MAX_BATCH_OPS;

/// Collection layout and batch limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelsConfig {
    /// Collection holding label documents.
    pub labels_collection: String,
    /// Collection holding customer documents.
    pub customers_collection: String,
    /// Upper bound for one write batch (clamped to the store's own ceiling).
    pub max_batch_ops: usize,
    /// Collection path of each labelable object kind.
    pub object_collections: BTreeMap<ObjectType, String>,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        let object_collections = ObjectType::ALL
            .into_iter()
            .map(|t| (t, default_collection(t).to_string()))
            .collect();

        Self {
            labels_collection: "labels".to_string(),
            customers_collection: "customers".to_string(),
            max_batch_ops: DEFAULT_MAX_BATCH_OPS,
            object_collections,
        }
    }
}

impl LabelsConfig {
    /// Load overrides from the environment, falling back to defaults.
    ///
    /// - `LABELS_COLLECTION`
    /// - `LABELS_CUSTOMERS_COLLECTION`
    /// - `LABELS_MAX_BATCH_OPS`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("LABELS_COLLECTION").filter(|v| !v.is_empty()) {
            config.labels_collection = v;
        }
        if let Some(v) = lookup("LABELS_CUSTOMERS_COLLECTION").filter(|v| !v.is_empty()) {
            config.customers_collection = v;
        }
        if let Some(raw) = lookup("LABELS_MAX_BATCH_OPS") {
            match raw.parse::<usize>() {
                Ok(n) if n > 0 => config.max_batch_ops = n,
                _ => warn!(
                    value = %raw,
                    default = DEFAULT_MAX_BATCH_OPS,
                    "LABELS_MAX_BATCH_OPS is not a positive integer; using default"
                ),
            }
        }

        config
    }

    pub fn with_labels_collection(mut self, collection: impl Into<String>) -> Self {
        self.labels_collection = collection.into();
        self
    }

    pub fn with_customers_collection(mut self, collection: impl Into<String>) -> Self {
        self.customers_collection = collection.into();
        self
    }

    pub fn with_max_batch_ops(mut self, max: usize) -> Self {
        self.max_batch_ops = max;
        self
    }

    pub fn with_object_collection(mut self, object_type: ObjectType, collection: impl Into<String>) -> Self {
        self.object_collections.insert(object_type, collection.into());
        self
    }

    pub fn object_collection(&self, object_type: ObjectType) -> &str {
        self.object_collections
            .get(&object_type)
            .map(String::as_str)
            .unwrap_or_else(|| default_collection(object_type))
    }
}

fn default_collection(object_type: ObjectType) -> &'static str {
    match object_type {
        ObjectType::Alert => "cloudAnalytics/alerts/cloudAnalyticsAlerts",
        ObjectType::AttributionGroup => "cloudAnalytics/attribution-groups/cloudAnalyticsAttributionGroups",
        ObjectType::Attribution => "dashboards/google-cloud-reports/attributions",
        ObjectType::Budget => "cloudAnalytics/budgets/cloudAnalyticsBudgets",
        ObjectType::Metric => "cloudAnalytics/metrics/cloudAnalyticsMetrics",
        ObjectType::Report => "dashboards/google-cloud-reports/savedReports",
    }
}
