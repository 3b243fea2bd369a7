use thiserror::Error;

use labelsync_labels::{ErrorKind, LabelError};

use crate::batch::BatchError;
use crate::document_store::StoreError;

/// Error returned by the label services.
///
/// Keeps domain failures (`Label`) apart from store failures so boundaries
/// can classify without inspecting messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Label(#[from] LabelError),

    #[error(transparent)]
    Store(StoreError),

    /// Batch sizing mistake (a programmer error, not a store failure).
    #[error(transparent)]
    Batch(BatchError),
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        ServiceError::Store(value)
    }
}

impl From<BatchError> for ServiceError {
    fn from(value: BatchError) -> Self {
        match value {
            BatchError::Commit(e) => ServiceError::Store(e),
            other => ServiceError::Batch(other),
        }
    }
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Label(e) => e.kind(),
            ServiceError::Store(StoreError::NotFound(_)) => ErrorKind::NotFound,
            ServiceError::Store(_) | ServiceError::Batch(_) => ErrorKind::Internal,
        }
    }

    pub fn http_status(&self) -> u16 {
        self.kind().http_status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelsync_core::DocumentRef;

    #[test]
    fn commit_failures_unwrap_to_store_errors() {
        let missing = DocumentRef::new("cloudAnalytics/alerts/cloudAnalyticsAlerts", "a1");
        let err = ServiceError::from(BatchError::Commit(StoreError::NotFound(missing.clone())));
        assert_eq!(err, ServiceError::Store(StoreError::NotFound(missing)));
        assert_eq!(err.http_status(), 404);
    }

    #[test]
    fn sizing_mistakes_are_internal() {
        let err = ServiceError::from(BatchError::CapacityExceeded { threshold: 3 });
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
