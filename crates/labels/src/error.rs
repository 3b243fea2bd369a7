//! Label domain errors.

use thiserror::Error;

use labelsync_core::{CustomerId, LabelId, ObjectId};

use crate::ObjectType;

/// Coarse classification used by boundaries to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed request; never retried.
    Validation,
    /// A label, object or customer could not be resolved.
    NotFound,
    /// The requester may not edit the target object.
    Forbidden,
    /// Store or programmer error.
    Internal,
}

impl ErrorKind {
    pub fn http_status(self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Internal => 500,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LabelError {
    #[error("invalid label id")]
    InvalidLabelId,

    #[error("label {0} not found")]
    LabelNotFound(LabelId),

    #[error("invalid label")]
    InvalidLabel,

    #[error("invalid label name")]
    InvalidName,

    #[error("invalid label color")]
    InvalidColor,

    #[error("invalid customer")]
    InvalidCustomer,

    #[error("customer {0} not found")]
    CustomerNotFound(CustomerId),

    #[error("invalid user")]
    InvalidUser,

    #[error("empty request")]
    EmptyRequest,

    #[error("invalid object id")]
    InvalidObjectId,

    #[error("invalid object type: {0}")]
    InvalidObjectType(String),

    #[error("invalid objects")]
    InvalidObjects,

    #[error("no labels to add or remove")]
    NoLabelsToAddOrRemove,

    #[error("duplicated object in request")]
    DuplicatedObjectInRequest,

    #[error("duplicated label in request")]
    DuplicatedLabelInRequest,

    #[error("no permissions to edit {object_type} {object_id}")]
    NoPermissions {
        object_type: ObjectType,
        object_id: ObjectId,
    },

    /// A stored label document could not be decoded.
    #[error("corrupt label document {id}: {reason}")]
    CorruptLabel { id: LabelId, reason: String },
}

impl LabelError {
    pub fn no_permissions(object_type: ObjectType, object_id: ObjectId) -> Self {
        Self::NoPermissions {
            object_type,
            object_id,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LabelError::LabelNotFound(_) | LabelError::CustomerNotFound(_) => ErrorKind::NotFound,
            LabelError::NoPermissions { .. } => ErrorKind::Forbidden,
            LabelError::CorruptLabel { .. } => ErrorKind::Internal,
            LabelError::InvalidLabelId
            | LabelError::InvalidLabel
            | LabelError::InvalidName
            | LabelError::InvalidColor
            | LabelError::InvalidCustomer
            | LabelError::InvalidUser
            | LabelError::EmptyRequest
            | LabelError::InvalidObjectId
            | LabelError::InvalidObjectType(_)
            | LabelError::InvalidObjects
            | LabelError::NoLabelsToAddOrRemove
            | LabelError::DuplicatedObjectInRequest
            | LabelError::DuplicatedLabelInRequest => ErrorKind::Validation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_boundary_statuses() {
        assert_eq!(LabelError::InvalidColor.kind().http_status(), 400);
        assert_eq!(LabelError::LabelNotFound(LabelId::new("x")).kind().http_status(), 404);
        assert_eq!(
            LabelError::no_permissions(ObjectType::Budget, ObjectId::new("b1"))
                .kind()
                .http_status(),
            403
        );
    }

    #[test]
    fn no_permissions_names_the_object() {
        let err = LabelError::no_permissions(ObjectType::Report, ObjectId::new("r1"));
        assert_eq!(err.to_string(), "no permissions to edit report r1");
    }
}
