use serde::{Deserialize, Serialize};

use crate::CollaboratorRole;

/// A single collaborator entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaborator {
    pub email: String,
    pub role: CollaboratorRole,
}

impl Collaborator {
    pub fn new(email: impl Into<String>, role: CollaboratorRole) -> Self {
        Self {
            email: email.into(),
            role,
        }
    }
}

/// Sharing settings stored on an object document.
///
/// The fields live at the top level of the object document (`collaborators`,
/// `public`), so an `Access` can be decoded straight from the whole document;
/// unrelated domain fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Access {
    #[serde(default)]
    pub collaborators: Vec<Collaborator>,

    /// Role granted to everyone in the customer when the object is public.
    #[serde(default)]
    pub public: Option<CollaboratorRole>,
}

impl Access {
    /// Access with a single owner and no other collaborators.
    pub fn owned_by(email: impl Into<String>) -> Self {
        Self {
            collaborators: vec![Collaborator::new(email, CollaboratorRole::Owner)],
            public: None,
        }
    }

    pub fn with_collaborator(mut self, email: impl Into<String>, role: CollaboratorRole) -> Self {
        self.collaborators.push(Collaborator::new(email, role));
        self
    }

    pub fn with_public(mut self, role: CollaboratorRole) -> Self {
        self.public = Some(role);
        self
    }

    /// Role held by `email`, if the email is a collaborator.
    pub fn role_of(&self, email: &str) -> Option<CollaboratorRole> {
        self.collaborators
            .iter()
            .filter(|c| c.email == email)
            .map(|c| c.role)
            .max()
    }

    /// Whether `email` may edit the object.
    ///
    /// Granted to owners and editors, or to anyone when the object is
    /// publicly editable. An empty email never edits.
    pub fn can_edit(&self, email: &str) -> bool {
        if email.is_empty() {
            return false;
        }

        if self.role_of(email).is_some_and(|r| r.can_edit()) {
            return true;
        }

        self.public.is_some_and(|r| r.can_edit())
    }
}
