use serde::{Deserialize, Serialize};

/// Role a collaborator (or the public) holds on a shared object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollaboratorRole {
    Viewer,
    Editor,
    Owner,
}

impl CollaboratorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollaboratorRole::Viewer => "viewer",
            CollaboratorRole::Editor => "editor",
            CollaboratorRole::Owner => "owner",
        }
    }

    /// Owners and editors may modify the object (including its labels).
    pub fn can_edit(&self) -> bool {
        matches!(self, CollaboratorRole::Editor | CollaboratorRole::Owner)
    }
}

impl core::fmt::Display for CollaboratorRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_the_stored_role_name() {
        for role in [CollaboratorRole::Viewer, CollaboratorRole::Editor, CollaboratorRole::Owner] {
            let stored = serde_json::to_value(role).unwrap();
            assert_eq!(stored, role.to_string());
        }
        assert!(CollaboratorRole::Viewer < CollaboratorRole::Editor);
        assert!(!CollaboratorRole::Viewer.can_edit());
    }
}
