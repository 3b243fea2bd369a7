//! Strongly-typed document identifiers.
//!
//! Document ids are opaque strings chosen by the store (or generated here for
//! new labels). The newtypes keep label, object and customer ids from being
//! mixed up at call sites.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a label document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelId(String);

/// Identifier of a labeled object document (alert, budget, report, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

/// Identifier of a customer document (tenant boundary).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

macro_rules! impl_string_id {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Generate a fresh identifier.
            ///
            /// Uses UUIDv7 (time-ordered) in its simple form. Prefer passing IDs
            /// explicitly in tests for determinism.
            pub fn generate() -> Self {
                Self(Uuid::now_v7().simple().to_string())
            }

            /// Wrap an id without validation. Empty ids are representable so
            /// the store can report them with a precise error.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.is_empty() {
                    return Err(DomainError::invalid_id(format!("{}: empty", $name)));
                }
                if s.contains('/') {
                    return Err(DomainError::invalid_id(format!(
                        "{}: '{}' contains a path separator",
                        $name, s
                    )));
                }
                Ok(Self(s.to_string()))
            }
        }
    };
}

impl_string_id!(LabelId, "LabelId");
impl_string_id!(ObjectId, "ObjectId");
impl_string_id!(CustomerId, "CustomerId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_and_path_safe() {
        let a = LabelId::generate();
        let b = LabelId::generate();
        assert_ne!(a, b);
        assert!(!a.as_str().contains('/'));
        assert_eq!(a.as_str().len(), 32);
    }

    #[test]
    fn parse_rejects_empty_and_path_like_ids() {
        assert!(matches!("".parse::<ObjectId>(), Err(DomainError::InvalidId(_))));
        assert!(matches!("a/b".parse::<ObjectId>(), Err(DomainError::InvalidId(_))));
        assert_eq!("abc".parse::<ObjectId>().unwrap(), ObjectId::new("abc"));
    }
}
