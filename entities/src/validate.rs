//! Per-kind validation rules.
//!
//! Rules are plain values so every entity router can be parameterized by the
//! rule it enforces instead of reaching into kind-specific field layouts.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::kind::EntityKind;

/// A rejected write body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,

    #[error("{field} is required for {collection}")]
    MissingField {
        field: &'static str,
        collection: &'static str,
    },
}

/// A validation rule attached to an entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validator {
    /// No kind-specific requirement.
    #[default]
    Accept,
    /// The named field must be present and non-empty in the write body.
    RequireField(&'static str),
}

impl Validator {
    /// Checks the kind-specific fields of a write body against this rule.
    pub fn check(
        self,
        kind: EntityKind,
        fields: &Map<String, Value>,
    ) -> Result<(), ValidationError> {
        match self {
            Self::Accept => Ok(()),
            Self::RequireField(field) => {
                let missing = ValidationError::MissingField {
                    field,
                    collection: kind.collection(),
                };
                match fields.get(field) {
                    Some(value) if !value.is_null() => {
                        // an empty string counts as absent
                        if value.as_str().is_some_and(|s| s.trim().is_empty()) {
                            Err(missing)
                        } else {
                            Ok(())
                        }
                    }
                    _ => Err(missing),
                }
            }
        }
    }
}
