//! The shared entity model.
//!
//! Kind-specific fields (an event's `start_time`, a thing's `serial_number`)
//! are opaque here: they ride in the flattened `extra` map and are only ever
//! inspected through the per-kind validation rule.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::kind::EntityKind;
use crate::validate::{ValidationError, Validator};

/// A persisted entity.
///
/// `created_at` and `updated_at` are server-assigned RFC 3339 timestamps:
/// `created_at` is set once at first persistence, `updated_at` refreshed on
/// every successful write. `id` is immutable once assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity {
    /// Shallow-overlays the supplied draft fields onto this entity, keeping
    /// identity and creation time. Fields absent from the draft survive.
    #[must_use]
    pub fn merge(mut self, patch: EntityDraft) -> Entity {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        for (key, value) in patch.extra {
            self.extra.insert(key, value);
        }
        self
    }
}

/// An inbound write body. Everything is optional until validated; the server
/// generates `id` when the caller omits it and always owns `updated_at`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EntityDraft {
    /// Validates this draft as a create/replace body: non-empty `title`
    /// first, then the kind's rule, before any store call is made.
    pub fn validate(
        &self,
        kind: EntityKind,
        validator: Validator,
    ) -> Result<(), ValidationError> {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => validator.check(kind, &self.extra),
            _ => Err(ValidationError::MissingTitle),
        }
    }

    /// Materializes the draft into an entity under the given identity.
    /// A caller-supplied `updated_at` is discarded.
    #[must_use]
    pub fn into_entity(self, id: String) -> Entity {
        Entity {
            id,
            title: self.title.unwrap_or_default(),
            description: self.description,
            created_at: self.created_at,
            updated_at: None,
            extra: self.extra,
        }
    }
}

/// A ranked search result: a persisted entity plus the store's relevance
/// score and the kind namespace it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_score", default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityKind>,
    #[serde(flatten)]
    pub entity: Entity,
}
