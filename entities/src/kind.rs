//! The closed entity-kind enumeration and its ID-prefix registry.
//!
//! Every concrete kind owns a unique three-letter ID prefix and a plural
//! collection noun. The prefix table here is the single source of truth for
//! both the ID generator and the prefix resolver; they must never diverge.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::validate::Validator;

/// One of the closed set of entity categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    Task,
    Event,
    Reminder,
    Person,
    Place,
    Document,
    Memory,
    Project,
    Thing,
    Organization,
    /// Synthetic kind: a searchable namespace only, never created directly
    /// and never resolvable from an ID.
    History,
}

impl EntityKind {
    /// The registered ID prefix, `None` for search-only kinds.
    pub fn prefix(self) -> Option<&'static str> {
        match self {
            Self::Task => Some("tsk"),
            Self::Event => Some("evt"),
            Self::Reminder => Some("rem"),
            Self::Person => Some("per"),
            Self::Place => Some("plc"),
            Self::Document => Some("doc"),
            Self::Memory => Some("mem"),
            Self::Project => Some("prj"),
            Self::Thing => Some("thg"),
            Self::Organization => Some("org"),
            Self::History => None,
        }
    }

    /// Inverse prefix lookup. Anything outside the registered set is `None`.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "tsk" => Some(Self::Task),
            "evt" => Some(Self::Event),
            "rem" => Some(Self::Reminder),
            "per" => Some(Self::Person),
            "plc" => Some(Self::Place),
            "doc" => Some(Self::Document),
            "mem" => Some(Self::Memory),
            "prj" => Some(Self::Project),
            "thg" => Some(Self::Thing),
            "org" => Some(Self::Organization),
            _ => None,
        }
    }

    /// Resolves the kind encoded in an opaque `prefix_token` ID.
    pub fn from_id(id: &str) -> Option<Self> {
        let (prefix, _) = id.split_once('_')?;
        Self::from_prefix(prefix)
    }

    /// Plural noun used for route paths and store namespaces.
    pub fn collection(self) -> &'static str {
        match self {
            Self::Task => "tasks",
            Self::Event => "events",
            Self::Reminder => "reminders",
            Self::Person => "people",
            Self::Place => "places",
            Self::Document => "documents",
            Self::Memory => "memories",
            Self::Project => "projects",
            Self::Thing => "things",
            Self::Organization => "organizations",
            Self::History => "history",
        }
    }

    /// True for kinds that exist only as search targets.
    pub fn is_search_only(self) -> bool {
        matches!(self, Self::History)
    }

    /// The validation rule applied to create/replace bodies of this kind.
    pub fn validator(self) -> Validator {
        match self {
            Self::Event => Validator::RequireField("start_time"),
            Self::Reminder => Validator::RequireField("remind_at"),
            _ => Validator::Accept,
        }
    }

    /// Generates a fresh ID for this kind, `None` for search-only kinds.
    pub fn new_id(self) -> Option<String> {
        self.prefix().map(crate::id::generate)
    }
}
