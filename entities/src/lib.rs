//! # Entity core
//!
//! Shared vocabulary for the personal-data gateway: the closed entity-kind
//! enumeration with its ID-prefix registry, the opaque-ID generator, the
//! entity model, and the per-kind validation rules. Pure types, no I/O.

pub mod id;
pub mod kind;
pub mod model;
pub mod validate;

pub use kind::EntityKind;
pub use model::{Entity, EntityDraft, SearchHit};
pub use validate::{ValidationError, Validator};
