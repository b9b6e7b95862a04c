#![deny(warnings)]

//! Core domain model for the content studio.
//!
//! This crate defines the serializable event/choice/consequence graph edited
//! by designers, the tagged effect variants attachable to consequences, the
//! identifier helpers used when designers leave id fields blank, and the
//! save-time validation that guards every write to the backend.

pub mod effect;
pub mod ids;
pub mod model;
pub mod validate;
mod wire;

pub use effect::{form_number, optional_form_number, Effect, EffectForm, MetricEffectKind, MetricKind};
pub use ids::{generate_unique_id, make_unique_id, slugify, EventId, IndustryId};
pub use model::{Choice, Consequence, DelayedConsequence, EventCategory, GameEvent, Requirement};
pub use validate::{validate_for_save, SaveError};
