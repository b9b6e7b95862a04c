#![deny(warnings)]

//! Structural validation and import/export for pasted event JSON.
//!
//! The validator walks an already-parsed [`serde_json::Value`] against the
//! event shape and collects every violation as a path-qualified message, so
//! one import attempt reports all problems at once. Import is all-or-nothing
//! across a batch; export writes the same shape back out.

pub mod import;
pub mod validator;

pub use import::{autofill_event, export_events, import_events, ImportError};
pub use validator::{validate_and_get_errors, validate_game_event};
