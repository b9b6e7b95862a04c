#![deny(warnings)]

//! Editing surface for the event tree.
//!
//! An [`EventWorkspace`] holds the in-memory draft of one event and its
//! nested choices and consequences. Designers edit one choice or one
//! consequence at a time, but every save persists the entire event tree as
//! a single write, optimistically mirrored into the client cache and rolled
//! back when the backend rejects it.

pub mod draft;
pub mod route;
pub mod workspace;

pub use draft::{ChoiceDraft, ConsequenceDraft, DelayedDraft, EventDraft};
pub use route::Route;
pub use workspace::{EditError, EventWorkspace, Operation};
