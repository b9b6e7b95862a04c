#![deny(warnings)]

//! Client-side cache and persistence port for the content studio.
//!
//! The cache is an explicit service with typed keys and an optimistic
//! [`Transaction`] wrapper: a mutation is applied to the cached list before
//! the backend answers, committed when the write succeeds and rolled back to
//! the pre-mutation snapshot when it is rejected. The backend itself sits
//! behind the [`EventStore`] trait; [`MemoryStore`] is the in-process
//! implementation used by tests and the CLI.

pub mod cache;
pub mod kind;
pub mod store;

pub use cache::{CacheKey, ListCache, Transaction};
pub use kind::EntityKind;
pub use store::{EventStore, MemoryStore, StoreError};
