//! Stash - a token-addressed, file-backed document store
//!
//! Stash mints self-describing identifiers (type prefix, format
//! generation, issuance timestamp, random entropy) and persists arbitrary
//! JSON documents under them. On top of that it offers type-scoped
//! listing, most-recent resolution with nested-predicate filtering, and
//! retention-based cleanup. Pipelines share one store by passing a
//! [`Store`] handle around; there is no global state.

pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{generate, generate_with, is_valid, parse, swap_prefix, Document, ParsedToken};
pub use storage::{Config, RetentionPolicy, Store, StoreError};
