//! # Storage Layer
//!
//! Persistence for token-addressed documents.
//!
//! ## Layout
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Documents | JSON, one file per token | `<root>/{token}.json` |
//! | Retention config | TOML | `<root>/stash.toml` |
//!
//! The keyspace is flat: nothing below the root but document files and
//! the optional config. Type-scoped enumeration works off the token
//! prefix, so no further hierarchy is needed.
//!
//! ## Consistency
//!
//! Writes go through a temp file and an atomic rename, so a reader never
//! sees a half-written document. Beyond that the model is deliberately
//! thin: one writer at a time, no locks, no cache, every read straight
//! from disk. [`Store::latest`] and [`Store::cleanup`] complete a full
//! scan before deciding, but are not isolated against writes landing
//! mid-scan.

mod config;
mod store;

pub use config::{Config, RetentionPolicy, CONFIG_FILE};
pub use store::{List, Store, StoreError};
