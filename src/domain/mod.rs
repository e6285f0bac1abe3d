//! Domain logic for tokens and queries
//!
//! Pure functions with no I/O concerns: the token codec and the
//! structural query matcher.

pub mod base62;
mod query;
mod token;

pub use query::{matches, Document};
pub use token::{
    generate, generate_with, is_valid, parse, swap_prefix, ParsedToken, CURRENT_GENERATION,
    DEFAULT_ENTROPY,
};
