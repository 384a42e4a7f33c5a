//! Data-driven content definitions and loaders.
//!
//! This crate houses the static match content and provides loaders for
//! RON/TOML data files:
//! - Character tables (data-driven via RON): body, movement, specials
//! - Shared normal attacks and their button bindings (RON)
//! - Match rules (data-driven via TOML)
//!
//! Content is handed to the match clock once at setup and never changes during
//! a match. The builtin roster is compiled in, so a binary can run without a
//! data directory.

pub mod error;
pub mod validate;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use error::ContentError;
pub use validate::validate_character;

#[cfg(feature = "loaders")]
pub use loaders::{
    CharacterLoader, CharacterSpec, ConfigLoader, ContentFactory, LoadResult, NormalSet, Roster,
};
