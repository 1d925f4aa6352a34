//! Core domain models for pshield
//!
//! This crate contains:
//! - Entity types, candidate and accepted matches
//! - The placeholder grammar (`[TYPE_n]`)
//! - The per-run mapping store and the reveal/display toggle
//! - Options and outcome of a `protect` run

pub mod display;
pub mod entity;
pub mod error;
pub mod mapping;
pub mod placeholder;
pub mod protect;

pub use display::{DisplayState, Occurrence, RevealView};
pub use entity::{AcceptedMatch, CandidateMatch, EntityType, SubstitutionMode};
pub use error::{CoreError, Result};
pub use mapping::{Aliases, MappingStore};
pub use placeholder::{Placeholder, PlaceholderSpan, find_display_placeholders, find_placeholders};
pub use protect::{NumberingOrder, ProtectOptions, ProtectOutcome};
