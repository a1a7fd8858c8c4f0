//! Shared type definitions for the Familiar terminal pet.
//!
//! This crate is the single source of truth for the data that flows between
//! the engine (`familiar-core`) and the command-line shell (`familiar-cli`):
//! what gets persisted, what gets derived, and what the renderer looks up.
//!
//! # Modules
//!
//! - [`enums`] -- Conditions, interaction kinds, health modes, animation sources
//! - [`structs`] -- Pet state, interaction log, animation table entries

pub mod enums;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{AnimationSource, Condition, HealthMode, InteractionKind};
pub use structs::{AnimationConfig, Frame, Interaction, InteractionLog, PetState};
