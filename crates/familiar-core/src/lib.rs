//! Decay, condition, and animation-key engine for the Familiar terminal pet.
//!
//! This crate contains the logic layer -- everything that operates on pet
//! state without touching persisted files. It sits between `familiar-types`
//! (which defines the data structures) and `familiar-cli` (which handles
//! discovery, storage, and rendering).
//!
//! Every function takes `now` explicitly, so callers and tests drive time.
//!
//! # Modules
//!
//! - [`actions`] -- Interaction commands: feed, play, rest, heal, awaken, and friends
//! - [`animation`] -- Animation key selection and frame playback timing
//! - [`conditions`] -- Condition derivation ([`DerivedStatus`], [`ConditionSet`])
//! - [`config`] -- Per-pet configuration ([`PetConfig`]) and its YAML loader
//! - [`decay`] -- Time-step decay with sleep splitting ([`apply_time_step`])
//! - [`error`] -- Refusals from interaction commands ([`PetError`])
//! - [`health`] -- Health computation, vital clamping, health bands
//! - [`interactions`] -- Interaction recording and loneliness windowing

pub mod actions;
pub mod animation;
pub mod conditions;
pub mod config;
pub mod decay;
pub mod error;
pub mod health;
pub mod interactions;

// Re-export primary types at crate root for convenience.
pub use actions::{Acknowledgement, Awakening, Response, RestOutcome};
pub use animation::{AnimationKeys, choose_animation_key, playback};
pub use conditions::{ConditionSet, DerivedStatus, derive_status, evaluate, format_conditions};
pub use config::{ConfigError, PetConfig};
pub use decay::{TimeStepReport, apply_time_step};
pub use error::PetError;
pub use health::{HealthBand, compute_health};
