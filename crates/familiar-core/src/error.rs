//! Error types for the familiar-core crate.
//!
//! The decay engine, condition deriver, and key selector are total and never
//! fail. Only the user-facing interaction commands in [`crate::actions`]
//! can refuse, and they do so with a [`PetError`].

/// Errors returned when an interaction command cannot be carried out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PetError {
    /// The pet is stone and cannot be fed, played with, or put to rest.
    #[error("{name} is stone and cannot respond")]
    Stone {
        /// Display name of the pet.
        name: String,
    },

    /// Ossify was requested for a pet that is already stone.
    #[error("{name} is already stone")]
    AlreadyStone {
        /// Display name of the pet.
        name: String,
    },

    /// Awaken was requested for a pet that is neither stone nor asleep.
    #[error("{name} is not stone or asleep (currently {state})")]
    NotStoneOrAsleep {
        /// Display name of the pet.
        name: String,
        /// Formatted condition list describing the current state.
        state: String,
    },
}
