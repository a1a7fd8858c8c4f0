//! Error types for the `familiar` binary.
//!
//! Everything that can go wrong between the command line and the engine:
//! locating the pet, reading and writing its files, and refusals from the
//! engine's interaction commands.

use std::path::PathBuf;

use familiar_core::{ConfigError, PetError};

/// Errors surfaced by the command-line shell.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// No pet state file was found by discovery or in the home directory.
    #[error("no familiar found. Run 'familiar summon' to create one")]
    NoFamiliar,

    /// An explicitly given state file does not exist.
    #[error("state file not found: {path}")]
    StateNotFound {
        /// The path that was given.
        path: PathBuf,
    },

    /// A pet already lives in the target directory.
    #[error("a familiar already exists at {path}. Use 'dismiss' first")]
    AlreadyExists {
        /// The existing state file.
        path: PathBuf,
    },

    /// The home directory could not be determined.
    #[error("could not determine the home directory")]
    NoHomeDirectory,

    /// The requested pet type has no built-in template.
    #[error("unknown pet type '{0}'")]
    UnknownPetType(String),

    /// A file operation failed.
    #[error("failed to {action} {path}: {source}")]
    Io {
        /// What was being attempted.
        action: &'static str,
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The state file is not valid YAML for a pet state.
    #[error("failed to parse state file {path}: {source}")]
    StateYaml {
        /// The state file.
        path: PathBuf,
        /// The underlying YAML error.
        source: serde_yml::Error,
    },

    /// Serializing state or config failed.
    #[error("failed to serialize: {0}")]
    Serialize(#[from] serde_yml::Error),

    /// Writing to the terminal failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// Emitting JSON failed.
    #[error("failed to emit JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The pet's configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The engine refused an interaction.
    #[error(transparent)]
    Pet(#[from] PetError),

    /// `admin art` was given a state with no matching animation.
    #[error("unknown state '{0}'. Use 'familiar admin art list' to see available states")]
    UnknownArtState(String),

    /// An animation was found but has nothing to show.
    #[error("animation '{0}' has no frames")]
    NoFrames(String),
}

impl CliError {
    /// Wrap an I/O error with the action and path involved.
    pub fn io(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io {
            action,
            path,
            source,
        }
    }
}
