//! Locating a pet's files on disk.
//!
//! A pet lives in a `.familiar/` directory holding `pet.yaml` (config) and
//! `pet.state.yaml` (state). Discovery walks up from the working directory
//! looking for a state file and falls back to the one in the home directory.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CliError;

/// Directory name holding a pet's files.
pub const PET_DIR: &str = ".familiar";
/// Config file name inside [`PET_DIR`].
pub const CONFIG_FILE: &str = "pet.yaml";
/// State file name inside [`PET_DIR`].
pub const STATE_FILE: &str = "pet.state.yaml";

/// The pair of files that make up one pet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetPaths {
    /// The `.familiar` directory.
    pub dir: PathBuf,
    /// The config file.
    pub config: PathBuf,
    /// The state file.
    pub state: PathBuf,
}

impl PetPaths {
    /// The standard file names inside a pet directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            config: dir.join(CONFIG_FILE),
            state: dir.join(STATE_FILE),
            dir,
        }
    }

    /// Paths for a known state file; the config sits beside it.
    pub fn from_state(state: impl Into<PathBuf>) -> Self {
        let state = state.into();
        let dir = state
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Self {
            config: dir.join(CONFIG_FILE),
            dir,
            state,
        }
    }
}

/// Walk up from `start` looking for `.familiar/pet.state.yaml`.
pub fn find_state_file(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PET_DIR).join(STATE_FILE))
        .find(|candidate| candidate.is_file())
}

/// The pet directory under the user's home.
pub fn global_pet_dir() -> Result<PathBuf, CliError> {
    home::home_dir()
        .map(|home| home.join(PET_DIR))
        .ok_or(CliError::NoHomeDirectory)
}

/// Resolve which pet a command acts on.
///
/// An explicit state path wins. Otherwise the nearest pet above `cwd`,
/// then the global pet.
pub fn locate(explicit: Option<&Path>, cwd: &Path) -> Result<PetPaths, CliError> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(CliError::StateNotFound {
                path: path.to_path_buf(),
            });
        }
        return Ok(PetPaths::from_state(path));
    }

    if let Some(state) = find_state_file(cwd) {
        debug!(path = %state.display(), "discovered familiar");
        return Ok(PetPaths::from_state(state));
    }

    let global = PetPaths::in_dir(global_pet_dir()?);
    if global.state.is_file() {
        debug!(path = %global.state.display(), "using global familiar");
        return Ok(global);
    }
    Err(CliError::NoFamiliar)
}
