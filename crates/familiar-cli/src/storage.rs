//! Reading and writing a pet's files.
//!
//! State and config are YAML. Every write goes to a temporary sibling file
//! that is then renamed over the target, so a crash mid-write never leaves
//! a truncated file behind.
//!
//! Dismissed pets are kept beside the live one as
//! `pet.<name>.released.<unix>.yaml` and `pet.state.<name>.released.<unix>.yaml`.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use familiar_core::PetConfig;
use familiar_types::PetState;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::discovery::PetPaths;
use crate::error::CliError;

const RELEASED_MARKER: &str = ".released.";
const STATE_PREFIX: &str = "pet.state.";
const CONFIG_PREFIX: &str = "pet.";
const YAML_SUFFIX: &str = ".yaml";

/// Load a pet's state file.
pub fn load_state(path: &Path) -> Result<PetState, CliError> {
    let contents = std::fs::read_to_string(path).map_err(CliError::io("read", path))?;
    serde_yml::from_str(&contents).map_err(|source| CliError::StateYaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a pet's config and state.
pub fn load(paths: &PetPaths) -> Result<(PetConfig, PetState), CliError> {
    let state = load_state(&paths.state)?;
    let config = PetConfig::from_file(&paths.config)?;
    debug!(path = %paths.state.display(), name = %config.name, "loaded familiar");
    Ok((config, state))
}

/// Serialize `value` as YAML and atomically replace `path` with it.
pub fn write_yaml<T: Serialize>(path: &Path, value: &T) -> Result<(), CliError> {
    let yaml = serde_yml::to_string(value)?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(CliError::io("create", dir))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(CliError::io("create temp file in", dir))?;
    tmp.write_all(yaml.as_bytes())
        .map_err(CliError::io("write", tmp.path().to_path_buf()))?;
    tmp.persist(path)
        .map_err(|err| CliError::io("replace", path)(err.error))?;
    Ok(())
}

/// Save a pet's state.
pub fn save_state(path: &Path, state: &PetState) -> Result<(), CliError> {
    write_yaml(path, state)
}

/// Write a brand-new pet, refusing to overwrite a live one.
pub fn create(paths: &PetPaths, config: &PetConfig, state: &PetState) -> Result<(), CliError> {
    if paths.state.exists() {
        return Err(CliError::AlreadyExists {
            path: paths.state.clone(),
        });
    }
    write_yaml(&paths.config, config)?;
    write_yaml(&paths.state, state)?;
    info!(dir = %paths.dir.display(), name = %config.name, "summoned familiar");
    Ok(())
}

/// A dismissed pet waiting to be summoned back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasedPet {
    /// Name recorded in the file names.
    pub name: String,
    /// Unix time of the dismissal.
    pub released_at: i64,
    /// Parked config file.
    pub config: PathBuf,
    /// Parked state file.
    pub state: PathBuf,
}

/// Make a pet name safe to embed in a file name.
fn file_safe(name: &str) -> String {
    name.chars()
        .map(|c| if matches!(c, ' ' | '/' | '\\') { '_' } else { c })
        .collect()
}

/// Park a pet's files under released names.
pub fn release(paths: &PetPaths, name: &str, now: DateTime<Utc>) -> Result<ReleasedPet, CliError> {
    let stamp = now.timestamp();
    let safe = file_safe(name);
    let released = ReleasedPet {
        name: safe.clone(),
        released_at: stamp,
        config: paths.dir.join(format!("{CONFIG_PREFIX}{safe}{RELEASED_MARKER}{stamp}{YAML_SUFFIX}")),
        state: paths.dir.join(format!("{STATE_PREFIX}{safe}{RELEASED_MARKER}{stamp}{YAML_SUFFIX}")),
    };

    std::fs::rename(&paths.config, &released.config).map_err(CliError::io("rename", &paths.config))?;
    if let Err(err) = std::fs::rename(&paths.state, &released.state) {
        // Put the config back so the pet stays whole.
        if let Err(rollback) = std::fs::rename(&released.config, &paths.config) {
            warn!(error = %rollback, "failed to restore config after aborted dismiss");
        }
        return Err(CliError::io("rename", &paths.state)(err));
    }
    info!(name, stamp, "dismissed familiar");
    Ok(released)
}

/// Permanently delete a pet's files.
pub fn banish(paths: &PetPaths) -> Result<(), CliError> {
    std::fs::remove_file(&paths.config).map_err(CliError::io("delete", &paths.config))?;
    std::fs::remove_file(&paths.state).map_err(CliError::io("delete", &paths.state))?;
    info!(dir = %paths.dir.display(), "banished familiar");
    Ok(())
}

/// Parse `pet.state.<name>.released.<unix>.yaml` into its name and time.
fn parse_released(file_name: &str) -> Option<(String, i64)> {
    let inner = file_name
        .strip_prefix(STATE_PREFIX)?
        .strip_suffix(YAML_SUFFIX)?;
    let (name, stamp) = inner.rsplit_once(RELEASED_MARKER)?;
    if name.is_empty() {
        return None;
    }
    Some((name.to_owned(), stamp.parse().ok()?))
}

/// Every dismissed pet in `dir`, most recent first.
pub fn list_released(dir: &Path) -> Result<Vec<ReleasedPet>, CliError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(CliError::io("read directory", dir)(err)),
    };

    let mut released: Vec<ReleasedPet> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .filter_map(|entry| {
            let file_name = entry.file_name().into_string().ok()?;
            let (name, released_at) = parse_released(&file_name)?;
            let config_name = file_name.replacen(STATE_PREFIX, CONFIG_PREFIX, 1);
            Some(ReleasedPet {
                name,
                released_at,
                config: dir.join(config_name),
                state: entry.path(),
            })
        })
        .collect();
    released.sort_by(|a, b| b.released_at.cmp(&a.released_at));
    Ok(released)
}

/// Find a dismissed pet: the most recent one, or one by name (exact match
/// first, then case-insensitive).
pub fn find_released(dir: &Path, name: Option<&str>) -> Result<Option<ReleasedPet>, CliError> {
    let candidates = list_released(dir)?;
    let Some(name) = name else {
        return Ok(candidates.into_iter().next());
    };
    let safe = file_safe(name);
    let found = candidates
        .iter()
        .find(|r| r.name == safe)
        .or_else(|| candidates.iter().find(|r| r.name.eq_ignore_ascii_case(&safe)))
        .cloned();
    Ok(found)
}

/// Move a dismissed pet back into the live file names.
pub fn restore(dir: &Path, released: &ReleasedPet) -> Result<PetPaths, CliError> {
    let paths = PetPaths::in_dir(dir);
    if paths.state.exists() {
        return Err(CliError::AlreadyExists { path: paths.state });
    }
    std::fs::rename(&released.config, &paths.config).map_err(CliError::io("restore", &released.config))?;
    if let Err(err) = std::fs::rename(&released.state, &paths.state) {
        if let Err(rollback) = std::fs::rename(&paths.config, &released.config) {
            warn!(error = %rollback, "failed to park config after aborted restore");
        }
        return Err(CliError::io("restore", &released.state)(err));
    }
    info!(name = %released.name, "restored familiar");
    Ok(paths)
}
