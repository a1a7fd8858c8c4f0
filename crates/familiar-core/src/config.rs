//! Configuration loading and typed config structures for a familiar.
//!
//! A pet's configuration lives in `pet.yaml` beside its state file. This
//! module defines the strongly-typed [`PetConfig`] that mirrors the YAML
//! structure and a loader that reads it. Every field has a serde default so
//! partial files load; zero values that would make the engine misbehave
//! (sleep duration, interaction threshold) are replaced at use time.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use familiar_types::{AnimationConfig, HealthMode, PetState};
use serde::{Deserialize, Serialize};

/// Sleep duration used when the configured one is zero.
pub const DEFAULT_SLEEP_DURATION: Duration = Duration::from_secs(30 * 60);

/// Interaction count used when the configured threshold is zero.
pub const DEFAULT_INTERACTION_THRESHOLD: u32 = 3;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Immutable per-load configuration of a single pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetConfig {
    /// The pet's name.
    #[serde(default = "default_name")]
    pub name: String,

    /// Template the pet was summoned from (`cat`, ...).
    #[serde(default = "default_pet_type")]
    pub pet_type: String,

    /// Highest evolution stage the pet can reach.
    #[serde(default = "default_max_evolution")]
    pub max_evolution: u32,

    /// When the pet was summoned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Master switch for time-based decay.
    #[serde(default = "default_true")]
    pub decay_enabled: bool,

    /// Base multiplier applied to every per-hour rate.
    #[serde(default = "default_decay_rate")]
    pub decay_rate: f64,

    /// Hunger gained per awake hour.
    #[serde(default = "default_hunger_decay_per_hour")]
    pub hunger_decay_per_hour: f64,

    /// Happiness lost per awake hour.
    #[serde(default = "default_happiness_decay_per_hour")]
    pub happiness_decay_per_hour: f64,

    /// Energy lost per awake hour.
    #[serde(default = "default_energy_decay_per_hour")]
    pub energy_decay_per_hour: f64,

    /// Health below which the pet turns to stone.
    #[serde(default = "default_stone_threshold")]
    pub stone_threshold: u32,

    /// Whether low health alone reports the pet as infirm.
    #[serde(default = "default_true")]
    pub infirm_enabled: bool,

    /// Extra decay multiplier while infirm.
    #[serde(default = "default_infirm_decay_multiplier")]
    pub infirm_decay_multiplier: f64,

    /// Extra decay multiplier while stone.
    #[serde(default = "default_stone_decay_multiplier")]
    pub stone_decay_multiplier: f64,

    /// How long a rest lasts. Accepts `"30m"`, `"1h30m"`, or whole minutes.
    #[serde(default = "default_sleep_duration", with = "duration_text")]
    pub sleep_duration: Duration,

    /// How vitals combine into health.
    #[serde(default)]
    pub health_computation: HealthMode,

    /// Interactions needed in the trailing day to avoid loneliness.
    #[serde(default = "default_interaction_threshold")]
    pub interaction_threshold: u32,

    /// Whether multi-frame animations may be played on a terminal.
    #[serde(default)]
    pub allow_ansi_animations: bool,

    /// Animation table keyed by animation key.
    #[serde(default)]
    pub animations: BTreeMap<String, AnimationConfig>,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            pet_type: default_pet_type(),
            max_evolution: default_max_evolution(),
            created_at: None,
            decay_enabled: true,
            decay_rate: default_decay_rate(),
            hunger_decay_per_hour: default_hunger_decay_per_hour(),
            happiness_decay_per_hour: default_happiness_decay_per_hour(),
            energy_decay_per_hour: default_energy_decay_per_hour(),
            stone_threshold: default_stone_threshold(),
            infirm_enabled: true,
            infirm_decay_multiplier: default_infirm_decay_multiplier(),
            stone_decay_multiplier: default_stone_decay_multiplier(),
            sleep_duration: default_sleep_duration(),
            health_computation: HealthMode::default(),
            interaction_threshold: default_interaction_threshold(),
            allow_ansi_animations: false,
            animations: BTreeMap::new(),
        }
    }
}

impl PetConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Sleep duration to use, substituting 30 minutes for zero.
    pub fn effective_sleep_duration(&self) -> TimeDelta {
        let duration = if self.sleep_duration.is_zero() {
            DEFAULT_SLEEP_DURATION
        } else {
            self.sleep_duration
        };
        TimeDelta::from_std(duration).unwrap_or_else(|_| TimeDelta::minutes(30))
    }

    /// Loneliness threshold to use, substituting 3 for zero.
    pub const fn effective_interaction_threshold(&self) -> u32 {
        if self.interaction_threshold == 0 {
            DEFAULT_INTERACTION_THRESHOLD
        } else {
            self.interaction_threshold
        }
    }

    /// Combined decay multiplier for the pet's current flags.
    ///
    /// Infirm and stone multipliers compose with the base rate.
    pub fn decay_multiplier(&self, state: &PetState) -> f64 {
        let mut multiplier = self.decay_rate;
        if state.is_infirm {
            multiplier *= self.infirm_decay_multiplier;
        }
        if state.is_stone {
            multiplier *= self.stone_decay_multiplier;
        }
        multiplier
    }

    /// The name to show for this pet, honouring the state's override.
    pub fn display_name<'a>(&'a self, state: &'a PetState) -> &'a str {
        match state.name_override.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.name,
        }
    }
}

/// Serde adapter for human-readable durations.
///
/// Serializes as the coarsest exact unit (`"2h"`, `"30m"`, `"45s"`).
/// Deserializes from a unit string (`h`, `m`, `s`, `ms`, combinable as in
/// `"1h30m"`) or from a bare integer number of minutes.
pub mod duration_text {
    use std::time::Duration;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    /// Serialize a duration as a unit string.
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(*duration))
    }

    /// Deserialize a duration from a unit string or whole minutes.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        deserializer.deserialize_any(DurationVisitor)
    }

    /// Render a duration in its coarsest exact unit.
    pub fn format(duration: Duration) -> String {
        let millis = duration.as_millis();
        if millis == 0 {
            return String::from("0s");
        }
        if !millis.is_multiple_of(1000) {
            return format!("{millis}ms");
        }
        let secs = duration.as_secs();
        if secs.is_multiple_of(3600) {
            format!("{}h", secs / 3600)
        } else if secs.is_multiple_of(60) {
            format!("{}m", secs / 60)
        } else {
            format!("{secs}s")
        }
    }

    /// Parse a unit string such as `"1h30m"` or `"250ms"`.
    ///
    /// A bare number without a unit is read as minutes.
    pub fn parse(text: &str) -> Result<Duration, String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(String::from("empty duration"));
        }
        if let Ok(minutes) = text.parse::<u64>() {
            return minutes_to_duration(minutes);
        }

        let mut total_ms: u64 = 0;
        let mut number: Option<u64> = None;
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            if let Some(digit) = c.to_digit(10) {
                let current = number.unwrap_or(0);
                number = Some(
                    current
                        .checked_mul(10)
                        .and_then(|n| n.checked_add(u64::from(digit)))
                        .ok_or_else(|| format!("duration too large: {text}"))?,
                );
                continue;
            }
            let value = number
                .take()
                .ok_or_else(|| format!("missing number before '{c}' in {text}"))?;
            let unit_ms: u64 = match c {
                'h' => 3_600_000,
                'm' if chars.peek() == Some(&'s') => {
                    chars.next();
                    1
                }
                'm' => 60_000,
                's' => 1_000,
                other => return Err(format!("unknown duration unit '{other}' in {text}")),
            };
            total_ms = value
                .checked_mul(unit_ms)
                .and_then(|ms| total_ms.checked_add(ms))
                .ok_or_else(|| format!("duration too large: {text}"))?;
        }
        if number.is_some() {
            return Err(format!("missing unit at end of {text}"));
        }
        Ok(Duration::from_millis(total_ms))
    }

    fn minutes_to_duration(minutes: u64) -> Result<Duration, String> {
        minutes
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(|| format!("duration too large: {minutes} minutes"))
    }

    struct DurationVisitor;

    impl Visitor<'_> for DurationVisitor {
        type Value = Duration;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a duration string like \"30m\" or a whole number of minutes")
        }

        fn visit_u64<E: de::Error>(self, minutes: u64) -> Result<Duration, E> {
            minutes_to_duration(minutes).map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, minutes: i64) -> Result<Duration, E> {
            let minutes = u64::try_from(minutes)
                .map_err(|_err| E::custom("duration cannot be negative"))?;
            self.visit_u64(minutes)
        }

        fn visit_str<E: de::Error>(self, text: &str) -> Result<Duration, E> {
            parse(text).map_err(E::custom)
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

fn default_name() -> String {
    "Familiar".to_owned()
}

fn default_pet_type() -> String {
    "cat".to_owned()
}

const fn default_max_evolution() -> u32 {
    5
}

const fn default_decay_rate() -> f64 {
    1.0
}

const fn default_hunger_decay_per_hour() -> f64 {
    2.0
}

const fn default_happiness_decay_per_hour() -> f64 {
    1.5
}

const fn default_energy_decay_per_hour() -> f64 {
    1.0
}

const fn default_stone_threshold() -> u32 {
    10
}

const fn default_infirm_decay_multiplier() -> f64 {
    1.5
}

const fn default_stone_decay_multiplier() -> f64 {
    0.1
}

const fn default_sleep_duration() -> Duration {
    DEFAULT_SLEEP_DURATION
}

const fn default_interaction_threshold() -> u32 {
    DEFAULT_INTERACTION_THRESHOLD
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = PetConfig::default();
        assert!(cfg.decay_enabled);
        assert_eq!(cfg.stone_threshold, 10);
        assert_eq!(cfg.interaction_threshold, 3);
        assert_eq!(cfg.sleep_duration, Duration::from_secs(1800));
        assert_eq!(cfg.health_computation, HealthMode::Average);
        assert!(cfg.animations.is_empty());
    }

    #[test]
    fn parse_empty_yaml() {
        let cfg = PetConfig::parse("{}").unwrap_or_else(|_| PetConfig {
            name: String::from("broken"),
            ..PetConfig::default()
        });
        assert_eq!(cfg, PetConfig::default());
    }

    #[test]
    fn parse_partial_yaml() {
        let yaml = r#"
name: Ember
stone_threshold: 20
health_computation: weighted
sleep_duration: "1h30m"
animations:
  default:
    frames:
      - art: "(o.o)"
  e2:hungry:
    fps: 4
    loops: 2
    frames:
      - art: "(>.<)"
      - art: "(<.>)"
        ms: 120
"#;
        let cfg = PetConfig::parse(yaml);
        assert!(cfg.is_ok(), "parse failed: {cfg:?}");
        let cfg = cfg.unwrap_or_default();
        assert_eq!(cfg.name, "Ember");
        assert_eq!(cfg.stone_threshold, 20);
        assert_eq!(cfg.health_computation, HealthMode::Weighted);
        assert_eq!(cfg.sleep_duration, Duration::from_secs(5400));
        assert_eq!(cfg.animations.len(), 2);
        let hungry = cfg.animations.get("e2:hungry").cloned().unwrap_or_default();
        assert_eq!(hungry.fps, 4);
        assert_eq!(hungry.frames.len(), 2);
        assert_eq!(hungry.frames.get(1).map(|f| f.ms), Some(120));
        // Untouched fields keep their defaults.
        assert!(cfg.infirm_enabled);
        assert_eq!(cfg.interaction_threshold, 3);
    }

    #[test]
    fn sleep_duration_accepts_whole_minutes() {
        let cfg = PetConfig::parse("sleep_duration: 45").unwrap_or_default();
        assert_eq!(cfg.sleep_duration, Duration::from_secs(45 * 60));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let result = PetConfig::parse("stone_threshold: [1, 2");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn unknown_health_mode_falls_back() {
        let cfg = PetConfig::parse("health_computation: geometric").unwrap_or_default();
        assert_eq!(cfg.health_computation, HealthMode::Unknown);
    }

    #[test]
    fn zero_values_use_defaults() {
        let cfg = PetConfig {
            sleep_duration: Duration::ZERO,
            interaction_threshold: 0,
            ..PetConfig::default()
        };
        assert_eq!(cfg.effective_sleep_duration(), TimeDelta::minutes(30));
        assert_eq!(cfg.effective_interaction_threshold(), 3);
    }

    #[test]
    fn multipliers_compose() {
        let cfg = PetConfig {
            decay_rate: 2.0,
            infirm_decay_multiplier: 1.5,
            stone_decay_multiplier: 0.5,
            ..PetConfig::default()
        };
        let mut state = PetState::default();
        assert!((cfg.decay_multiplier(&state) - 2.0).abs() < f64::EPSILON);
        state.is_infirm = true;
        assert!((cfg.decay_multiplier(&state) - 3.0).abs() < f64::EPSILON);
        state.is_stone = true;
        assert!((cfg.decay_multiplier(&state) - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn display_name_prefers_override() {
        let cfg = PetConfig::default();
        let mut state = PetState::default();
        assert_eq!(cfg.display_name(&state), "Familiar");
        state.name_override = Some(String::new());
        assert_eq!(cfg.display_name(&state), "Familiar");
        state.name_override = Some(String::from("Whisper"));
        assert_eq!(cfg.display_name(&state), "Whisper");
    }

    #[test]
    fn duration_text_parses_units() {
        assert_eq!(duration_text::parse("30m"), Ok(Duration::from_secs(1800)));
        assert_eq!(duration_text::parse("2h"), Ok(Duration::from_secs(7200)));
        assert_eq!(duration_text::parse("1h30m15s"), Ok(Duration::from_secs(5415)));
        assert_eq!(duration_text::parse("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(duration_text::parse("10"), Ok(Duration::from_secs(600)));
        assert!(duration_text::parse("").is_err());
        assert!(duration_text::parse("5d").is_err());
        assert!(duration_text::parse("h").is_err());
        assert!(duration_text::parse("1h30").is_err());
    }

    #[test]
    fn duration_text_formats_coarsest_unit() {
        assert_eq!(duration_text::format(Duration::from_secs(7200)), "2h");
        assert_eq!(duration_text::format(Duration::from_secs(1800)), "30m");
        assert_eq!(duration_text::format(Duration::from_secs(45)), "45s");
        assert_eq!(duration_text::format(Duration::from_millis(1500)), "1500ms");
        assert_eq!(duration_text::format(Duration::ZERO), "0s");
    }

    #[test]
    fn config_round_trips_through_yaml() {
        let cfg = PetConfig {
            name: String::from("Pip"),
            sleep_duration: Duration::from_secs(20 * 60),
            ..PetConfig::default()
        };
        let yaml = serde_yml::to_string(&cfg).unwrap_or_default();
        assert!(yaml.contains("sleep_duration: 20m"));
        let back = PetConfig::parse(&yaml).unwrap_or_default();
        assert_eq!(back, cfg);
    }
}
