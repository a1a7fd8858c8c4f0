//! Condition derivation.
//!
//! Turns the current vitals, flags, and interaction history into the set of
//! named [`Condition`]s that describe the pet, plus the single primary one.
//! Derivation is pure: it reads state and returns a fresh [`DerivedStatus`]
//! that is never persisted.
//!
//! Conditions are checked in priority order (see [`Condition::PRIORITY`]).
//! A sleeping pet is never reported as lonely, hungry, tired, or sad.

use chrono::{DateTime, Utc};
use familiar_types::{Condition, PetState};
use serde::Serialize;

use crate::config::PetConfig;
use crate::health::compute_health;
use crate::interactions::is_lonely;

/// Health below which an infirm-enabled pet reads as infirm.
pub const INFIRM_HEALTH: u32 = 30;
/// The literal hunger rule: hungry below this value.
pub const HUNGRY_BELOW: u32 = 50;
/// Tired below this energy.
pub const TIRED_BELOW: u32 = 40;
/// Sad below this happiness.
pub const SAD_BELOW: u32 = 50;
/// Every vital above this value also marks the pet as happy.
pub const THRIVING_ABOVE: u32 = 70;

/// An insertion-ordered set of conditions without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConditionSet(Vec<Condition>);

impl ConditionSet {
    /// An empty set.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a condition unless it is already present.
    pub fn insert(&mut self, condition: Condition) {
        if !self.contains(condition) {
            self.0.push(condition);
        }
    }

    /// Whether the condition is active.
    pub fn contains(&self, condition: Condition) -> bool {
        self.0.contains(&condition)
    }

    /// The first condition inserted, or [`Condition::Happy`] when empty.
    pub fn primary(&self) -> Condition {
        self.0.first().copied().unwrap_or(Condition::Happy)
    }

    /// The conditions in insertion order.
    pub fn as_slice(&self) -> &[Condition] {
        &self.0
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = Condition> + '_ {
        self.0.iter().copied()
    }

    /// Number of active conditions.
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no condition is active.
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Condition> for ConditionSet {
    fn from_iter<I: IntoIterator<Item = Condition>>(iter: I) -> Self {
        let mut set = Self::new();
        for condition in iter {
            set.insert(condition);
        }
        set
    }
}

/// The ephemeral status of a pet at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedStatus {
    /// Health the conditions were derived from.
    pub health: u32,
    /// Active conditions in priority order.
    pub conditions: ConditionSet,
    /// The highest-priority active condition.
    pub primary: Condition,
}

/// Derive the conditions for a pet at `now`, given its current health.
pub fn derive_status(
    state: &PetState,
    config: &PetConfig,
    now: DateTime<Utc>,
    health: u32,
) -> DerivedStatus {
    let mut conditions = ConditionSet::new();

    if state.has_message() {
        conditions.insert(Condition::HasMessage);
    }
    if state.is_stone || health < config.stone_threshold {
        conditions.insert(Condition::Stone);
    }
    if state.is_infirm || (config.infirm_enabled && health < INFIRM_HEALTH) {
        conditions.insert(Condition::Infirm);
    }

    if state.is_asleep {
        conditions.insert(Condition::Asleep);
    } else {
        if is_lonely(
            &state.interactions,
            now,
            config.effective_interaction_threshold(),
        ) {
            conditions.insert(Condition::Lonely);
        }
        if state.hunger < HUNGRY_BELOW {
            conditions.insert(Condition::Hungry);
        }
        if state.energy < TIRED_BELOW {
            conditions.insert(Condition::Tired);
        }
        if state.happiness < SAD_BELOW {
            conditions.insert(Condition::Sad);
        }
    }

    let thriving = state.hunger > THRIVING_ABOVE
        && state.happiness > THRIVING_ABOVE
        && state.energy > THRIVING_ABOVE;
    if conditions.is_empty() || thriving {
        conditions.insert(Condition::Happy);
    }

    let primary = conditions.primary();
    DerivedStatus {
        health,
        conditions,
        primary,
    }
}

/// Compute health from the state's vitals and derive its status.
pub fn evaluate(state: &PetState, config: &PetConfig, now: DateTime<Utc>) -> DerivedStatus {
    let health = compute_health(
        state.hunger,
        state.happiness,
        state.energy,
        config.health_computation,
    );
    derive_status(state, config, now, health)
}

/// Render an ordered condition list as a short human phrase.
///
/// - Empty: `"happy"`
/// - Stone dominates: `"stone"`, plus `" and has a message"` if one is
///   pending
/// - Otherwise the other names joined with `", "`, with the message suffix
///   when present
/// - Only a message: `"has-message"`
pub fn format_conditions(conditions: &[Condition]) -> String {
    const MESSAGE_SUFFIX: &str = " and has a message";

    if conditions.is_empty() {
        return Condition::Happy.as_str().to_owned();
    }

    let has_message = conditions.contains(&Condition::HasMessage);
    if conditions.contains(&Condition::Stone) {
        let mut text = Condition::Stone.as_str().to_owned();
        if has_message {
            text.push_str(MESSAGE_SUFFIX);
        }
        return text;
    }

    let names: Vec<&str> = conditions
        .iter()
        .filter(|c| **c != Condition::HasMessage)
        .map(|c| c.as_str())
        .collect();
    if names.is_empty() {
        return Condition::HasMessage.as_str().to_owned();
    }

    let mut text = names.join(", ");
    if has_message {
        text.push_str(MESSAGE_SUFFIX);
    }
    text
}

#[cfg(test)]
mod tests {
    use familiar_types::{Interaction, InteractionKind};

    use super::*;

    const HOUR: i64 = 3600;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap_or_default()
    }

    /// A pet with three fresh interactions, so it is not lonely at `at(10h)`.
    fn sociable(hunger: u32, happiness: u32, energy: u32) -> PetState {
        let mut state = PetState {
            hunger,
            happiness,
            energy,
            ..PetState::default()
        };
        for action in [InteractionKind::Feed, InteractionKind::Play, InteractionKind::Visit] {
            state.interactions.record(Interaction {
                time: at(9 * HOUR),
                action,
            });
        }
        state
    }

    #[test]
    fn set_dedups_and_keeps_order() {
        let set: ConditionSet = [Condition::Sad, Condition::Lonely, Condition::Sad]
            .into_iter()
            .collect();
        assert_eq!(set.as_slice(), &[Condition::Sad, Condition::Lonely]);
        assert_eq!(set.primary(), Condition::Sad);
        assert_eq!(ConditionSet::new().primary(), Condition::Happy);
    }

    #[test]
    fn message_outranks_stone() {
        let cfg = PetConfig::default();
        let state = PetState {
            message: Some(String::from("hello")),
            is_stone: true,
            ..sociable(60, 60, 60)
        };
        let status = derive_status(&state, &cfg, at(10 * HOUR), 50);
        assert_eq!(status.primary, Condition::HasMessage);
        assert!(status.conditions.contains(Condition::Stone));
    }

    #[test]
    fn stone_from_low_health_without_flag() {
        let cfg = PetConfig::default();
        let state = sociable(60, 60, 60);
        let status = derive_status(&state, &cfg, at(10 * HOUR), 5);
        assert_eq!(status.primary, Condition::Stone);
        assert!(!state.is_stone);
    }

    #[test]
    fn infirm_from_low_health_respects_toggle() {
        let mut cfg = PetConfig::default();
        let state = sociable(60, 60, 60);
        let status = derive_status(&state, &cfg, at(10 * HOUR), 25);
        assert!(status.conditions.contains(Condition::Infirm));

        cfg.infirm_enabled = false;
        let status = derive_status(&state, &cfg, at(10 * HOUR), 25);
        assert!(!status.conditions.contains(Condition::Infirm));
    }

    #[test]
    fn literal_vital_thresholds() {
        let cfg = PetConfig::default();
        let status = evaluate(&sociable(49, 49, 39), &cfg, at(10 * HOUR));
        assert_eq!(
            status.conditions.as_slice(),
            &[Condition::Hungry, Condition::Tired, Condition::Sad]
        );
        assert_eq!(status.primary, Condition::Hungry);

        let status = evaluate(&sociable(50, 50, 40), &cfg, at(10 * HOUR));
        assert_eq!(status.conditions.as_slice(), &[Condition::Happy]);
    }

    #[test]
    fn thriving_adds_happy() {
        let cfg = PetConfig::default();
        let mut state = sociable(80, 80, 80);
        state.message = Some(String::from("hi"));
        let status = evaluate(&state, &cfg, at(10 * HOUR));
        assert_eq!(
            status.conditions.as_slice(),
            &[Condition::HasMessage, Condition::Happy]
        );
    }

    #[test]
    fn asleep_suppresses_needs() {
        let cfg = PetConfig::default();
        let state = PetState {
            hunger: 10,
            happiness: 10,
            energy: 10,
            is_asleep: true,
            ..PetState::default()
        };
        let status = derive_status(&state, &cfg, at(10 * HOUR), 40);
        assert_eq!(status.conditions.as_slice(), &[Condition::Asleep]);
    }

    #[test]
    fn loneliness_boundary() {
        let cfg = PetConfig::default();
        let mut state = PetState {
            hunger: 60,
            happiness: 60,
            energy: 60,
            ..PetState::default()
        };
        for action in [InteractionKind::Feed, InteractionKind::Play] {
            state.interactions.record(Interaction {
                time: at(9 * HOUR),
                action,
            });
        }
        let status = evaluate(&state, &cfg, at(10 * HOUR));
        assert!(status.conditions.contains(Condition::Lonely));

        state.interactions.record(Interaction {
            time: at(9 * HOUR),
            action: InteractionKind::Visit,
        });
        let status = evaluate(&state, &cfg, at(10 * HOUR));
        assert!(!status.conditions.contains(Condition::Lonely));
    }

    #[test]
    fn format_rules() {
        assert_eq!(format_conditions(&[]), "happy");
        assert_eq!(
            format_conditions(&[Condition::HasMessage, Condition::Stone, Condition::Infirm]),
            "stone and has a message"
        );
        assert_eq!(format_conditions(&[Condition::Stone, Condition::Sad]), "stone");
        assert_eq!(
            format_conditions(&[Condition::Lonely, Condition::Hungry]),
            "lonely, hungry"
        );
        assert_eq!(
            format_conditions(&[Condition::HasMessage, Condition::Tired]),
            "tired and has a message"
        );
        assert_eq!(format_conditions(&[Condition::HasMessage]), "has-message");
    }

    #[test]
    fn status_serializes_names() {
        let cfg = PetConfig::default();
        let status = evaluate(&sociable(60, 60, 60), &cfg, at(10 * HOUR));
        let json = serde_json::to_string(&status).unwrap_or_default();
        assert!(json.contains("\"primary\":\"happy\""), "{json}");
        assert!(json.contains("\"conditions\":[\"happy\"]"), "{json}");
    }
}
