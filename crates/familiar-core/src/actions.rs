//! Interaction commands.
//!
//! Each command mutates the state in place after the caller has advanced it
//! with [`crate::decay::apply_time_step`]. Commands that can be refused
//! return a [`PetError`]; the caller should then discard the mutated state.
//!
//! Feeding and playing pass through a sleep gate first: the first two
//! attempts on a sleeping pet only count, the third wakes it and proceeds.

use chrono::{DateTime, Utc};
use familiar_types::{InteractionKind, PetState};
use tracing::info;

use crate::conditions::{evaluate, format_conditions};
use crate::config::PetConfig;
use crate::error::PetError;
use crate::health::{VITAL_MAX, adjust_vital, compute_health};
use crate::interactions::record_interaction;

/// Attempts on a sleeping pet before it wakes up.
pub const WAKE_AFTER_ATTEMPTS: u32 = 3;

/// Vital nudge applied by status checks and empty acknowledgements.
pub const CHECK_IN_BOOST: i32 = 5;

/// How a feed or play request was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// The action happened.
    Performed,
    /// The pet was woken by this attempt and the action happened.
    WokeAndPerformed,
    /// First attempt on a sleeping pet; nothing happened.
    Asleep,
    /// Second attempt on a sleeping pet; nothing happened.
    StillAsleep,
}

/// What a rest request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestOutcome {
    /// The pet fell asleep until the given instant.
    FellAsleep {
        /// When the sleep will end.
        until: DateTime<Utc>,
    },
    /// The pet was already sleeping; nothing changed.
    AlreadyAsleep,
}

/// What an awaken request cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Awakening {
    /// The pet was released from stone.
    pub from_stone: bool,
    /// The pet was woken from sleep.
    pub from_sleep: bool,
}

/// What acknowledging the message did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgement {
    /// A message was pending; vitals were restored to their best.
    Restored,
    /// No message was pending; vitals got a small boost.
    Boosted,
}

/// Count an attempt on a sleeping pet. Returns `None` when the caller may
/// proceed, having woken the pet if needed.
fn sleep_gate(state: &mut PetState) -> Option<Response> {
    if !state.is_asleep {
        return None;
    }
    state.sleep_attempts = state.sleep_attempts.saturating_add(1);
    match state.sleep_attempts {
        1 => Some(Response::Asleep),
        2 => Some(Response::StillAsleep),
        _ => {
            state.clear_sleep();
            info!("familiar was woken by repeated attempts");
            None
        }
    }
}

fn refuse_if_stone(state: &PetState, config: &PetConfig) -> Result<(), PetError> {
    if state.is_stone {
        return Err(PetError::Stone {
            name: config.display_name(state).to_owned(),
        });
    }
    Ok(())
}

/// Egg hatches on its first real interaction.
const fn hatch(state: &mut PetState) {
    if state.evolution == 0 {
        state.evolution = 1;
    }
}

/// Feed the pet: hunger -20, happiness +10.
pub fn feed(
    state: &mut PetState,
    config: &PetConfig,
    now: DateTime<Utc>,
) -> Result<Response, PetError> {
    let was_asleep = state.is_asleep;
    if let Some(response) = sleep_gate(state) {
        return Ok(response);
    }
    refuse_if_stone(state, config)?;

    hatch(state);
    state.hunger = adjust_vital(state.hunger, -20);
    state.happiness = adjust_vital(state.happiness, 10);
    record_interaction(state, InteractionKind::Feed, now);
    info!(hunger = state.hunger, happiness = state.happiness, "fed familiar");

    Ok(if was_asleep {
        Response::WokeAndPerformed
    } else {
        Response::Performed
    })
}

/// Play with the pet: happiness +15, energy -10.
pub fn play(
    state: &mut PetState,
    config: &PetConfig,
    now: DateTime<Utc>,
) -> Result<Response, PetError> {
    let was_asleep = state.is_asleep;
    if let Some(response) = sleep_gate(state) {
        return Ok(response);
    }
    refuse_if_stone(state, config)?;

    hatch(state);
    state.happiness = adjust_vital(state.happiness, 15);
    state.energy = adjust_vital(state.energy, -10);
    record_interaction(state, InteractionKind::Play, now);
    info!(happiness = state.happiness, energy = state.energy, "played with familiar");

    Ok(if was_asleep {
        Response::WokeAndPerformed
    } else {
        Response::Performed
    })
}

/// Record that the owner checked in.
pub fn visit(state: &mut PetState, now: DateTime<Utc>) {
    record_interaction(state, InteractionKind::Visit, now);
}

/// The nudge a status check gives before decay: hunger -5, happiness and
/// energy +5.
pub fn status_boost(state: &mut PetState) {
    state.hunger = adjust_vital(state.hunger, -CHECK_IN_BOOST);
    state.happiness = adjust_vital(state.happiness, CHECK_IN_BOOST);
    state.energy = adjust_vital(state.energy, CHECK_IN_BOOST);
}

/// Put the pet to sleep for the configured duration.
pub fn rest(
    state: &mut PetState,
    config: &PetConfig,
    now: DateTime<Utc>,
) -> Result<RestOutcome, PetError> {
    if state.is_asleep {
        return Ok(RestOutcome::AlreadyAsleep);
    }
    refuse_if_stone(state, config)?;

    let duration = config.effective_sleep_duration();
    let until = now.checked_add_signed(duration).unwrap_or(now);
    state.is_asleep = true;
    state.sleep_until = Some(until);
    state.sleep_attempts = 0;
    info!(%until, "familiar fell asleep");

    Ok(RestOutcome::FellAsleep { until })
}

/// Heal the pet: happiness and energy +3, infirm cleared.
pub fn heal(state: &mut PetState) {
    state.energy = adjust_vital(state.energy, 3);
    state.happiness = adjust_vital(state.happiness, 3);
    state.is_infirm = false;
    info!(energy = state.energy, happiness = state.happiness, "healed familiar");
}

/// Release the pet from stone and/or sleep.
///
/// A pet counts as stone if flagged or if its health is below the stone
/// threshold. Leaving stone resets the vitals so that health lands at
/// `stone_threshold + 10` (capped at 100) in either health mode.
pub fn awaken(
    state: &mut PetState,
    config: &PetConfig,
    now: DateTime<Utc>,
) -> Result<Awakening, PetError> {
    let health = compute_health(
        state.hunger,
        state.happiness,
        state.energy,
        config.health_computation,
    );
    let from_stone = state.is_stone || health < config.stone_threshold;
    let from_sleep = state.is_asleep;

    if !from_stone && !from_sleep {
        let status = evaluate(state, config, now);
        return Err(PetError::NotStoneOrAsleep {
            name: config.display_name(state).to_owned(),
            state: format_conditions(status.conditions.as_slice()),
        });
    }

    if from_stone {
        let target = config.stone_threshold.saturating_add(10).min(VITAL_MAX);
        state.is_stone = false;
        state.hunger = VITAL_MAX.saturating_sub(target);
        state.happiness = target;
        state.energy = target;
        info!(health = target, "familiar awakened from stone");
    }
    if from_sleep {
        state.clear_sleep();
        info!("familiar awakened from sleep");
    }

    Ok(Awakening {
        from_stone,
        from_sleep,
    })
}

/// Turn the pet to stone. Any sleep ends.
pub fn ossify(state: &mut PetState, config: &PetConfig) -> Result<(), PetError> {
    if state.is_stone {
        return Err(PetError::AlreadyStone {
            name: config.display_name(state).to_owned(),
        });
    }
    state.is_stone = true;
    state.clear_sleep();
    info!("familiar turned to stone on request");
    Ok(())
}

/// Leave a message on the pet.
pub fn set_message(state: &mut PetState, message: impl Into<String>) {
    state.message = Some(message.into());
}

/// Clear the message.
///
/// Acknowledging a pending message restores every vital to its best;
/// acknowledging nothing gives the usual check-in boost.
pub fn acknowledge(state: &mut PetState) -> Acknowledgement {
    let had_message = state.has_message();
    state.message = None;
    if had_message {
        state.hunger = 0;
        state.happiness = VITAL_MAX;
        state.energy = VITAL_MAX;
        info!("message acknowledged");
        Acknowledgement::Restored
    } else {
        status_boost(state);
        Acknowledgement::Boosted
    }
}

#[cfg(test)]
mod tests {
    use familiar_types::HealthMode;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap_or_default()
    }

    fn sleeping() -> PetState {
        PetState {
            is_asleep: true,
            sleep_until: Some(at(10_000)),
            ..PetState::default()
        }
    }

    #[test]
    fn feed_hatches_and_adjusts() {
        let cfg = PetConfig::default();
        let mut state = PetState {
            hunger: 15,
            happiness: 95,
            ..PetState::default()
        };

        let response = feed(&mut state, &cfg, at(100));

        assert_eq!(response, Ok(Response::Performed));
        assert_eq!(state.evolution, 1);
        assert_eq!(state.hunger, 0);
        assert_eq!(state.happiness, 100);
        assert_eq!(state.last_fed, Some(at(100)));
        assert_eq!(state.interactions.feeds.len(), 1);
    }

    #[test]
    fn play_adjusts_happiness_and_energy() {
        let cfg = PetConfig::default();
        let mut state = PetState {
            happiness: 50,
            energy: 5,
            evolution: 2,
            ..PetState::default()
        };

        let response = play(&mut state, &cfg, at(100));

        assert_eq!(response, Ok(Response::Performed));
        assert_eq!(state.evolution, 2);
        assert_eq!(state.happiness, 65);
        assert_eq!(state.energy, 0);
        assert_eq!(state.last_played, Some(at(100)));
    }

    #[test]
    fn third_attempt_wakes_the_pet() {
        let cfg = PetConfig::default();
        let mut state = sleeping();
        let hunger = state.hunger;

        assert_eq!(feed(&mut state, &cfg, at(1)), Ok(Response::Asleep));
        assert_eq!(play(&mut state, &cfg, at(2)), Ok(Response::StillAsleep));
        assert_eq!(state.hunger, hunger);
        assert_eq!(state.sleep_attempts, 2);

        assert_eq!(feed(&mut state, &cfg, at(3)), Ok(Response::WokeAndPerformed));
        assert!(!state.is_asleep);
        assert_eq!(state.sleep_until, None);
        assert_eq!(state.sleep_attempts, 0);
        assert_eq!(state.hunger, hunger.saturating_sub(20));
    }

    #[test]
    fn stone_refuses_care() {
        let cfg = PetConfig::default();
        let mut state = PetState {
            is_stone: true,
            ..PetState::default()
        };
        assert!(matches!(feed(&mut state, &cfg, at(1)), Err(PetError::Stone { .. })));
        assert!(matches!(play(&mut state, &cfg, at(1)), Err(PetError::Stone { .. })));
        assert!(matches!(rest(&mut state, &cfg, at(1)), Err(PetError::Stone { .. })));
    }

    #[test]
    fn rest_sets_sleep_window() {
        let cfg = PetConfig::default();
        let mut state = PetState::default();

        let outcome = rest(&mut state, &cfg, at(1_000));

        assert_eq!(outcome, Ok(RestOutcome::FellAsleep { until: at(2_800) }));
        assert!(state.is_asleep);
        assert_eq!(state.sleep_until, Some(at(2_800)));

        let again = rest(&mut state, &cfg, at(1_500));
        assert_eq!(again, Ok(RestOutcome::AlreadyAsleep));
        assert_eq!(state.sleep_until, Some(at(2_800)));
    }

    #[test]
    fn heal_clears_infirm() {
        let mut state = PetState {
            happiness: 99,
            energy: 40,
            is_infirm: true,
            ..PetState::default()
        };
        heal(&mut state);
        assert_eq!(state.happiness, 100);
        assert_eq!(state.energy, 43);
        assert!(!state.is_infirm);
    }

    #[test]
    fn awaken_from_stone_lands_above_threshold() {
        for mode in [HealthMode::Average, HealthMode::Weighted] {
            let cfg = PetConfig {
                health_computation: mode,
                ..PetConfig::default()
            };
            let mut state = PetState {
                hunger: 100,
                happiness: 0,
                energy: 0,
                is_stone: true,
                ..PetState::default()
            };

            let result = awaken(&mut state, &cfg, at(1));

            assert_eq!(
                result,
                Ok(Awakening {
                    from_stone: true,
                    from_sleep: false
                })
            );
            assert!(!state.is_stone);
            assert_eq!(
                compute_health(state.hunger, state.happiness, state.energy, mode),
                20
            );
        }
    }

    #[test]
    fn awaken_caps_target_health() {
        let cfg = PetConfig {
            stone_threshold: 95,
            ..PetConfig::default()
        };
        let mut state = PetState {
            is_stone: true,
            ..PetState::default()
        };
        assert!(awaken(&mut state, &cfg, at(1)).is_ok());
        assert_eq!((state.hunger, state.happiness, state.energy), (0, 100, 100));
    }

    #[test]
    fn awaken_from_sleep() {
        let cfg = PetConfig::default();
        let mut state = sleeping();
        let result = awaken(&mut state, &cfg, at(1));
        assert_eq!(
            result,
            Ok(Awakening {
                from_stone: false,
                from_sleep: true
            })
        );
        assert!(!state.is_asleep);
    }

    #[test]
    fn awaken_refuses_healthy_pet() {
        let cfg = PetConfig::default();
        let mut state = PetState {
            hunger: 60,
            happiness: 60,
            energy: 60,
            ..PetState::default()
        };
        let result = awaken(&mut state, &cfg, at(1));
        assert_eq!(
            result,
            Err(PetError::NotStoneOrAsleep {
                name: String::from("Familiar"),
                state: String::from("lonely"),
            })
        );
    }

    #[test]
    fn ossify_ends_sleep_and_refuses_twice() {
        let cfg = PetConfig::default();
        let mut state = sleeping();
        assert_eq!(ossify(&mut state, &cfg), Ok(()));
        assert!(state.is_stone);
        assert!(!state.is_asleep);
        assert!(matches!(
            ossify(&mut state, &cfg),
            Err(PetError::AlreadyStone { .. })
        ));
    }

    #[test]
    fn acknowledge_restores_or_boosts() {
        let mut state = PetState {
            hunger: 50,
            happiness: 50,
            energy: 50,
            ..PetState::default()
        };
        set_message(&mut state, "check the oven");
        assert!(state.has_message());
        assert_eq!(acknowledge(&mut state), Acknowledgement::Restored);
        assert_eq!((state.hunger, state.happiness, state.energy), (0, 100, 100));
        assert_eq!(state.message, None);

        state.hunger = 50;
        state.happiness = 50;
        state.energy = 50;
        assert_eq!(acknowledge(&mut state), Acknowledgement::Boosted);
        assert_eq!((state.hunger, state.happiness, state.energy), (45, 55, 55));
    }

    #[test]
    fn status_boost_saturates() {
        let mut state = PetState {
            hunger: 2,
            happiness: 98,
            energy: 50,
            ..PetState::default()
        };
        status_boost(&mut state);
        assert_eq!((state.hunger, state.happiness, state.energy), (0, 100, 55));
    }
}
