//! Time-based decay applied on every invocation.
//!
//! There is no background process. Each invocation compares `now` with the
//! pet's checkpoint and collapses the whole elapsed window into a single
//! deterministic update:
//!
//! - The window is split into a sleep portion and an awake portion by a
//!   pure [`transition`] over a two-state [`SleepPhase`] machine
//! - Hunger rises at full rate while awake and at a tenth of it while asleep
//! - Happiness and energy fall while awake and are restored while asleep,
//!   fast enough that one full sleep takes them from 0 to 100
//! - Vitals are clamped, health is recomputed, stone latches below the
//!   threshold, and infirm clears once health recovers
//!
//! Rates are floating point; results are truncated into `0..=100`.

use chrono::{DateTime, TimeDelta, Utc};
use familiar_types::PetState;
use tracing::{debug, info};

use crate::config::PetConfig;
use crate::health::{VITAL_MAX, clamp_vital, compute_health};

/// Fraction of the awake hunger rate that applies while asleep.
pub const SLEEP_HUNGER_FACTOR: f64 = 0.1;

/// Health at or above which the infirm flag clears itself.
pub const INFIRM_RECOVERY_HEALTH: u32 = 50;

/// The sleep state at the start of an elapsed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepPhase {
    /// Awake for the whole window.
    Awake,
    /// Sleeping until the given instant. A sleep with no end is treated as
    /// having ended at the checkpoint.
    Asleep {
        /// When the sleep naturally ends.
        until: Option<DateTime<Utc>>,
    },
}

impl SleepPhase {
    /// Read the phase from persisted state.
    pub const fn of(state: &PetState) -> Self {
        if state.is_asleep {
            Self::Asleep {
                until: state.sleep_until,
            }
        } else {
            Self::Awake
        }
    }
}

/// Per-hour rates for one window, already scaled by the decay multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayRates {
    /// Hunger gained per awake hour.
    pub hunger: f64,
    /// Happiness lost per awake hour.
    pub happiness: f64,
    /// Energy lost per awake hour.
    pub energy: f64,
    /// Happiness and energy restored per sleeping hour.
    pub restore: f64,
}

impl DecayRates {
    /// Derive the rates for a pet's current flags.
    ///
    /// Awake rates and the sleep hunger rate carry the combined multiplier.
    /// The restore rate does not: a full sleep always restores fully.
    pub fn for_pet(config: &PetConfig, state: &PetState) -> Self {
        let multiplier = config.decay_multiplier(state);
        let sleep_hours = hours(config.effective_sleep_duration());
        let restore = if sleep_hours > 0.0 {
            f64::from(VITAL_MAX) / sleep_hours
        } else {
            0.0
        };
        Self {
            hunger: config.hunger_decay_per_hour * multiplier,
            happiness: config.happiness_decay_per_hour * multiplier,
            energy: config.energy_decay_per_hour * multiplier,
            restore,
        }
    }
}

/// Signed changes to the three vitals over one window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VitalDeltas {
    /// Change in hunger (positive is hungrier).
    pub hunger: f64,
    /// Change in happiness.
    pub happiness: f64,
    /// Change in energy.
    pub energy: f64,
}

/// Result of running one window through the sleep state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// The phase at the end of the window.
    pub phase: SleepPhase,
    /// Vital changes accumulated over the window.
    pub deltas: VitalDeltas,
    /// Hours of the window spent asleep.
    pub slept_hours: f64,
    /// Whether a sleep ended inside the window.
    pub woke: bool,
}

/// Split the window `checkpoint..now` into sleep and awake portions and
/// compute the resulting vital changes.
///
/// `now` is expected to be after `checkpoint`; an empty or negative window
/// yields zero deltas.
pub fn transition(
    phase: SleepPhase,
    checkpoint: DateTime<Utc>,
    now: DateTime<Utc>,
    rates: &DecayRates,
) -> Transition {
    let elapsed = hours(now.signed_duration_since(checkpoint)).max(0.0);

    let (next, slept, woke) = match phase {
        SleepPhase::Awake => (SleepPhase::Awake, 0.0, false),
        SleepPhase::Asleep { until: Some(until) } if now <= until => (phase, elapsed, false),
        SleepPhase::Asleep { until: Some(until) } => {
            let slept = hours(until.signed_duration_since(checkpoint)).clamp(0.0, elapsed);
            (SleepPhase::Awake, slept, true)
        }
        SleepPhase::Asleep { until: None } => (SleepPhase::Awake, 0.0, true),
    };
    let awake = (elapsed - slept).max(0.0);

    let deltas = VitalDeltas {
        hunger: (slept * SLEEP_HUNGER_FACTOR).mul_add(rates.hunger, awake * rates.hunger),
        happiness: slept.mul_add(rates.restore, -(awake * rates.happiness)),
        energy: slept.mul_add(rates.restore, -(awake * rates.energy)),
    };

    Transition {
        phase: next,
        deltas,
        slept_hours: slept,
        woke,
    }
}

/// What a single [`apply_time_step`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeStepReport {
    /// Hours between the previous checkpoint and `now`; `0.0` when no
    /// decay ran.
    pub elapsed_hours: f64,
    /// Hours of that window spent asleep.
    pub slept_hours: f64,
    /// Health after the step, if decay ran.
    pub health: Option<u32>,
    /// The pet's sleep ended during the window.
    pub woke_up: bool,
    /// The pet latched into stone during this step.
    pub turned_to_stone: bool,
    /// The infirm flag cleared during this step.
    pub infirm_cleared: bool,
}

/// Advance a pet's state to `now`.
///
/// # Order of operations
///
/// 1. First-ever check: anchor the checkpoint and stop
/// 2. Decay disabled or no time passed: move the checkpoint and stop
/// 3. Run the window through [`transition`]
/// 4. Apply and clamp the vital deltas
/// 5. Recompute health
/// 6. Latch stone if health is below the threshold (never cleared here)
/// 7. Clear infirm if health has recovered
/// 8. Move the checkpoint to `now`
pub fn apply_time_step(state: &mut PetState, config: &PetConfig, now: DateTime<Utc>) -> TimeStepReport {
    let mut report = TimeStepReport::default();

    // 1. Nothing to measure against yet
    let Some(checkpoint) = state.last_checked else {
        state.last_checked = Some(now);
        debug!(%now, "anchored first checkpoint");
        return report;
    };

    // 2. Disabled or clock did not advance
    let elapsed = hours(now.signed_duration_since(checkpoint));
    if !config.decay_enabled || elapsed <= 0.0 {
        state.last_checked = Some(now);
        return report;
    }
    report.elapsed_hours = elapsed;

    // 3. Sleep split
    let rates = DecayRates::for_pet(config, state);
    let step = transition(SleepPhase::of(state), checkpoint, now, &rates);
    report.slept_hours = step.slept_hours;
    if step.woke {
        state.clear_sleep();
        report.woke_up = true;
        info!(slept_hours = step.slept_hours, "familiar woke up");
    }

    // 4. Vitals
    state.hunger = clamp_vital(f64::from(state.hunger) + step.deltas.hunger);
    state.happiness = clamp_vital(f64::from(state.happiness) + step.deltas.happiness);
    state.energy = clamp_vital(f64::from(state.energy) + step.deltas.energy);

    // 5. Health from the new vitals
    let health = compute_health(
        state.hunger,
        state.happiness,
        state.energy,
        config.health_computation,
    );
    report.health = Some(health);

    // 6. Stone is one-way here
    if health < config.stone_threshold && !state.is_stone {
        state.is_stone = true;
        report.turned_to_stone = true;
        info!(health, threshold = config.stone_threshold, "familiar turned to stone");
    }

    // 7. Infirm recovery
    if state.is_infirm && health >= INFIRM_RECOVERY_HEALTH {
        state.is_infirm = false;
        report.infirm_cleared = true;
        info!(health, "familiar recovered from infirmity");
    }

    // 8. Checkpoint
    state.last_checked = Some(now);

    debug!(
        elapsed_hours = elapsed,
        slept_hours = step.slept_hours,
        hunger = state.hunger,
        happiness = state.happiness,
        energy = state.energy,
        health,
        "applied time step"
    );

    report
}

/// Length of a time delta in fractional hours.
#[allow(clippy::cast_precision_loss)]
fn hours(delta: TimeDelta) -> f64 {
    // Millisecond counts stay far below 2^53 for any realistic window.
    delta.num_milliseconds() as f64 / 3_600_000.0
}
