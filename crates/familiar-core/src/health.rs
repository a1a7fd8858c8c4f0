//! Health computation and vital clamping.
//!
//! Health is a single `0..=100` score derived from the three vitals. Hunger
//! is inverted, so it is first turned into a satisfaction score
//! (`100 - hunger`) before being combined.
//!
//! All arithmetic is integer or clamped. No panics, no out-of-range results.

use familiar_types::HealthMode;
use serde::{Deserialize, Serialize};

/// Upper bound of every vital and of health.
pub const VITAL_MAX: u32 = 100;

/// Compute a health score from the three vitals.
///
/// - `Average`: `(satisfaction + happiness + energy) / 3`, truncating.
/// - `Weighted`: `0.3 * satisfaction + 0.4 * happiness + 0.3 * energy`,
///   truncating. Evaluated in tenths so the truncation is exact.
/// - `Unknown`: as `Average`.
///
/// Inputs above 100 are treated as 100.
pub fn compute_health(hunger: u32, happiness: u32, energy: u32, mode: HealthMode) -> u32 {
    let satisfaction = VITAL_MAX.saturating_sub(hunger.min(VITAL_MAX));
    let happiness = happiness.min(VITAL_MAX);
    let energy = energy.min(VITAL_MAX);

    let health = match mode {
        HealthMode::Weighted => satisfaction
            .saturating_mul(3)
            .saturating_add(happiness.saturating_mul(4))
            .saturating_add(energy.saturating_mul(3))
            .checked_div(10)
            .unwrap_or(0),
        HealthMode::Average | HealthMode::Unknown => satisfaction
            .saturating_add(happiness)
            .saturating_add(energy)
            .checked_div(3)
            .unwrap_or(0),
    };
    health.min(VITAL_MAX)
}

/// Truncate a floating-point vital and clamp it into `0..=100`.
///
/// `NaN` maps to `0`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn clamp_vital(value: f64) -> u32 {
    if value.is_nan() {
        return 0;
    }
    // In range after the clamp, so the cast is exact.
    value.trunc().clamp(0.0, f64::from(VITAL_MAX)) as u32
}

/// Add a signed delta to a vital, saturating at `0` and `100`.
pub fn adjust_vital(value: u32, delta: i32) -> u32 {
    value.saturating_add_signed(delta).min(VITAL_MAX)
}

/// Coarse health classification used for indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthBand {
    /// The pet is stone, regardless of score.
    Stone,
    /// Health of 80 or more.
    Excellent,
    /// Health of 60 to 79.
    Good,
    /// Health of 40 to 59.
    Fair,
    /// Health of 20 to 39.
    Poor,
    /// Health below 20.
    Critical,
}

impl HealthBand {
    /// Classify a health score. A stone pet is always [`HealthBand::Stone`].
    pub const fn classify(health: u32, stone: bool) -> Self {
        if stone {
            Self::Stone
        } else if health >= 80 {
            Self::Excellent
        } else if health >= 60 {
            Self::Good
        } else if health >= 40 {
            Self::Fair
        } else if health >= 20 {
            Self::Poor
        } else {
            Self::Critical
        }
    }

    /// Lowercase label for the band.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stone => "stone",
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::Critical => "critical",
        }
    }
}
