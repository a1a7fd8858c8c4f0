//! Core entity structs for the Familiar terminal pet.
//!
//! [`PetState`] is the mutable record written back to disk after every
//! invocation. [`InteractionLog`] holds the bounded per-kind histories used
//! for loneliness detection. [`AnimationConfig`] and [`Frame`] describe the
//! entries of an externally supplied animation table.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{AnimationSource, InteractionKind};

// ---------------------------------------------------------------------------
// Interactions
// ---------------------------------------------------------------------------

/// A single recorded interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    /// When the interaction happened.
    pub time: DateTime<Utc>,
    /// What the owner did.
    pub action: InteractionKind,
}

/// Three independent most-recent-N histories, one per [`InteractionKind`].
///
/// Recording past [`InteractionLog::CAPACITY`] evicts the oldest entry of
/// that kind only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionLog {
    /// Recent visits, oldest first.
    #[serde(default)]
    pub visits: VecDeque<Interaction>,
    /// Recent feeds, oldest first.
    #[serde(default)]
    pub feeds: VecDeque<Interaction>,
    /// Recent plays, oldest first.
    #[serde(default)]
    pub plays: VecDeque<Interaction>,
}

impl InteractionLog {
    /// Maximum records kept per interaction kind.
    pub const CAPACITY: usize = 5;

    /// Append an interaction to its kind's history, evicting the oldest
    /// records beyond [`Self::CAPACITY`].
    pub fn record(&mut self, interaction: Interaction) {
        let history = self.history_mut(interaction.action);
        history.push_back(interaction);
        while history.len() > Self::CAPACITY {
            history.pop_front();
        }
    }

    /// The history for one interaction kind, oldest first.
    pub const fn history(&self, kind: InteractionKind) -> &VecDeque<Interaction> {
        match kind {
            InteractionKind::Visit => &self.visits,
            InteractionKind::Feed => &self.feeds,
            InteractionKind::Play => &self.plays,
        }
    }

    const fn history_mut(&mut self, kind: InteractionKind) -> &mut VecDeque<Interaction> {
        match kind {
            InteractionKind::Visit => &mut self.visits,
            InteractionKind::Feed => &mut self.feeds,
            InteractionKind::Play => &mut self.plays,
        }
    }

    /// Iterate over every recorded interaction of every kind.
    pub fn iter(&self) -> impl Iterator<Item = &Interaction> {
        self.visits
            .iter()
            .chain(self.feeds.iter())
            .chain(self.plays.iter())
    }

    /// Total number of records across all kinds.
    pub fn len(&self) -> usize {
        self.visits
            .len()
            .saturating_add(self.feeds.len())
            .saturating_add(self.plays.len())
    }

    /// Whether no interaction has been recorded.
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty() && self.feeds.is_empty() && self.plays.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Pet state
// ---------------------------------------------------------------------------

/// The persisted, mutable state of a pet.
///
/// Vitals are kept in `0..=100`. Hunger is inverted: `0` is fully fed and
/// `100` is starving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct PetState {
    /// Name shown instead of the configured name, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_override: Option<String>,

    /// Hunger (0--100, higher is hungrier).
    pub hunger: u32,
    /// Happiness (0--100, higher is better).
    pub happiness: u32,
    /// Energy (0--100, higher is better).
    pub energy: u32,

    /// Evolution stage. Stage 0 is the egg.
    #[serde(default)]
    pub evolution: u32,

    /// Degraded from prolonged neglect; clears once health recovers.
    #[serde(default)]
    pub is_infirm: bool,
    /// Frozen in stone; only an explicit awaken clears it.
    #[serde(default)]
    pub is_stone: bool,
    /// Sleeping until [`PetState::sleep_until`].
    #[serde(default)]
    pub is_asleep: bool,
    /// When the current sleep naturally ends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_until: Option<DateTime<Utc>>,
    /// Interaction attempts made while asleep.
    #[serde(default)]
    pub sleep_attempts: u32,

    /// Pending message left for the owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Last feed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_fed: Option<DateTime<Utc>>,
    /// Last play session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_played: Option<DateTime<Utc>>,
    /// Last visit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visited: Option<DateTime<Utc>>,
    /// Checkpoint anchoring the next decay step. `None` until the first check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<DateTime<Utc>>,

    /// Recent interactions, bounded per kind.
    #[serde(default)]
    pub interactions: InteractionLog,
}

impl PetState {
    /// Whether a non-empty message is pending.
    pub fn has_message(&self) -> bool {
        self.message.as_deref().is_some_and(|m| !m.is_empty())
    }

    /// Leave the sleep state entirely.
    pub fn clear_sleep(&mut self) {
        self.is_asleep = false;
        self.sleep_until = None;
        self.sleep_attempts = 0;
    }
}

impl Default for PetState {
    /// A freshly hatched egg: well fed, content, rested, never checked.
    fn default() -> Self {
        Self {
            name_override: None,
            hunger: 10,
            happiness: 80,
            energy: 80,
            evolution: 0,
            is_infirm: false,
            is_stone: false,
            is_asleep: false,
            sleep_until: None,
            sleep_attempts: 0,
            message: None,
            last_fed: None,
            last_played: None,
            last_visited: None,
            last_checked: None,
            interactions: InteractionLog::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Animation table entries
// ---------------------------------------------------------------------------

/// One visual frame of an animation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// ASCII art for inline sources.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub art: String,
    /// Rows of hex colour codes for pixel sources.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pixels: Vec<Vec<String>>,
    /// Per-frame display time in milliseconds; `0` uses the animation's fps.
    #[serde(default)]
    pub ms: u32,
}

/// An entry in the animation table, looked up by animation key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Where the frames come from.
    #[serde(default)]
    pub source: AnimationSource,
    /// Remote location for [`AnimationSource::Url`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// File location for [`AnimationSource::File`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Frames per second; `0` means one frame per second.
    #[serde(default)]
    pub fps: u32,
    /// Loop count; `0` or negative means the default of three.
    #[serde(default)]
    pub loops: i32,
    /// The frames, in playback order.
    #[serde(default)]
    pub frames: Vec<Frame>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap_or_default()
    }

    #[test]
    fn log_evicts_oldest_per_kind() {
        let mut log = InteractionLog::default();
        for i in 0..7 {
            log.record(Interaction {
                time: at(i),
                action: InteractionKind::Feed,
            });
        }
        log.record(Interaction {
            time: at(100),
            action: InteractionKind::Play,
        });

        assert_eq!(log.feeds.len(), InteractionLog::CAPACITY);
        assert_eq!(log.feeds.front().map(|i| i.time), Some(at(2)));
        assert_eq!(log.feeds.back().map(|i| i.time), Some(at(6)));
        assert_eq!(log.plays.len(), 1);
        assert!(log.visits.is_empty());
        assert_eq!(log.len(), 6);
    }

    #[test]
    fn empty_message_is_not_pending() {
        let mut state = PetState::default();
        assert!(!state.has_message());
        state.message = Some(String::new());
        assert!(!state.has_message());
        state.message = Some(String::from("water the plants"));
        assert!(state.has_message());
    }

    #[test]
    fn clear_sleep_resets_all_fields() {
        let mut state = PetState {
            is_asleep: true,
            sleep_until: Some(at(1_000)),
            sleep_attempts: 2,
            ..PetState::default()
        };
        state.clear_sleep();
        assert!(!state.is_asleep);
        assert_eq!(state.sleep_until, None);
        assert_eq!(state.sleep_attempts, 0);
    }

    #[test]
    fn state_tolerates_missing_optional_fields() {
        let json = r#"{"hunger": 40, "happiness": 60, "energy": 70}"#;
        let state: PetState = serde_json::from_str(json).unwrap_or_default();
        assert_eq!(state.hunger, 40);
        assert_eq!(state.last_checked, None);
        assert!(state.interactions.is_empty());
    }
}
