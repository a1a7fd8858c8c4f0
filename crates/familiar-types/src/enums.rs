//! Enumeration types for the Familiar terminal pet.
//!
//! The condition vocabulary, the closed set of tracked interactions, the
//! health-computation modes, and the animation source kinds.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

/// A named behavioral condition derived from vitals, flags, and history.
///
/// Variants are declared in priority order: the derived ordering (`Ord`)
/// therefore ranks [`Condition::HasMessage`] highest and
/// [`Condition::Happy`] lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    /// A non-empty message is waiting on the pet.
    HasMessage,
    /// The pet is (or is about to be) frozen in stone.
    Stone,
    /// The pet is degraded from prolonged neglect.
    Infirm,
    /// The pet is sleeping.
    Asleep,
    /// Too few interactions in the trailing 24 hours.
    Lonely,
    /// Hunger threshold crossed.
    Hungry,
    /// Energy is low.
    Tired,
    /// Happiness is low.
    Sad,
    /// Nothing else applies, or every vital is in the thriving zone.
    Happy,
}

impl Condition {
    /// Every condition, highest priority first.
    pub const PRIORITY: [Self; 9] = [
        Self::HasMessage,
        Self::Stone,
        Self::Infirm,
        Self::Asleep,
        Self::Lonely,
        Self::Hungry,
        Self::Tired,
        Self::Sad,
        Self::Happy,
    ];

    /// The short name used in status lines and animation keys.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HasMessage => "has-message",
            Self::Stone => "stone",
            Self::Infirm => "infirm",
            Self::Asleep => "asleep",
            Self::Lonely => "lonely",
            Self::Hungry => "hungry",
            Self::Tired => "tired",
            Self::Sad => "sad",
            Self::Happy => "happy",
        }
    }

    /// Look a condition up by its short name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::PRIORITY.into_iter().find(|c| c.as_str() == name)
    }

    /// Whether this condition suppresses the egg look at evolution 0.
    pub const fn is_special(self) -> bool {
        matches!(
            self,
            Self::HasMessage | Self::Stone | Self::Asleep | Self::Infirm
        )
    }
}

impl core::fmt::Display for Condition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Interactions
// ---------------------------------------------------------------------------

/// The kinds of user interaction recorded for loneliness tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    /// The owner checked in on the pet.
    Visit,
    /// The owner fed the pet.
    Feed,
    /// The owner played with the pet.
    Play,
}

impl core::fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Visit => write!(f, "visit"),
            Self::Feed => write!(f, "feed"),
            Self::Play => write!(f, "play"),
        }
    }
}

// ---------------------------------------------------------------------------
// Health computation
// ---------------------------------------------------------------------------

/// How the three vitals combine into a single health score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthMode {
    /// Plain mean of satisfaction, happiness, and energy.
    #[default]
    Average,
    /// 30% satisfaction, 40% happiness, 30% energy.
    Weighted,
    /// Any unrecognised mode name; computed like [`HealthMode::Average`].
    #[serde(other)]
    Unknown,
}

// ---------------------------------------------------------------------------
// Animation sources
// ---------------------------------------------------------------------------

/// Where an animation's frames come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSource {
    /// ASCII art frames stored inline.
    #[default]
    Inline,
    /// Pixel grids of hex colours stored inline.
    Pixel,
    /// Frames fetched from a URL.
    Url,
    /// Frames read from a file on disk.
    File,
}

impl AnimationSource {
    /// Lowercase name, as written in config files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Pixel => "pixel",
            Self::Url => "url",
            Self::File => "file",
        }
    }
}
