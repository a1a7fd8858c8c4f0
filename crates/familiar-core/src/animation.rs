//! Animation key selection and frame playback.
//!
//! The animation table belongs to the caller. This module only decides
//! which key to look up and, once a caller has an [`AnimationConfig`],
//! how its frames are sequenced in time. Drawing is someone else's job.
//!
//! # Key grammar
//!
//! - Conditions join with `+` in a fixed order:
//!   `has-message+stone+asleep+infirm+lonely+hungry+tired+sad`
//! - An evolution prefix `e<N>:` selects a stage-specific variant
//! - `egg`, `happy`, and `default` are plain keys
//!
//! Selection never fails. A missing key is the normal case and falls
//! through to shorter keys and finally to `default`.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::BuildHasher;
use std::time::Duration;

use familiar_types::{AnimationConfig, Condition, Frame};

use crate::conditions::ConditionSet;

/// Key shown for an unhatched pet.
pub const EGG_KEY: &str = "egg";
/// Key used when nothing more specific exists.
pub const DEFAULT_KEY: &str = "default";
/// Separator between conditions in a compound key.
pub const COMPOUND_SEPARATOR: &str = "+";

/// Loop count used when an animation does not set one.
pub const DEFAULT_LOOPS: u32 = 3;
/// Upper bound on loops so playback always ends quickly.
pub const MAX_LOOPS: u32 = 10;

/// Conditions that take part in compound keys, in key order.
pub const COMPOUND_ORDER: [Condition; 8] = [
    Condition::HasMessage,
    Condition::Stone,
    Condition::Asleep,
    Condition::Infirm,
    Condition::Lonely,
    Condition::Hungry,
    Condition::Tired,
    Condition::Sad,
];

/// Anything that can answer whether an animation key exists.
pub trait AnimationKeys {
    /// Whether `key` is present.
    fn has_key(&self, key: &str) -> bool;
}

impl<V> AnimationKeys for BTreeMap<String, V> {
    fn has_key(&self, key: &str) -> bool {
        self.contains_key(key)
    }
}

impl<V, S: BuildHasher> AnimationKeys for HashMap<String, V, S> {
    fn has_key(&self, key: &str) -> bool {
        self.contains_key(key)
    }
}

impl AnimationKeys for BTreeSet<String> {
    fn has_key(&self, key: &str) -> bool {
        self.contains(key)
    }
}

/// The evolution-prefixed form of a key, e.g. `e2:hungry`.
pub fn evolution_key(evolution: u32, key: &str) -> String {
    format!("e{evolution}:{key}")
}

/// Pick the animation key for a set of conditions and an evolution stage.
///
/// 1. Stage 0 without a special condition shows `egg`, if present
/// 2. Asleep dominates: `e<N>:asleep`, then `asleep`
/// 3. The compound key of every active condition (`default` when none is),
///    as `e<N>:<key>` first, then plain
/// 4. The plain compound key shortened from the end
/// 5. `default`
pub fn choose_animation_key<T: AnimationKeys + ?Sized>(
    conditions: &ConditionSet,
    evolution: u32,
    table: &T,
) -> String {
    let lookup = |key: &str| -> Option<String> {
        if evolution > 0 {
            let prefixed = evolution_key(evolution, key);
            if table.has_key(&prefixed) {
                return Some(prefixed);
            }
        }
        table.has_key(key).then(|| key.to_owned())
    };

    if evolution == 0 && !conditions.iter().any(Condition::is_special) && table.has_key(EGG_KEY) {
        return EGG_KEY.to_owned();
    }

    if conditions.contains(Condition::Asleep)
        && let Some(key) = lookup(Condition::Asleep.as_str())
    {
        return key;
    }

    let parts: Vec<&str> = COMPOUND_ORDER
        .into_iter()
        .filter(|c| conditions.contains(*c))
        .map(Condition::as_str)
        .collect();

    let full = if parts.is_empty() {
        DEFAULT_KEY.to_owned()
    } else {
        parts.join(COMPOUND_SEPARATOR)
    };
    if let Some(found) = lookup(&full) {
        return found;
    }

    for len in (1..parts.len()).rev() {
        let key = parts
            .iter()
            .take(len)
            .copied()
            .collect::<Vec<_>>()
            .join(COMPOUND_SEPARATOR);
        if table.has_key(&key) {
            return key;
        }
    }

    DEFAULT_KEY.to_owned()
}

/// Frames per second after substituting 1 for 0.
pub const fn effective_fps(animation: &AnimationConfig) -> u32 {
    if animation.fps == 0 { 1 } else { animation.fps }
}

/// Loop count after substituting the default and applying the cap.
pub fn effective_loops(animation: &AnimationConfig) -> u32 {
    u32::try_from(animation.loops)
        .ok()
        .filter(|loops| *loops > 0)
        .unwrap_or(DEFAULT_LOOPS)
        .min(MAX_LOOPS)
}

/// How long a frame stays on screen.
///
/// A frame's own `ms` wins over the animation's fps.
pub fn frame_duration(animation: &AnimationConfig, frame: &Frame) -> Duration {
    if frame.ms > 0 {
        Duration::from_millis(u64::from(frame.ms))
    } else {
        Duration::from_secs(1)
            .checked_div(effective_fps(animation))
            .unwrap_or(Duration::from_secs(1))
    }
}

/// Lazily sequence an animation's frames with their display times.
///
/// The frames repeat [`effective_loops`] times. An animation without
/// frames yields nothing.
pub fn playback(animation: &AnimationConfig) -> impl Iterator<Item = (&Frame, Duration)> + '_ {
    let loops = usize::try_from(effective_loops(animation)).unwrap_or(1);
    let total = animation.frames.len().saturating_mul(loops);
    animation
        .frames
        .iter()
        .cycle()
        .take(total)
        .map(move |frame| (frame, frame_duration(animation, frame)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(keys: &[&str]) -> BTreeSet<String> {
        keys.iter().map(|k| (*k).to_owned()).collect()
    }

    fn set(conditions: &[Condition]) -> ConditionSet {
        conditions.iter().copied().collect()
    }

    fn frames(n: usize) -> AnimationConfig {
        AnimationConfig {
            frames: (0..n)
                .map(|i| Frame {
                    art: format!("frame {i}"),
                    ..Frame::default()
                })
                .collect(),
            ..AnimationConfig::default()
        }
    }

    #[test]
    fn egg_at_stage_zero() {
        let keys = table(&["egg", "default", "hungry"]);
        let key = choose_animation_key(&set(&[Condition::Hungry, Condition::Sad]), 0, &keys);
        assert_eq!(key, "egg");
    }

    #[test]
    fn special_condition_hides_egg() {
        let keys = table(&["egg", "stone", "default"]);
        let key = choose_animation_key(&set(&[Condition::Stone]), 0, &keys);
        assert_eq!(key, "stone");
    }

    #[test]
    fn missing_egg_falls_through() {
        let keys = table(&["default"]);
        assert_eq!(choose_animation_key(&set(&[Condition::Happy]), 0, &keys), "default");
    }

    #[test]
    fn asleep_dominates() {
        let keys = table(&["asleep", "e2:asleep", "asleep+hungry", "default"]);
        let conditions = set(&[Condition::Asleep, Condition::Hungry]);
        assert_eq!(choose_animation_key(&conditions, 2, &keys), "e2:asleep");
        assert_eq!(choose_animation_key(&conditions, 1, &keys), "asleep");
    }

    #[test]
    fn evolution_prefix_preferred() {
        let keys = table(&["lonely+hungry", "e3:lonely+hungry", "default"]);
        let conditions = set(&[Condition::Lonely, Condition::Hungry]);
        assert_eq!(choose_animation_key(&conditions, 3, &keys), "e3:lonely+hungry");
        assert_eq!(choose_animation_key(&conditions, 1, &keys), "lonely+hungry");
    }

    #[test]
    fn compound_falls_back_to_highest_priority_then_default() {
        let conditions = set(&[Condition::Lonely, Condition::Tired]);

        let keys = table(&["lonely", "tired", "default"]);
        assert_eq!(choose_animation_key(&conditions, 1, &keys), "lonely");

        let keys = table(&["tired", "default"]);
        assert_eq!(choose_animation_key(&conditions, 1, &keys), "default");

        let keys = BTreeSet::<String>::new();
        assert_eq!(choose_animation_key(&conditions, 1, &keys), "default");
    }

    #[test]
    fn shortened_keys_ignore_evolution_prefix() {
        let keys = table(&["infirm+lonely", "e2:infirm+lonely", "default"]);
        let conditions = set(&[Condition::Infirm, Condition::Lonely, Condition::Sad]);
        assert_eq!(choose_animation_key(&conditions, 2, &keys), "infirm+lonely");

        let keys = table(&["lonely", "e2:lonely", "default"]);
        let conditions = set(&[Condition::Lonely, Condition::Tired]);
        assert_eq!(choose_animation_key(&conditions, 2, &keys), "lonely");
    }

    #[test]
    fn single_condition_still_takes_prefix() {
        let keys = table(&["lonely", "e2:lonely", "default"]);
        assert_eq!(choose_animation_key(&set(&[Condition::Lonely]), 2, &keys), "e2:lonely");
    }

    #[test]
    fn happy_alone_shows_default() {
        let keys = table(&["happy", "default"]);
        assert_eq!(choose_animation_key(&set(&[Condition::Happy]), 1, &keys), "default");

        let keys = table(&["happy", "e1:default", "default"]);
        assert_eq!(choose_animation_key(&set(&[Condition::Happy]), 1, &keys), "e1:default");
    }

    #[test]
    fn unmatched_compound_skips_prefixed_default() {
        let keys = table(&["e1:default", "default"]);
        assert_eq!(choose_animation_key(&set(&[Condition::Tired]), 1, &keys), "default");
    }

    #[test]
    fn works_with_animation_table() {
        let mut animations: BTreeMap<String, AnimationConfig> = BTreeMap::new();
        animations.insert(String::from("hungry"), frames(1));
        let key = choose_animation_key(&set(&[Condition::Hungry]), 4, &animations);
        assert_eq!(key, "hungry");
    }

    #[test]
    fn playback_defaults() {
        let anim = frames(2);
        let seq: Vec<(&Frame, Duration)> = playback(&anim).collect();
        assert_eq!(seq.len(), 6);
        assert!(seq.iter().all(|(_, d)| *d == Duration::from_secs(1)));
        assert_eq!(seq.get(2).map(|(f, _)| f.art.as_str()), Some("frame 0"));
    }

    #[test]
    fn playback_caps_loops_and_honours_frame_ms() {
        let mut anim = frames(1);
        anim.loops = 50;
        anim.fps = 4;
        assert_eq!(playback(&anim).count(), 10);
        assert_eq!(
            playback(&anim).next().map(|(_, d)| d),
            Some(Duration::from_millis(250))
        );

        anim.frames = vec![Frame {
            ms: 700,
            ..Frame::default()
        }];
        anim.loops = -1;
        let seq: Vec<Duration> = playback(&anim).map(|(_, d)| d).collect();
        assert_eq!(seq, vec![Duration::from_millis(700); 3]);
    }

    #[test]
    fn playback_of_nothing_is_empty() {
        assert_eq!(playback(&AnimationConfig::default()).count(), 0);
    }
}
