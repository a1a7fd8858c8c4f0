//! Built-in pet templates.
//!
//! A template is a starting [`PetConfig`] with its animation table plus a
//! fresh [`PetState`]. Only the cat ships today.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use familiar_core::{ConditionSet, PetConfig};
use familiar_types::{AnimationConfig, Condition, Frame, PetState};
use rand::seq::IndexedRandom;

use crate::error::CliError;

/// Template used when no type is given.
pub const DEFAULT_PET_TYPE: &str = "cat";

/// Names handed to familiars summoned without one.
pub const FAMILIAR_NAMES: [&str; 6] = ["Pip", "Shadow", "Whisper", "Ember", "Spark", "Echo"];

const EGG: &str = r"  ___
 / . . \
 \___/";

const CAT_DEFAULT: &str = r" /\_/\
( o.o )
 > ^ <";

const CAT_BLINK: &str = r" /\_/\
( -.- )
 > ^ <";

const CAT_HAPPY: &str = r" /\_/\
( ^.^ )
 > ^ <";

const CAT_HUNGRY: &str = r" /\_/\
( o.o )
 > o <";

const CAT_TIRED: &str = r" /\_/\
( =.= )
 > ^ <";

const CAT_SAD: &str = r" /\_/\
( ;.; )
 > ^ <";

const CAT_LONELY: &str = r" /\_/\
( o.o )  ...
 > ^ <";

const CAT_STONE: &str = r" /\_/\
( +.+ )
 > ^ <";

const CAT_INFIRM: &str = r" /\_/\
( x.x )
 > ^ <";

const CAT_ASLEEP: &str = r" /\_/\
( -.- ) z
 > ^ <";

const CAT_ASLEEP_DEEP: &str = r" /\_/\
( -.- ) Z z
 > ^ <";

const CAT_MESSAGE: &str = r" /\_/\
( o.o )
 > ^ <*";

/// Pick a random familiar name.
pub fn random_name() -> String {
    FAMILIAR_NAMES
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or("Pip")
        .to_owned()
}

/// Build the config and initial state for a new pet.
pub fn instantiate(
    pet_type: &str,
    name: &str,
    now: DateTime<Utc>,
) -> Result<(PetConfig, PetState), CliError> {
    let animations = match pet_type {
        "cat" => cat_animations(),
        other => return Err(CliError::UnknownPetType(other.to_owned())),
    };
    let config = PetConfig {
        name: name.to_owned(),
        pet_type: pet_type.to_owned(),
        created_at: Some(now),
        animations,
        ..PetConfig::default()
    };
    let state = PetState {
        last_checked: Some(now),
        ..PetState::default()
    };
    Ok((config, state))
}

/// Built-in art shown when a pet's animation table has nothing usable.
pub fn fallback_art(conditions: &ConditionSet, evolution: u32) -> &'static str {
    if conditions.contains(Condition::HasMessage) {
        CAT_MESSAGE
    } else if conditions.contains(Condition::Stone) {
        CAT_STONE
    } else if conditions.contains(Condition::Asleep) {
        CAT_ASLEEP
    } else if conditions.contains(Condition::Infirm) {
        CAT_INFIRM
    } else if evolution == 0 {
        EGG
    } else {
        CAT_DEFAULT
    }
}

fn still(art: &str) -> AnimationConfig {
    AnimationConfig {
        frames: vec![frame(art)],
        ..AnimationConfig::default()
    }
}

fn frame(art: &str) -> Frame {
    Frame {
        art: art.to_owned(),
        ..Frame::default()
    }
}

fn cat_animations() -> BTreeMap<String, AnimationConfig> {
    let mut animations = BTreeMap::new();
    animations.insert(String::from("egg"), still(EGG));
    animations.insert(
        String::from("default"),
        AnimationConfig {
            fps: 2,
            loops: 2,
            frames: vec![frame(CAT_DEFAULT), frame(CAT_BLINK)],
            ..AnimationConfig::default()
        },
    );
    animations.insert(String::from("happy"), still(CAT_HAPPY));
    animations.insert(String::from("hungry"), still(CAT_HUNGRY));
    animations.insert(String::from("tired"), still(CAT_TIRED));
    animations.insert(String::from("sad"), still(CAT_SAD));
    animations.insert(String::from("lonely"), still(CAT_LONELY));
    animations.insert(String::from("stone"), still(CAT_STONE));
    animations.insert(String::from("infirm"), still(CAT_INFIRM));
    animations.insert(
        String::from("asleep"),
        AnimationConfig {
            fps: 1,
            frames: vec![frame(CAT_ASLEEP), frame(CAT_ASLEEP_DEEP)],
            ..AnimationConfig::default()
        },
    );
    animations.insert(String::from("has-message"), still(CAT_MESSAGE));
    animations
}
