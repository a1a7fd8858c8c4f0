//! Interaction recording and loneliness windowing.
//!
//! Every feed, play, and visit is appended to the pet's bounded
//! [`InteractionLog`]. Loneliness counts every kind together over the
//! trailing 24 hours.

use chrono::{DateTime, TimeDelta, Utc};
use familiar_types::{Interaction, InteractionKind, InteractionLog, PetState};
use tracing::debug;

/// Length of the loneliness window in hours.
pub const LONELINESS_WINDOW_HOURS: i64 = 24;

/// Record an interaction and stamp the matching `last_*` field.
pub fn record_interaction(state: &mut PetState, kind: InteractionKind, now: DateTime<Utc>) {
    state.interactions.record(Interaction { time: now, action: kind });
    match kind {
        InteractionKind::Visit => state.last_visited = Some(now),
        InteractionKind::Feed => state.last_fed = Some(now),
        InteractionKind::Play => state.last_played = Some(now),
    }
    debug!(%kind, %now, "recorded interaction");
}

/// Count interactions of every kind strictly after `now - 24h`.
pub fn recent_interactions(log: &InteractionLog, now: DateTime<Utc>) -> usize {
    let cutoff = now.checked_sub_signed(TimeDelta::hours(LONELINESS_WINDOW_HOURS));
    log.iter()
        .filter(|interaction| cutoff.is_none_or(|cutoff| interaction.time > cutoff))
        .count()
}

/// Whether fewer than `threshold` interactions happened in the window.
pub fn is_lonely(log: &InteractionLog, now: DateTime<Utc>, threshold: u32) -> bool {
    let threshold = usize::try_from(threshold).unwrap_or(usize::MAX);
    recent_interactions(log, now) < threshold
}
