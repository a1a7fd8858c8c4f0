//! Terminal output: status text, art, pixel frames and the prompt indicator.
//!
//! Everything here builds strings or writes to a caller-supplied writer so
//! it can be checked without a terminal.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::thread;

use familiar_core::{DerivedStatus, HealthBand, PetConfig, choose_animation_key, format_conditions, playback};
use familiar_types::{AnimationConfig, AnimationSource, Condition, Frame, PetState};
use serde::Serialize;

use crate::templates;

const RESET: &str = "\x1b[0m";
const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";
const CLEAR_LINE: &str = "\x1b[2K";

/// Paw shown in front of the prompt indicator.
const PAW: &str = "🐾";

// ---------------------------------------------------------------------------
// Status text
// ---------------------------------------------------------------------------

/// `"<name> is <primary condition>"`.
pub fn headline(name: &str, status: &DerivedStatus) -> String {
    format!("{name} is {}", status.primary.as_str())
}

/// The verbose stats card printed by `status --verbose`.
pub fn stats_card(name: &str, state: &PetState, status: &DerivedStatus) -> String {
    format!(
        "{}\n\nstate: {}\nhealth: {}\nhunger: {}\nhappiness: {}\nenergy: {}\nevolution: {}\n",
        headline(name, status),
        format_conditions(status.conditions.as_slice()),
        status.health,
        state.hunger,
        state.happiness,
        state.energy,
        state.evolution,
    )
}

/// Machine-readable status for `status --json`.
#[derive(Debug, Serialize)]
pub struct StatusReport<'a> {
    /// Display name.
    pub name: &'a str,
    /// Highest-priority condition.
    pub primary: Condition,
    /// Every active condition in priority order.
    pub conditions: &'a [Condition],
    /// Health score.
    pub health: u32,
    /// Health band used by the prompt indicator.
    pub band: HealthBand,
    /// Hunger (higher is hungrier).
    pub hunger: u32,
    /// Happiness.
    pub happiness: u32,
    /// Energy.
    pub energy: u32,
    /// Evolution stage.
    pub evolution: u32,
    /// Pending message, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'a str>,
}

impl<'a> StatusReport<'a> {
    /// Collect a report for a pet.
    pub fn new(config: &'a PetConfig, state: &'a PetState, status: &'a DerivedStatus) -> Self {
        Self {
            name: config.display_name(state),
            primary: status.primary,
            conditions: status.conditions.as_slice(),
            health: status.health,
            band: health_band(config, state, status.health),
            hunger: state.hunger,
            happiness: state.happiness,
            energy: state.energy,
            evolution: state.evolution,
            message: state.message.as_deref().filter(|m| !m.is_empty()),
        }
    }
}

// ---------------------------------------------------------------------------
// Prompt indicator
// ---------------------------------------------------------------------------

/// Band for a pet, treating health under the stone threshold as stone.
pub const fn health_band(config: &PetConfig, state: &PetState, health: u32) -> HealthBand {
    HealthBand::classify(health, state.is_stone || health < config.stone_threshold)
}

/// ANSI colour for a band.
pub const fn band_colour(band: HealthBand) -> &'static str {
    match band {
        HealthBand::Stone => "\x1b[90m",
        HealthBand::Excellent => "\x1b[32m",
        HealthBand::Good => "\x1b[33m",
        HealthBand::Fair => "\x1b[93m",
        HealthBand::Poor => "\x1b[38;5;208m",
        HealthBand::Critical => "\x1b[31m",
    }
}

/// One-line indicator for shell prompts: paw, coloured `▲` when a message
/// is pending or `●` otherwise. No trailing newline.
pub fn health_indicator(band: HealthBand, has_message: bool) -> String {
    let glyph = if has_message { '▲' } else { '●' };
    format!("{PAW} {}{glyph}{RESET}", band_colour(band))
}

// ---------------------------------------------------------------------------
// Pixel art
// ---------------------------------------------------------------------------

/// Whether a pixel cell is see-through: empty, `transparent`, all spaces or
/// all `#` (used for alignment).
fn is_transparent(pixel: &str) -> bool {
    pixel == "transparent" || pixel.chars().all(|c| c == ' ') || pixel.chars().all(|c| c == '#')
}

/// Parse `#rgb` or `#rrggbb` (the `#` is optional). Anything else is black.
fn parse_hex(pixel: &str) -> (u8, u8, u8) {
    let hex = pixel.strip_prefix('#').unwrap_or(pixel);
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|digits| u8::from_str_radix(digits, 16).ok())
    };
    let parsed = match hex.len() {
        3 => channel(0..1)
            .zip(channel(1..2))
            .zip(channel(2..3))
            .map(|((r, g), b)| (r.saturating_mul(17), g.saturating_mul(17), b.saturating_mul(17))),
        6 => channel(0..2)
            .zip(channel(2..4))
            .zip(channel(4..6))
            .map(|((r, g), b)| (r, g, b)),
        _ => None,
    };
    parsed.unwrap_or((0, 0, 0))
}

fn fg(pixel: &str) -> String {
    let (r, g, b) = parse_hex(pixel);
    format!("\x1b[38;2;{r};{g};{b}m")
}

fn bg(pixel: &str) -> String {
    let (r, g, b) = parse_hex(pixel);
    format!("\x1b[48;2;{r};{g};{b}m")
}

/// Render a pixel frame with half blocks, two pixel rows per text line.
pub fn render_pixels(frame: &Frame) -> String {
    let none: &[String] = &[];
    let mut lines = Vec::new();
    for pair in frame.pixels.chunks(2) {
        let top = pair.first().map_or(none, Vec::as_slice);
        let bottom = pair.get(1).map_or(none, Vec::as_slice);
        let width = top.len().max(bottom.len());

        let mut line = String::new();
        for x in 0..width {
            let upper = top.get(x).map_or("", String::as_str);
            let lower = bottom.get(x).map_or("", String::as_str);
            let cell = match (is_transparent(upper), is_transparent(lower)) {
                (true, true) => String::from(" "),
                (true, false) => format!("{}▄{RESET}", fg(lower)),
                (false, true) => format!("{}▀{RESET}", fg(upper)),
                (false, false) if parse_hex(upper) == parse_hex(lower) => {
                    format!("{}█{RESET}", fg(upper))
                }
                (false, false) => format!("{}{}▀{RESET}", fg(upper), bg(lower)),
            };
            line.push_str(&cell);
        }
        lines.push(line);
    }
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Art
// ---------------------------------------------------------------------------

/// Printable text of one frame.
pub fn frame_text(animation: &AnimationConfig, frame: &Frame) -> String {
    if animation.source == AnimationSource::Pixel {
        render_pixels(frame)
    } else {
        frame.art.clone()
    }
}

/// The animation a pet would show for a status, if its table has one with
/// frames.
pub fn select_animation<'a>(
    config: &'a PetConfig,
    state: &PetState,
    status: &DerivedStatus,
) -> Option<(String, &'a AnimationConfig)> {
    let key = choose_animation_key(&status.conditions, state.evolution, &config.animations);
    config
        .animations
        .get(&key)
        .filter(|animation| !animation.frames.is_empty())
        .map(|animation| (key, animation))
}

/// Write an animation: played in place when `animate` is set and there is
/// more than one frame, otherwise its first frame.
pub fn show(out: &mut impl Write, animation: &AnimationConfig, animate: bool) -> io::Result<()> {
    if animate && animation.frames.len() > 1 {
        return play(out, animation);
    }
    if let Some(frame) = animation.frames.first() {
        writeln!(out, "{}", frame_text(animation, frame).trim_end_matches(['\n', '\r']))?;
    }
    Ok(())
}

/// Write the art for a pet's status, falling back to built-in art.
pub fn show_pet(
    out: &mut impl Write,
    config: &PetConfig,
    state: &PetState,
    status: &DerivedStatus,
    animate: bool,
) -> io::Result<()> {
    if let Some((_, animation)) = select_animation(config, state, status) {
        return show(out, animation, animate && config.allow_ansi_animations);
    }
    writeln!(
        out,
        "{}",
        templates::fallback_art(&status.conditions, state.evolution)
    )
}

/// Play an animation in place, redrawing over the previous frame.
pub fn play(out: &mut impl Write, animation: &AnimationConfig) -> io::Result<()> {
    let height = animation
        .frames
        .iter()
        .map(|frame| frame_text(animation, frame).trim_end_matches(['\n', '\r']).lines().count())
        .max()
        .unwrap_or(0);
    if height == 0 {
        return Ok(());
    }

    write!(out, "{HIDE_CURSOR}")?;
    let mut frames = playback(animation).peekable();
    let mut first = true;
    while let Some((frame, delay)) = frames.next() {
        if !first {
            write!(out, "\x1b[{height}A")?;
        }
        first = false;

        let text = frame_text(animation, frame);
        let mut lines = text.trim_end_matches(['\n', '\r']).lines();
        for _ in 0..height {
            writeln!(out, "{CLEAR_LINE}{}", lines.next().unwrap_or(""))?;
        }
        out.flush()?;
        if frames.peek().is_some() {
            thread::sleep(delay);
        }
    }
    write!(out, "{SHOW_CURSOR}")?;
    out.flush()
}

/// The `admin art list` table: every key with its source and frame count.
pub fn art_listing(animations: &BTreeMap<String, AnimationConfig>) -> String {
    if animations.is_empty() {
        return String::from("No animations available\n");
    }
    let mut listing = String::from("Available animation states:\n");
    for (key, animation) in animations {
        listing.push_str(&format!(
            "  {key} ({}, {} frame(s))\n",
            animation.source.as_str(),
            animation.frames.len()
        ));
    }
    listing
}
