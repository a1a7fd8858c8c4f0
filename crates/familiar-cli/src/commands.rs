//! Command handlers.
//!
//! A [`Shell`] carries everything a command needs from the outside world:
//! the working directory, an explicit state path, the current instant and
//! where to write. Stateful commands load the pet, advance it to `now`,
//! act, and save. A refused action returns before the save, so the state
//! on disk is untouched.

use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use familiar_core::actions::{self, Acknowledgement, Response, RestOutcome};
use familiar_core::animation::{COMPOUND_SEPARATOR, DEFAULT_KEY, EGG_KEY};
use familiar_core::config::duration_text;
use familiar_core::{ConditionSet, PetConfig, apply_time_step, choose_animation_key, evaluate};
use familiar_types::{Condition, PetState};
use tracing::debug;

use crate::cli::{AdminCommand, Command};
use crate::discovery::{self, PET_DIR, PetPaths};
use crate::error::CliError;
use crate::render::{self, StatusReport};
use crate::storage;
use crate::templates::{self, DEFAULT_PET_TYPE};

/// Shown after acknowledging when the vitals are this good.
const CONTENT_HUNGER_BELOW: u32 = 30;
const CONTENT_HAPPINESS_ABOVE: u32 = 70;
const CONTENT_ENERGY_ABOVE: u32 = 50;

/// Runs commands against the pet found from a working directory.
pub struct Shell<W> {
    cwd: PathBuf,
    explicit: Option<PathBuf>,
    now: DateTime<Utc>,
    animate: bool,
    out: W,
}

impl<W: Write> Shell<W> {
    /// A shell rooted at `cwd`. `explicit` bypasses discovery; `animate`
    /// allows multi-frame art to play in place.
    pub const fn new(
        cwd: PathBuf,
        explicit: Option<PathBuf>,
        now: DateTime<Utc>,
        animate: bool,
        out: W,
    ) -> Self {
        Self {
            cwd,
            explicit,
            now,
            animate,
            out,
        }
    }

    /// Dispatch one command.
    pub fn run(&mut self, command: Command) -> Result<(), CliError> {
        debug!(?command, now = %self.now, "running command");
        match command {
            Command::Summon {
                first,
                second,
                global,
            } => self.summon(first.as_deref(), second.as_deref(), global),
            Command::Status { verbose, json } => self.status(verbose, json),
            Command::Feed => self.feed(),
            Command::Play => self.play(),
            Command::Rest => self.rest(),
            Command::Heal => self.heal(),
            Command::Message { text } => self.message(&text.join(" ")),
            Command::Acknowledge { silent } => self.acknowledge(silent),
            Command::Awaken => self.awaken(),
            Command::Ossify => self.ossify(),
            Command::Dismiss => self.dismiss(),
            Command::Banish => self.banish(),
            Command::Admin { command } => match command {
                AdminCommand::Health => self.health(),
                AdminCommand::Art { state, evolution } => self.art(&state, evolution),
            },
        }
    }

    fn locate(&self) -> Result<PetPaths, CliError> {
        discovery::locate(self.explicit.as_deref(), &self.cwd)
    }

    /// Load, advance to now, act, save.
    fn with_pet<T>(
        &mut self,
        action: impl FnOnce(&mut Self, &PetConfig, &mut PetState) -> Result<T, CliError>,
    ) -> Result<T, CliError> {
        let paths = self.locate()?;
        let (config, mut state) = storage::load(&paths)?;
        apply_time_step(&mut state, &config, self.now);
        let result = action(self, &config, &mut state)?;
        storage::save_state(&paths.state, &state)?;
        Ok(result)
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    fn summon(
        &mut self,
        first: Option<&str>,
        second: Option<&str>,
        global: bool,
    ) -> Result<(), CliError> {
        let dir = match (&self.explicit, global) {
            (Some(state), _) => PetPaths::from_state(state).dir,
            (None, true) => discovery::global_pet_dir()?,
            (None, false) => self.cwd.join(PET_DIR),
        };
        let paths = PetPaths::in_dir(&dir);
        if paths.state.exists() {
            return Err(CliError::AlreadyExists { path: paths.state });
        }

        let (pet_type, name) = match (first, second) {
            (Some(pet_type), Some(name)) => (pet_type, name.to_owned()),
            (name, _) => {
                if let Some(released) = storage::find_released(&dir, name)? {
                    let paths = storage::restore(&dir, &released)?;
                    let (config, state) = storage::load(&paths)?;
                    writeln!(self.out, "Familiar '{}' restored!", config.display_name(&state))?;
                    return Ok(());
                }
                (
                    DEFAULT_PET_TYPE,
                    name.map_or_else(templates::random_name, str::to_owned),
                )
            }
        };

        let (config, state) = templates::instantiate(pet_type, &name, self.now)?;
        storage::create(&paths, &config, &state)?;
        writeln!(self.out, "Familiar '{name}' summoned!")?;
        Ok(())
    }

    fn dismiss(&mut self) -> Result<(), CliError> {
        let paths = self.locate()?;
        let (config, state) = storage::load(&paths)?;
        let name = config.display_name(&state);
        storage::release(&paths, name, self.now)?;
        writeln!(
            self.out,
            "Familiar '{name}' has been dismissed (can be restored with 'summon')"
        )?;
        Ok(())
    }

    fn banish(&mut self) -> Result<(), CliError> {
        let paths = self.locate()?;
        let (config, state) = storage::load(&paths)?;
        storage::banish(&paths)?;
        writeln!(
            self.out,
            "Familiar '{}' has been banished (permanently deleted)",
            config.display_name(&state)
        )?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Status
    // -----------------------------------------------------------------------

    fn status(&mut self, verbose: bool, json: bool) -> Result<(), CliError> {
        let paths = self.locate()?;
        let (config, mut state) = storage::load(&paths)?;

        // The check-in boost lands before decay so decay does not eat it.
        actions::status_boost(&mut state);
        apply_time_step(&mut state, &config, self.now);

        let status = evaluate(&state, &config, self.now);
        let name = config.display_name(&state);
        if json {
            let report = StatusReport::new(&config, &state, &status);
            writeln!(self.out, "{}", serde_json::to_string_pretty(&report)?)?;
        } else {
            if verbose {
                write!(self.out, "{}", render::stats_card(name, &state, &status))?;
            } else {
                writeln!(self.out, "{}\n", render::headline(name, &status))?;
            }
            render::show_pet(&mut self.out, &config, &state, &status, self.animate)?;
            if let Some(message) = state.message.as_deref().filter(|m| !m.is_empty()) {
                writeln!(self.out, "\nMessage: {message}")?;
            }
        }

        storage::save_state(&paths.state, &state)
    }

    fn health(&mut self) -> Result<(), CliError> {
        self.with_pet(|shell, config, state| {
            let status = evaluate(state, config, shell.now);
            let band = render::health_band(config, state, status.health);
            write!(
                shell.out,
                "{}",
                render::health_indicator(band, state.has_message())
            )?;
            Ok(())
        })
    }

    // -----------------------------------------------------------------------
    // Interactions
    // -----------------------------------------------------------------------

    fn respond(&mut self, name: &str, response: Response, done: &str) -> Result<(), CliError> {
        match response {
            Response::Asleep => writeln!(self.out, "{name} is asleep")?,
            Response::StillAsleep => writeln!(self.out, "{name} is still asleep")?,
            Response::WokeAndPerformed => {
                writeln!(self.out, "{name} wakes up!")?;
                writeln!(self.out, "{done}")?;
            }
            Response::Performed => writeln!(self.out, "{done}")?,
        }
        Ok(())
    }

    fn feed(&mut self) -> Result<(), CliError> {
        self.with_pet(|shell, config, state| {
            let response = actions::feed(state, config, shell.now)?;
            shell.respond(config.display_name(state), response, "Fed your familiar!")
        })
    }

    fn play(&mut self) -> Result<(), CliError> {
        self.with_pet(|shell, config, state| {
            let response = actions::play(state, config, shell.now)?;
            shell.respond(
                config.display_name(state),
                response,
                "Played with your familiar!",
            )
        })
    }

    fn rest(&mut self) -> Result<(), CliError> {
        self.with_pet(|shell, config, state| {
            let outcome = actions::rest(state, config, shell.now)?;
            let name = config.display_name(state);
            match outcome {
                RestOutcome::FellAsleep { until } => {
                    let duration = until
                        .signed_duration_since(shell.now)
                        .to_std()
                        .unwrap_or_default();
                    writeln!(
                        shell.out,
                        "{name} has fallen asleep (will wake in {})",
                        duration_text::format(duration)
                    )?;
                }
                RestOutcome::AlreadyAsleep => writeln!(shell.out, "{name} is already asleep")?,
            }
            Ok(())
        })
    }

    fn heal(&mut self) -> Result<(), CliError> {
        self.with_pet(|shell, config, state| {
            actions::heal(state);
            writeln!(shell.out, "{} has been healed", config.display_name(state))?;
            Ok(())
        })
    }

    fn awaken(&mut self) -> Result<(), CliError> {
        self.with_pet(|shell, config, state| {
            let awakening = actions::awaken(state, config, shell.now)?;
            let name = config.display_name(state);
            if awakening.from_stone {
                writeln!(shell.out, "{name} has awakened from stone!")?;
            }
            if awakening.from_sleep {
                writeln!(shell.out, "{name} has awakened from sleep!")?;
            }
            Ok(())
        })
    }

    fn ossify(&mut self) -> Result<(), CliError> {
        self.with_pet(|shell, config, state| {
            actions::ossify(state, config)?;
            writeln!(shell.out, "{} has turned to stone", config.display_name(state))?;
            Ok(())
        })
    }

    fn message(&mut self, text: &str) -> Result<(), CliError> {
        self.with_pet(|shell, _, state| {
            actions::set_message(state, text);
            writeln!(shell.out, "Message set: {text}")?;
            Ok(())
        })
    }

    fn acknowledge(&mut self, silent: bool) -> Result<(), CliError> {
        self.with_pet(|shell, config, state| {
            let acknowledgement = actions::acknowledge(state);
            debug!(?acknowledgement, "acknowledged");
            if silent {
                return Ok(());
            }

            let status = evaluate(state, config, shell.now);
            let content = state.hunger < CONTENT_HUNGER_BELOW
                && state.happiness > CONTENT_HAPPINESS_ABOVE
                && state.energy > CONTENT_ENERGY_ABOVE;
            let shown = if content || acknowledgement == Acknowledgement::Restored {
                Condition::Happy
            } else {
                status.primary
            };

            let name = config.display_name(state);
            writeln!(shell.out, "{name}\n{}\n", shown.as_str())?;
            render::show_pet(&mut shell.out, config, state, &status, shell.animate)?;
            writeln!(shell.out, "{name} feels acknowledged")?;
            Ok(())
        })
    }

    // -----------------------------------------------------------------------
    // Art preview
    // -----------------------------------------------------------------------

    /// `admin art`: preview the art for a condition, a `+`-joined compound,
    /// or a raw key, at the pet's stage or an explicit one.
    fn art(&mut self, requested: &str, evolution: Option<u32>) -> Result<(), CliError> {
        let paths = self.locate()?;
        let (config, state) = storage::load(&paths)?;
        let animations = &config.animations;

        if requested == "list" {
            write!(self.out, "{}", render::art_listing(animations))?;
            return Ok(());
        }

        let evolution = evolution.unwrap_or(state.evolution);
        if evolution == 0 {
            let egg = animations
                .get(EGG_KEY)
                .filter(|animation| !animation.frames.is_empty())
                .ok_or_else(|| CliError::NoFrames(EGG_KEY.to_owned()))?;
            render::show(&mut self.out, egg, self.animate)?;
            return Ok(());
        }

        let Some(conditions) = parse_conditions(requested) else {
            // Not a condition: try it as a literal key.
            let animation = animations
                .get(requested)
                .filter(|animation| !animation.frames.is_empty())
                .ok_or_else(|| CliError::UnknownArtState(requested.to_owned()))?;
            render::show(&mut self.out, animation, self.animate)?;
            return Ok(());
        };

        let key = choose_animation_key(&conditions, evolution, animations);
        let animation = animations
            .get(&key)
            .or_else(|| animations.get(requested))
            .ok_or_else(|| CliError::UnknownArtState(requested.to_owned()))?;
        if animation.frames.is_empty() {
            return Err(CliError::NoFrames(requested.to_owned()));
        }
        debug!(%key, evolution, "previewing art");
        render::show(&mut self.out, animation, self.animate)?;
        Ok(())
    }

    /// The writer, for inspecting output.
    #[cfg(test)]
    fn into_output(self) -> W {
        self.out
    }
}

/// Parse `default`, a condition name, or a `+`-joined list of them.
fn parse_conditions(requested: &str) -> Option<ConditionSet> {
    if requested == DEFAULT_KEY {
        return Some(ConditionSet::new());
    }
    requested
        .split(COMPOUND_SEPARATOR)
        .map(Condition::from_name)
        .collect()
}
