//! Command-line argument parsing for the `familiar` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Familiar: a terminal pet that lives beside your code.
#[derive(Parser, Debug)]
#[command(name = "familiar")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a pet state file, bypassing discovery
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Summon a familiar, restoring a dismissed one when possible
    Summon {
        /// Pet type, or the name when given alone
        first: Option<String>,
        /// Pet name
        second: Option<String>,
        /// Create the familiar in the home directory
        #[arg(long)]
        global: bool,
    },
    /// Show familiar status
    Status {
        /// Show a full stats card
        #[arg(short, long)]
        verbose: bool,
        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },
    /// Feed your familiar
    Feed,
    /// Play with your familiar
    Play,
    /// Put your familiar to sleep
    Rest,
    /// Heal your familiar (boost energy and happiness, remove infirm)
    Heal,
    /// Leave a message on your familiar
    Message {
        /// The message text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Clear the message on your familiar
    Acknowledge {
        /// Print nothing
        #[arg(short, long)]
        silent: bool,
    },
    /// Awaken your familiar from stone or sleep
    Awaken,
    /// Turn your familiar to stone
    Ossify,
    /// Dismiss your familiar (it can be summoned back)
    Dismiss,
    /// Banish your familiar (permanent delete)
    Banish,
    /// Administrative commands
    Admin {
        /// Admin action
        #[command(subcommand)]
        command: AdminCommand,
    },
}

/// Administrative subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum AdminCommand {
    /// One-line coloured health indicator
    Health,
    /// Show the art for a condition, or `list` every animation key
    Art {
        /// Condition name, a `+`-joined compound, or `list`
        state: String,
        /// Evolution stage to render (defaults to the pet's current stage)
        #[arg(short, long)]
        evolution: Option<u32>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_status_flags() {
        let cli = Cli::parse_from(["familiar", "status", "-v", "--json"]);
        assert_eq!(
            cli.command,
            Command::Status {
                verbose: true,
                json: true
            }
        );
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_summon_arguments() {
        let cli = Cli::parse_from(["familiar", "summon", "cat", "Ember", "--global"]);
        assert_eq!(
            cli.command,
            Command::Summon {
                first: Some(String::from("cat")),
                second: Some(String::from("Ember")),
                global: true
            }
        );
    }

    #[test]
    fn test_cli_message_joins_words() {
        let cli = Cli::parse_from(["familiar", "message", "water", "the", "plants"]);
        assert_eq!(
            cli.command,
            Command::Message {
                text: vec![
                    String::from("water"),
                    String::from("the"),
                    String::from("plants")
                ]
            }
        );
    }

    #[test]
    fn test_cli_global_config() {
        let cli = Cli::parse_from(["familiar", "feed", "--config", "/tmp/pet.state.yaml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/pet.state.yaml")));
        assert_eq!(cli.command, Command::Feed);
    }

    #[test]
    fn test_cli_admin_art() {
        let cli = Cli::parse_from(["familiar", "admin", "art", "hungry", "-e", "2"]);
        assert_eq!(
            cli.command,
            Command::Admin {
                command: AdminCommand::Art {
                    state: String::from("hungry"),
                    evolution: Some(2)
                }
            }
        );
    }
}
