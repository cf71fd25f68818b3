//! CLI argument definitions.
//!
//! All Clap derive structs for `stimdeck` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::observability::LogFormat;

/// Timed psychological-test stimulus sequencer.
#[derive(Parser, Debug)]
#[command(name = "stimdeck", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log output format.
    #[arg(long, default_value = "human", global = true, env = "STIMDECK_LOG_FORMAT")]
    pub log_format: LogFormat,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Present a test run in the terminal.
    Run(RunArgs),

    /// Classify the deck and preview the presentation order without
    /// starting a run.
    Inspect(InspectArgs),
}

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Deck configuration and sources.
    #[command(flatten)]
    pub deck: DeckArgs,
}

/// Arguments for `inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Deck configuration and sources.
    #[command(flatten)]
    pub deck: DeckArgs,
}

/// Deck selection shared by `run` and `inspect`.
#[derive(Args, Debug)]
pub struct DeckArgs {
    /// Path to a YAML deck file.
    #[arg(short, long, env = "STIMDECK_DECK")]
    pub deck: Option<PathBuf>,

    /// Stimulus source files, appended after the deck's sources.
    #[arg(value_name = "SOURCE")]
    pub sources: Vec<PathBuf>,

    /// Override the sentence-test marker matched against source names.
    #[arg(long, env = "STIMDECK_SENTENCE_MARKER")]
    pub sentence_marker: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_sources() {
        let cli = Cli::try_parse_from(["stimdeck", "run", "a.txt", "b.png"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.deck.sources.len(), 2);
        assert!(args.deck.deck.is_none());
    }

    #[test]
    fn test_parse_inspect_with_deck_and_marker() {
        let cli = Cli::try_parse_from([
            "stimdeck",
            "inspect",
            "--deck",
            "deck.yaml",
            "--sentence-marker",
            "SIT",
        ])
        .unwrap();
        let Commands::Inspect(args) = cli.command else {
            panic!("expected inspect");
        };
        assert_eq!(args.deck.deck, Some(PathBuf::from("deck.yaml")));
        assert_eq!(args.deck.sentence_marker.as_deref(), Some("SIT"));
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::try_parse_from(["stimdeck", "-vv", "inspect"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_missing_subcommand_is_usage_error() {
        assert!(Cli::try_parse_from(["stimdeck"]).is_err());
    }
}
