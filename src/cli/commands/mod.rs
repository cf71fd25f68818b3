//! CLI command dispatch and handlers.
//!
//! Routes parsed CLI arguments to the appropriate command handler and
//! holds the deck-assembly step both commands share.

pub mod inspect;
pub mod run;

use tracing::warn;

use crate::cli::args::{Cli, Commands, DeckArgs};
use crate::config::DeckConfig;
use crate::error::{IngestError, StimdeckError};
use crate::ingest::{self, ClassifiedDeck};

/// Dispatches a parsed CLI invocation to the appropriate handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), StimdeckError> {
    match cli.command {
        Commands::Run(args) => run::run(&args).await,
        Commands::Inspect(args) => inspect::run(&args),
    }
}

/// Assembles the classified deck from config file plus CLI arguments.
///
/// Source order is deck file first, then positional sources, so the
/// pool's insertion order (and therefore tie order in the built
/// sequence) is predictable. Skipped sources are logged here; an empty
/// result is an error because neither command can do anything with it.
///
/// # Errors
///
/// Config loading errors, or [`IngestError::EmptyDeck`] when no source
/// yielded a single item.
pub fn assemble_deck(args: &DeckArgs) -> Result<ClassifiedDeck, StimdeckError> {
    let config = match &args.deck {
        Some(path) => DeckConfig::load(path)?,
        None => DeckConfig::default(),
    };

    let mut options = config.classify_options();
    if let Some(marker) = &args.sentence_marker {
        options.sentence_marker = marker.clone();
    }

    let mut paths = config.sources;
    paths.extend(args.sources.iter().cloned());

    let deck = ingest::classify_sources(&paths, &options);
    for skipped in &deck.skipped {
        warn!(path = %skipped.path.display(), reason = %skipped.reason, "source skipped");
    }
    if deck.items.is_empty() {
        return Err(IngestError::EmptyDeck {
            sources: paths.len(),
        }
        .into());
    }
    Ok(deck)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn deck_args(deck: Option<PathBuf>, sources: Vec<PathBuf>) -> DeckArgs {
        DeckArgs {
            deck,
            sources,
            sentence_marker: None,
        }
    }

    #[test]
    fn test_assemble_from_positional_sources() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("WAT_words.txt");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"anchor\ncourage\n")
            .unwrap();

        let deck = assemble_deck(&deck_args(None, vec![path])).unwrap();
        assert_eq!(deck.items.len(), 2);
    }

    #[test]
    fn test_assemble_empty_deck_is_an_error() {
        let err = assemble_deck(&deck_args(None, vec![])).unwrap_err();
        assert!(matches!(
            err,
            StimdeckError::Ingest(IngestError::EmptyDeck { sources: 0 })
        ));
    }

    #[test]
    fn test_marker_override_beats_deck_default() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("fragments.txt");
        std::fs::File::create(&source)
            .unwrap()
            .write_all(b"The rope snapped and he\n")
            .unwrap();

        let mut args = deck_args(None, vec![source]);
        args.sentence_marker = Some("fragments".to_string());
        let deck = assemble_deck(&args).unwrap();
        assert_eq!(
            deck.items[0].kind,
            crate::item::StimulusKind::SentencePrompt
        );
    }
}
