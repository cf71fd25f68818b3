//! `inspect` command: pre-test deck preview.
//!
//! Classifies the sources and prints the pool plus the built
//! presentation order with per-phase durations, without starting a run.

use crate::cli::args::InspectArgs;
use crate::cli::commands::assemble_deck;
use crate::error::StimdeckError;
use crate::item::StimulusKind;
use crate::schedule::{WRITING_SECS, phase_seconds};
use crate::sequence;

/// Prints the classified deck and its presentation order.
///
/// # Errors
///
/// Deck assembly errors.
pub fn run(args: &InspectArgs) -> Result<(), StimdeckError> {
    let deck = assemble_deck(&args.deck)?;
    let order = sequence::build(&deck.items);

    println!("{} item(s) classified", deck.items.len());
    for (index, item) in order.iter().enumerate() {
        let display = phase_seconds(item.kind, false);
        if item.kind == StimulusKind::VisualPrompt {
            println!(
                "{:>3}. [{}] {} — {}s display + {}s writing",
                index + 1,
                item.kind,
                item.label,
                display,
                WRITING_SECS
            );
        } else {
            println!(
                "{:>3}. [{}] {} — {}s display",
                index + 1,
                item.kind,
                item.label,
                display
            );
        }
    }

    if !deck.skipped.is_empty() {
        println!("{} source(s) skipped:", deck.skipped.len());
        for skipped in &deck.skipped {
            println!("  {} — {}", skipped.path.display(), skipped.reason);
        }
    }

    let total: u64 = order
        .iter()
        .map(|item| {
            let mut secs = u64::from(phase_seconds(item.kind, false));
            if item.kind.has_writing_subphase() {
                secs += u64::from(WRITING_SECS);
            }
            secs
        })
        .sum();
    println!("total run length: {total}s");
    Ok(())
}
