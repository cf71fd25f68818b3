//! `run` command: the bundled terminal presentation surface.
//!
//! Deliberately thin: it renders whatever the engine reports and
//! forwards operator intents (next/prev/pause/resume/end) into engine
//! operations. The alert cue is a terminal bell plus an info log;
//! audio fidelity is out of scope.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tracing::info;

use crate::cli::args::RunArgs;
use crate::cli::commands::assemble_deck;
use crate::engine::{CountdownDriver, EngineEvent, SequencingEngine};
use crate::error::StimdeckError;

const CONTROLS: &str =
    "controls: [n]ext  [p]revious  [w]ait/pause  [r]esume  [s]tatus  [e]nd";

/// Runs a full test presentation in the terminal.
///
/// # Errors
///
/// Deck assembly errors, or an engine rejection of the initial start.
pub async fn run(args: &RunArgs) -> Result<(), StimdeckError> {
    let deck = assemble_deck(&args.deck)?;
    for skipped in &deck.skipped {
        println!("skipped {}: {}", skipped.path.display(), skipped.reason);
    }

    let (engine, mut events) = SequencingEngine::new(deck.items);
    let engine = Arc::new(Mutex::new(engine));

    {
        let mut engine = engine.lock().await;
        engine.start()?;
        println!("{CONTROLS}");
        println!("{}", engine.snapshot().describe());
    }

    let driver = CountdownDriver::spawn(Arc::clone(&engine));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Some(EngineEvent::Cue { .. }) => {
                        // One bell per cue; a new cue restarts the alert.
                        print!("\x07");
                        info!("cue");
                        println!("{}", engine.lock().await.snapshot().describe());
                    }
                    Some(EngineEvent::RunEnded { reason, .. }) => {
                        println!("run ended ({reason:?})");
                        break;
                    }
                    None => break,
                }
            }
            line = lines.next_line() => {
                match line? {
                    Some(input) => handle_intent(input.trim(), &engine).await,
                    // Operator hung up stdin: terminate the run.
                    None => {
                        engine.lock().await.end();
                        break;
                    }
                }
            }
        }
    }

    driver.shutdown();
    let _ = driver.join().await;
    Ok(())
}

/// Applies one operator intent; rejections are surfaced, never fatal.
async fn handle_intent(input: &str, engine: &Arc<Mutex<SequencingEngine>>) {
    let mut engine = engine.lock().await;
    let outcome = match input {
        "n" | "next" => engine.advance(),
        "p" | "prev" | "previous" => engine.retreat(),
        "w" | "pause" => engine.pause(),
        "r" | "resume" => engine.resume(),
        "s" | "status" => {
            println!("{}", engine.snapshot().describe());
            return;
        }
        "e" | "end" | "q" | "quit" => {
            // The RunEnded event closes the loop.
            engine.end();
            return;
        }
        "" => return,
        other => {
            println!("unknown input '{other}' - {CONTROLS}");
            return;
        }
    };

    if let Err(rejection) = outcome {
        println!("rejected: {rejection}");
    } else {
        println!("{}", engine.snapshot().describe());
    }
}
