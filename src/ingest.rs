//! Item classification boundary.
//!
//! Turns stimulus source files into typed [`StimulusItem`]s the way the
//! test expects them: each image file becomes one visual prompt; each
//! non-blank line of a text file becomes one word prompt, or a sentence
//! prompt when the file name carries the sentence-test marker; any other
//! readable file becomes a single low-priority item. Sources that cannot
//! be decoded are reported as skipped; classification problems never
//! reach the sequencing engine.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::IngestError;
use crate::item::{Payload, StimulusItem, StimulusKind};

/// Extensions treated as image uploads.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Extensions treated as plain text stimulus lists. Files without an
/// extension are treated as text too.
const TEXT_EXTENSIONS: &[&str] = &["txt", "text"];

/// Classifier options.
#[derive(Debug, Clone)]
pub struct ClassifyOptions {
    /// Substring of a source file name marking its lines as
    /// sentence-fragment prompts.
    pub sentence_marker: String,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            sentence_marker: "SRT".to_string(),
        }
    }
}

/// A source that produced no items, with the user-facing reason.
#[derive(Debug, Clone)]
pub struct SkippedSource {
    /// Path of the skipped source.
    pub path: PathBuf,
    /// Why it was skipped.
    pub reason: String,
}

/// Result of classifying a set of sources.
#[derive(Debug, Default)]
pub struct ClassifiedDeck {
    /// Items ready for the pool, in source order.
    pub items: Vec<StimulusItem>,
    /// Sources that yielded nothing.
    pub skipped: Vec<SkippedSource>,
}

/// Classifies stimulus source files into pool-ready items.
///
/// Never fails as a whole: unreadable or empty sources land in
/// [`ClassifiedDeck::skipped`] and are logged at warn level.
#[must_use]
pub fn classify_sources(paths: &[PathBuf], options: &ClassifyOptions) -> ClassifiedDeck {
    let mut deck = ClassifiedDeck::default();
    for path in paths {
        match classify_source(path, options) {
            Ok(items) if items.is_empty() => {
                warn!(path = %path.display(), "source yielded no items; skipped");
                deck.skipped.push(SkippedSource {
                    path: path.clone(),
                    reason: "no usable content".to_string(),
                });
            }
            Ok(mut items) => {
                debug!(path = %path.display(), count = items.len(), "source classified");
                deck.items.append(&mut items);
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "source skipped");
                deck.skipped.push(SkippedSource {
                    path: path.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }
    deck
}

/// Classifies one source file.
///
/// # Errors
///
/// [`IngestError::UnreadableSource`] when the file cannot be read, or
/// cannot be decoded as UTF-8 where text was expected.
pub fn classify_source(
    path: &Path,
    options: &ClassifyOptions,
) -> Result<Vec<StimulusItem>, IngestError> {
    let name = source_name(path);
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    if ext.as_deref().is_some_and(|e| IMAGE_EXTENSIONS.contains(&e)) {
        // Image decoding is the presentation surface's concern; classify
        // by path alone, but require the file to exist.
        if !path.is_file() {
            return Err(IngestError::UnreadableSource {
                path: path.to_path_buf(),
                message: "no such file".to_string(),
            });
        }
        return Ok(vec![StimulusItem::new(
            StimulusKind::VisualPrompt,
            name,
            Payload::Image(path.to_path_buf()),
        )]);
    }

    let content = read_text(path)?;
    let is_text_list = ext.is_none() || ext.as_deref().is_some_and(|e| TEXT_EXTENSIONS.contains(&e));

    if is_text_list {
        let kind = if name.contains(&options.sentence_marker) {
            StimulusKind::SentencePrompt
        } else {
            StimulusKind::WordPrompt
        };
        let items = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(index, line)| {
                StimulusItem::new(
                    kind,
                    format!("{name}:{}", index + 1),
                    Payload::Text(line.to_string()),
                )
            })
            .collect();
        return Ok(items);
    }

    // Readable, but neither an image nor a recognized text list: a valid
    // low-priority item with the fallback duration.
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(vec![]);
    }
    Ok(vec![StimulusItem::new(
        StimulusKind::Other,
        name,
        Payload::Text(trimmed.to_string()),
    )])
}

fn read_text(path: &Path) -> Result<String, IngestError> {
    std::fs::read_to_string(path).map_err(|err| IngestError::UnreadableSource {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
