//! Stimulus items and their classification kinds.
//!
//! A [`StimulusItem`] is the immutable unit of presentation: one image
//! prompt, one word, or one sentence fragment. Items are produced by the
//! ingest boundary, pooled, and frozen into a sequence when a run starts.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque unique identity for a stimulus item.
///
/// Wraps a UUID so pool deletion can address an item without exposing
/// positional assumptions.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Generates a fresh random identity.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classification of a stimulus item.
///
/// The variants double as the presentation ordering: visual prompts are
/// shown first, then single words, then sentence fragments, then anything
/// else.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StimulusKind {
    /// Image-based prompt with a viewing window followed by a writing
    /// sub-phase.
    VisualPrompt,
    /// Single-word prompt with a short viewing window.
    WordPrompt,
    /// Sentence-fragment prompt.
    SentencePrompt,
    /// Anything the classifier could read but not place; presented last
    /// with the fallback duration.
    Other,
}

impl StimulusKind {
    /// Sort key for the fixed presentation order.
    ///
    /// Lower keys are presented first; items sharing a key keep their
    /// pool insertion order (the sequence builder sorts stably).
    #[must_use]
    pub const fn order_key(self) -> u8 {
        match self {
            Self::VisualPrompt => 0,
            Self::WordPrompt => 1,
            Self::SentencePrompt => 2,
            Self::Other => 3,
        }
    }

    /// Whether this kind is followed by a writing sub-phase after its
    /// display window elapses.
    #[must_use]
    pub const fn has_writing_subphase(self) -> bool {
        matches!(self, Self::VisualPrompt)
    }
}

impl std::fmt::Display for StimulusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::VisualPrompt => "visual",
            Self::WordPrompt => "word",
            Self::SentencePrompt => "sentence",
            Self::Other => "other",
        };
        write!(f, "{name}")
    }
}

/// What the presentation surface shows for an item.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    /// Inline text (one word or one sentence fragment).
    Text(String),
    /// Path to an image file; decoding is the surface's concern.
    Image(PathBuf),
}

/// One stimulus, immutable once created.
///
/// Items are never mutated after classification; they leave the system
/// only through explicit pool deletion, which the engine rejects once a
/// run is active.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct StimulusItem {
    /// Unique identity, used for pool deletion.
    pub id: ItemId,
    /// Classification driving duration and ordering.
    pub kind: StimulusKind,
    /// Display name, derived from the source file name.
    pub label: String,
    /// Presentation payload.
    pub payload: Payload,
}

impl StimulusItem {
    /// Creates an item with a freshly generated id.
    #[must_use]
    pub fn new(kind: StimulusKind, label: impl Into<String>, payload: Payload) -> Self {
        Self {
            id: ItemId::generate(),
            kind,
            label: label.into(),
            payload,
        }
    }
}
