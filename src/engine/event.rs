//! Discrete events the engine emits toward the presentation surface.
//!
//! Exactly one [`EngineEvent::Cue`] is emitted at the start of every
//! phase: the initial `start()`, every completed transition, every
//! manual advance/retreat. The surface plays the alert exactly once per
//! event, restarting any playback already in progress. A
//! [`EngineEvent::RunEnded`] tells the surface to silence playback.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::item::StimulusKind;

/// Why a run reached its ended state.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The last item's final phase timed out or was advanced past.
    SequenceExhausted,
    /// The operator terminated the run explicitly.
    Terminated,
}

/// A discrete event emitted during a run.
///
/// Tagged with `"type"` when serialized so consumers can dispatch on the
/// event kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum EngineEvent {
    /// A new phase has begun; play the alert cue once.
    Cue {
        /// When the phase began.
        timestamp: DateTime<Utc>,
        /// Index of the item now addressed.
        position: usize,
        /// Kind of the item now addressed.
        kind: StimulusKind,
        /// Whether the new phase is a writing window.
        writing_subphase: bool,
        /// Whole seconds allotted to the new phase.
        seconds: u32,
    },

    /// The run has ended; silence any ongoing cue playback.
    RunEnded {
        /// When the run ended.
        timestamp: DateTime<Utc>,
        /// Why it ended.
        reason: EndReason,
    },
}

impl EngineEvent {
    /// Builds a cue event stamped with the current time.
    #[must_use]
    pub(crate) fn cue(position: usize, kind: StimulusKind, writing_subphase: bool, seconds: u32) -> Self {
        Self::Cue {
            timestamp: Utc::now(),
            position,
            kind,
            writing_subphase,
            seconds,
        }
    }

    /// Builds a run-ended event stamped with the current time.
    #[must_use]
    pub(crate) fn ended(reason: EndReason) -> Self {
        Self::RunEnded {
            timestamp: Utc::now(),
            reason,
        }
    }
}
