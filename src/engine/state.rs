//! Run state for the sequencing engine.
//!
//! [`RunState`] is the mutable heart of a test run: status, position,
//! writing sub-phase, countdown, and the single-flight transition lock.
//! It is owned by the engine, created fresh on `start()`, and reset to
//! its not-started shape on `end()`. It never lives in ambient global
//! scope.

use serde::Serialize;

use crate::item::StimulusItem;

/// Lifecycle status of a test run.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunStatus {
    /// No run has started (or the last run's state was cleared).
    NotStarted,
    /// Countdown is live; ticks and navigation apply.
    Running,
    /// Countdown is suspended; only `resume()` and `end()` apply.
    Paused,
    /// Terminal until a new `start()` re-initializes the state.
    Ended,
}

impl RunStatus {
    /// Whether a run is active (the pool and sequence are frozen).
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NotStarted => "not-started",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Ended => "ended",
        };
        write!(f, "{name}")
    }
}

/// Mutable run state, owned exclusively by the engine.
///
/// Invariants the engine maintains:
/// - `position` is `Some(i)` with `i` in bounds exactly while the status
///   is active; `None` otherwise.
/// - `writing_subphase` implies the item at `position` is a visual
///   prompt whose display window has completed.
/// - `transition_locked` is true only inside a transition; it is false
///   at every operation boundary.
#[derive(Debug, Clone)]
pub struct RunState {
    pub(crate) status: RunStatus,
    pub(crate) position: Option<usize>,
    pub(crate) writing_subphase: bool,
    pub(crate) seconds_remaining: u32,
    pub(crate) transition_locked: bool,
}

impl RunState {
    /// The not-started shape: no position, no countdown, unlocked.
    #[must_use]
    pub(crate) const fn idle() -> Self {
        Self {
            status: RunStatus::NotStarted,
            position: None,
            writing_subphase: false,
            seconds_remaining: 0,
            transition_locked: false,
        }
    }

    /// Resets to the ended shape, keeping `Ended` as the status.
    pub(crate) const fn clear_to_ended(&mut self) {
        self.status = RunStatus::Ended;
        self.position = None;
        self.writing_subphase = false;
        self.seconds_remaining = 0;
        self.transition_locked = false;
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::idle()
    }
}

/// Read-only view of the run handed to the presentation surface after
/// every operation.
#[derive(Debug, Clone, Serialize)]
pub struct RunSnapshot {
    /// Lifecycle status.
    pub status: RunStatus,
    /// Index into the frozen sequence; `None` outside an active run.
    pub position: Option<usize>,
    /// Whether the current visual prompt is in its writing window.
    pub writing_subphase: bool,
    /// Whole seconds left in the current phase.
    pub seconds_remaining: u32,
    /// Number of items in the frozen sequence (pool size when idle).
    pub sequence_len: usize,
    /// The currently-addressable item, cloned for the surface.
    pub current_item: Option<StimulusItem>,
}

impl RunSnapshot {
    /// One-line human rendering for plain-terminal surfaces.
    #[must_use]
    pub fn describe(&self) -> String {
        match (&self.current_item, self.position) {
            (Some(item), Some(pos)) => {
                let phase = if self.writing_subphase {
                    "writing"
                } else {
                    "display"
                };
                format!(
                    "[{}] item {}/{} '{}' ({}) — {} phase, {}s remaining",
                    self.status,
                    pos + 1,
                    self.sequence_len,
                    item.label,
                    item.kind,
                    phase,
                    self.seconds_remaining
                )
            }
            _ => format!("[{}] {} item(s) pooled", self.status, self.sequence_len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_shape() {
        let state = RunState::idle();
        assert_eq!(state.status, RunStatus::NotStarted);
        assert_eq!(state.position, None);
        assert!(!state.writing_subphase);
        assert_eq!(state.seconds_remaining, 0);
        assert!(!state.transition_locked);
    }

    #[test]
    fn test_clear_to_ended() {
        let mut state = RunState {
            status: RunStatus::Running,
            position: Some(3),
            writing_subphase: true,
            seconds_remaining: 120,
            transition_locked: true,
        };
        state.clear_to_ended();
        assert_eq!(state.status, RunStatus::Ended);
        assert_eq!(state.position, None);
        assert!(!state.writing_subphase);
        assert_eq!(state.seconds_remaining, 0);
        assert!(!state.transition_locked);
    }

    #[test]
    fn test_active_statuses() {
        assert!(RunStatus::Running.is_active());
        assert!(RunStatus::Paused.is_active());
        assert!(!RunStatus::NotStarted.is_active());
        assert!(!RunStatus::Ended.is_active());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(RunStatus::NotStarted.to_string(), "not-started");
        assert_eq!(RunStatus::Running.to_string(), "running");
        assert_eq!(RunStatus::Paused.to_string(), "paused");
        assert_eq!(RunStatus::Ended.to_string(), "ended");
    }

    #[test]
    fn test_snapshot_describe_idle() {
        let snapshot = RunSnapshot {
            status: RunStatus::NotStarted,
            position: None,
            writing_subphase: false,
            seconds_remaining: 0,
            sequence_len: 4,
            current_item: None,
        };
        assert_eq!(snapshot.describe(), "[not-started] 4 item(s) pooled");
    }
}
