//! Sequencing engine: the test-run state machine.
//!
//! Owns the item pool, the sequence frozen for the lifetime of a run,
//! and the [`RunState`]. All mutation flows through the operation set
//! {start, tick, pause, resume, advance, retreat, end} plus the pool
//! mutation requests, so every state change happens inside exactly one
//! operation body.
//!
//! Countdown expiry and manual navigation are two independent triggers
//! for the same transition logic. Both paths begin with the same
//! indivisible check-then-set of the transition lock, so a timeout and a
//! button press landing in the same instant apply the transition once:
//! never a double-advance, never a half-applied phase.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::EngineError;
use crate::item::{ItemId, StimulusItem, StimulusKind};
use crate::schedule::phase_seconds;
use crate::sequence;

use super::event::{EndReason, EngineEvent};
use super::state::{RunSnapshot, RunState, RunStatus};

/// The sequencing engine. One instance per test deck; a run is the span
/// from a successful `start()` to the next `end()` (explicit or by
/// sequence exhaustion).
pub struct SequencingEngine {
    /// Item pool in insertion order; mutable only while no run is active.
    pool: Vec<StimulusItem>,
    /// Presentation order, rebuilt on pool mutation and frozen by `start()`.
    sequence: Vec<StimulusItem>,
    /// The mutable run state.
    run: RunState,
    /// Cue/run-ended stream toward the presentation surface.
    events: mpsc::UnboundedSender<EngineEvent>,
}

impl SequencingEngine {
    /// Creates an engine over an initial pool, returning the receiving
    /// end of its event stream.
    #[must_use]
    pub fn new(pool: Vec<StimulusItem>) -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let sequence = sequence::build(&pool);
        (
            Self {
                pool,
                sequence,
                run: RunState::idle(),
                events,
            },
            rx,
        )
    }

    // ------------------------------------------------------------------
    // Read-only surface
    // ------------------------------------------------------------------

    /// Current run status.
    #[must_use]
    pub const fn status(&self) -> RunStatus {
        self.run.status
    }

    /// The pooled items, in insertion order.
    #[must_use]
    pub fn pool(&self) -> &[StimulusItem] {
        &self.pool
    }

    /// The built presentation order (frozen while a run is active).
    #[must_use]
    pub fn sequence(&self) -> &[StimulusItem] {
        &self.sequence
    }

    /// The currently-addressable item, if a run is active.
    #[must_use]
    pub fn current_item(&self) -> Option<&StimulusItem> {
        self.run.position.and_then(|pos| self.sequence.get(pos))
    }

    /// Read-only view of the run for the presentation surface.
    #[must_use]
    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            status: self.run.status,
            position: self.run.position,
            writing_subphase: self.run.writing_subphase,
            seconds_remaining: self.run.seconds_remaining,
            sequence_len: self.sequence.len(),
            current_item: self.current_item().cloned(),
        }
    }

    // ------------------------------------------------------------------
    // Run operations
    // ------------------------------------------------------------------

    /// Starts a run over the frozen sequence.
    ///
    /// # Errors
    ///
    /// [`EngineError::EmptySequence`] when the pool holds no items;
    /// [`EngineError::InvalidOperation`] when a run is already active.
    /// Neither changes any state.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.run.status.is_active() {
            return Err(EngineError::invalid(
                "start",
                format!("status is {}, expected not-started or ended", self.run.status),
            ));
        }

        // Defensive rebuild; a no-op for an unchanged pool.
        self.sequence = sequence::build(&self.pool);
        if self.sequence.is_empty() {
            warn!("start rejected: empty sequence");
            return Err(EngineError::EmptySequence);
        }

        let kind = self.sequence[0].kind;
        self.run = RunState {
            status: RunStatus::Running,
            position: Some(0),
            writing_subphase: false,
            seconds_remaining: phase_seconds(kind, false),
            transition_locked: false,
        };
        info!(items = self.sequence.len(), %kind, "run started");
        self.emit_cue(0, kind, false);
        Ok(())
    }

    /// One elapsed second of countdown. Driver-only.
    ///
    /// Decrements the countdown while the run is live and unlocked; the
    /// tick that reaches zero hands over to the transition algorithm
    /// under the lock. Outside those preconditions the call does nothing.
    pub fn tick(&mut self) {
        if self.run.status != RunStatus::Running
            || self.run.transition_locked
            || self.run.seconds_remaining == 0
        {
            return;
        }
        self.run.seconds_remaining -= 1;
        if self.run.seconds_remaining == 0 {
            self.transition("countdown expired");
        }
    }

    /// Suspends the countdown.
    ///
    /// Never interrupts an in-flight transition, only subsequent ticks.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidOperation`] unless the run is running.
    pub fn pause(&mut self) -> Result<(), EngineError> {
        if self.run.status != RunStatus::Running {
            return Err(EngineError::invalid(
                "pause",
                format!("status is {}, expected running", self.run.status),
            ));
        }
        self.run.status = RunStatus::Paused;
        info!(seconds_remaining = self.run.seconds_remaining, "run paused");
        Ok(())
    }

    /// Resumes the countdown where it left off.
    ///
    /// Clears a leftover transition lock when seconds remain, so ticking
    /// resumes cleanly.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidOperation`] unless the run is paused.
    pub fn resume(&mut self) -> Result<(), EngineError> {
        if self.run.status != RunStatus::Paused {
            return Err(EngineError::invalid(
                "resume",
                format!("status is {}, expected paused", self.run.status),
            ));
        }
        self.run.status = RunStatus::Running;
        if self.run.seconds_remaining > 0 {
            self.run.transition_locked = false;
        }
        info!(seconds_remaining = self.run.seconds_remaining, "run resumed");
        Ok(())
    }

    /// Manual "Next": applies the transition logic immediately,
    /// discarding whatever remains of the current phase.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidOperation`] unless the run is running,
    /// unlocked, and there is somewhere to go: a later item, or the
    /// current visual prompt's writing window still to run.
    pub fn advance(&mut self) -> Result<(), EngineError> {
        if self.run.status != RunStatus::Running {
            return Err(EngineError::invalid(
                "advance",
                format!("status is {}, expected running", self.run.status),
            ));
        }
        if self.run.transition_locked {
            return Err(EngineError::invalid(
                "advance",
                "a transition is already in flight",
            ));
        }
        let Some(pos) = self.run.position else {
            return Err(EngineError::invalid("advance", "no current item"));
        };
        if pos + 1 >= self.sequence.len() && !self.run.writing_subphase {
            return Err(EngineError::invalid(
                "advance",
                "already at the final phase of the last item",
            ));
        }
        self.transition("manual advance");
        Ok(())
    }

    /// Manual "Previous": re-enters the prior item's initial display
    /// phase. Always exits any writing sub-phase; a prior item's writing
    /// window is never replayed.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidOperation`] unless the run is running,
    /// unlocked, and a prior item exists.
    pub fn retreat(&mut self) -> Result<(), EngineError> {
        if self.run.status != RunStatus::Running {
            return Err(EngineError::invalid(
                "retreat",
                format!("status is {}, expected running", self.run.status),
            ));
        }
        if self.run.transition_locked {
            return Err(EngineError::invalid(
                "retreat",
                "a transition is already in flight",
            ));
        }
        let Some(pos) = self.run.position else {
            return Err(EngineError::invalid("retreat", "no current item"));
        };
        if pos == 0 {
            return Err(EngineError::invalid("retreat", "already at the first item"));
        }

        self.run.transition_locked = true;
        let prev = pos - 1;
        let kind = self.sequence[prev].kind;
        self.run.writing_subphase = false;
        self.run.position = Some(prev);
        self.run.seconds_remaining = phase_seconds(kind, false);
        info!(from = pos, to = prev, "manual retreat");
        self.emit_cue(prev, kind, false);
        self.run.transition_locked = false;
        Ok(())
    }

    /// Ends the run. Callable from any state, always immediate, and
    /// clears the lock regardless of what was in flight.
    pub fn end(&mut self) {
        self.finish(EndReason::Terminated);
    }

    // ------------------------------------------------------------------
    // Transition algorithm (internal, lock-guarded)
    // ------------------------------------------------------------------

    /// Decides and commits the next phase. The lock check-then-set is
    /// the first action, so a second trigger arriving while a transition
    /// is in flight finds the lock held and does nothing.
    fn transition(&mut self, trigger: &'static str) {
        if self.run.transition_locked {
            debug!(trigger, "transition suppressed: lock held");
            return;
        }
        self.run.transition_locked = true;

        let Some(pos) = self.run.position else {
            // No addressable item; nothing to transition.
            self.run.transition_locked = false;
            return;
        };
        let kind = self.sequence[pos].kind;

        if kind.has_writing_subphase() && !self.run.writing_subphase {
            // Display window of a visual prompt completed: enter the
            // writing window for the same item.
            self.run.writing_subphase = true;
            self.run.seconds_remaining = phase_seconds(kind, true);
            info!(position = pos, trigger, "entering writing sub-phase");
            self.emit_cue(pos, kind, true);
            self.run.transition_locked = false;
        } else {
            // Writing window finished, or the item had none.
            self.run.writing_subphase = false;
            if pos + 1 < self.sequence.len() {
                let next = pos + 1;
                let next_kind = self.sequence[next].kind;
                self.run.position = Some(next);
                self.run.seconds_remaining = phase_seconds(next_kind, false);
                info!(from = pos, to = next, kind = %next_kind, trigger, "item transition");
                self.emit_cue(next, next_kind, false);
                self.run.transition_locked = false;
            } else {
                self.finish(EndReason::SequenceExhausted);
            }
        }
    }

    /// Commits the ended state and notifies the surface. Clears the lock
    /// unconditionally.
    fn finish(&mut self, reason: EndReason) {
        self.run.clear_to_ended();
        info!(?reason, "run ended");
        let _ = self.events.send(EngineEvent::ended(reason));
    }

    /// Emits one cue for the phase just established. Send failures mean
    /// the surface hung up; the run continues regardless.
    fn emit_cue(&self, position: usize, kind: StimulusKind, writing_subphase: bool) {
        let _ = self.events.send(EngineEvent::cue(
            position,
            kind,
            writing_subphase,
            self.run.seconds_remaining,
        ));
    }

    // ------------------------------------------------------------------
    // Pool mutation (rejected while a run is active)
    // ------------------------------------------------------------------

    /// Adds classified items to the pool and rebuilds the sequence.
    ///
    /// # Errors
    ///
    /// [`EngineError::PoolMutationRejected`] while a run is active.
    pub fn add_items(&mut self, items: Vec<StimulusItem>) -> Result<usize, EngineError> {
        self.reject_if_frozen(format!("add {} item(s)", items.len()))?;
        let added = items.len();
        self.pool.extend(items);
        self.sequence = sequence::build(&self.pool);
        debug!(added, pool = self.pool.len(), "pool extended");
        Ok(added)
    }

    /// Deletes one pooled item by id and rebuilds the sequence.
    ///
    /// # Errors
    ///
    /// [`EngineError::PoolMutationRejected`] while a run is active;
    /// [`EngineError::InvalidOperation`] when no pooled item has the id.
    pub fn delete_item(&mut self, id: ItemId) -> Result<StimulusItem, EngineError> {
        self.reject_if_frozen(format!("delete item {id}"))?;
        let index = self
            .pool
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| {
                EngineError::invalid("delete-item", format!("no pooled item with id {id}"))
            })?;
        let removed = self.pool.remove(index);
        self.sequence = sequence::build(&self.pool);
        debug!(label = %removed.label, pool = self.pool.len(), "item deleted");
        Ok(removed)
    }

    /// Empties the pool.
    ///
    /// # Errors
    ///
    /// [`EngineError::PoolMutationRejected`] while a run is active.
    pub fn delete_all(&mut self) -> Result<usize, EngineError> {
        self.reject_if_frozen("delete all items".to_string())?;
        let removed = self.pool.len();
        self.pool.clear();
        self.sequence.clear();
        debug!(removed, "pool cleared");
        Ok(removed)
    }

    fn reject_if_frozen(&self, request: String) -> Result<(), EngineError> {
        let status = match self.run.status {
            RunStatus::Running => "running",
            RunStatus::Paused => "paused",
            RunStatus::NotStarted | RunStatus::Ended => return Ok(()),
        };
        warn!(status, %request, "pool mutation rejected");
        Err(EngineError::PoolMutationRejected { status, request })
    }

    /// Test hook: hold the transition lock as if a transition were in
    /// flight, to exercise the single-flight guards.
    #[cfg(test)]
    pub(crate) const fn force_lock(&mut self) {
        self.run.transition_locked = true;
    }

    /// Test hook: observe the lock flag between operations.
    #[cfg(test)]
    pub(crate) const fn is_locked(&self) -> bool {
        self.run.transition_locked
    }
}

impl std::fmt::Debug for SequencingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequencingEngine")
            .field("pool_len", &self.pool.len())
            .field("sequence_len", &self.sequence.len())
            .field("status", &self.run.status)
            .field("position", &self.run.position)
            .finish_non_exhaustive()
    }
}
