//! Countdown driver: the cancellable 1 Hz scheduler behind `tick()`.
//!
//! A background task fires once per second and produces at most one
//! engine call per firing. It only calls [`SequencingEngine::tick`]
//! while the run reports Running (a paused run keeps the cadence but
//! discards firings), and the task retires itself once the run ends.
//! The token makes cancellation immediate from the outside at any time.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::sequencer::SequencingEngine;
use super::state::RunStatus;

/// Handle to the spawned countdown task.
#[derive(Debug)]
pub struct CountdownDriver {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl CountdownDriver {
    /// Spawns the countdown task over a shared engine.
    ///
    /// The first firing lands one full second after spawn, so the phase
    /// established by `start()` gets its whole duration.
    #[must_use]
    pub fn spawn(engine: Arc<Mutex<SequencingEngine>>) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            let period = Duration::from_secs(1);
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                tokio::select! {
                    () = token.cancelled() => {
                        debug!("countdown driver cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        let mut engine = engine.lock().await;
                        match engine.status() {
                            RunStatus::Running => engine.tick(),
                            // Suspended: keep the cadence, discard the firing.
                            RunStatus::Paused | RunStatus::NotStarted => {}
                            RunStatus::Ended => {
                                debug!("countdown driver retiring: run ended");
                                break;
                            }
                        }
                    }
                }
            }
        });
        Self { cancel, handle }
    }

    /// Cancels the countdown task.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Waits for the task to finish (after cancellation or run end).
    ///
    /// # Errors
    ///
    /// Returns the join error if the task panicked.
    pub async fn join(self) -> Result<(), tokio::task::JoinError> {
        self.handle.await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Payload, StimulusItem, StimulusKind};

    fn word_engine(labels: &[&str]) -> Arc<Mutex<SequencingEngine>> {
        let pool = labels
            .iter()
            .map(|l| {
                StimulusItem::new(StimulusKind::WordPrompt, *l, Payload::Text((*l).into()))
            })
            .collect();
        let (engine, _rx) = SequencingEngine::new(pool);
        Arc::new(Mutex::new(engine))
    }

    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_decrements_while_running() {
        let engine = word_engine(&["wat-1"]);
        engine.lock().await.start().unwrap();
        let driver = CountdownDriver::spawn(Arc::clone(&engine));

        tokio::time::advance(Duration::from_secs(3)).await;
        settle().await;

        assert_eq!(engine.lock().await.snapshot().seconds_remaining, 12);
        driver.shutdown();
        driver.join().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_discards_firings_while_paused() {
        let engine = word_engine(&["wat-1"]);
        engine.lock().await.start().unwrap();
        let driver = CountdownDriver::spawn(Arc::clone(&engine));

        tokio::time::advance(Duration::from_secs(2)).await;
        settle().await;
        engine.lock().await.pause().unwrap();

        tokio::time::advance(Duration::from_secs(5)).await;
        settle().await;
        assert_eq!(engine.lock().await.snapshot().seconds_remaining, 13);

        engine.lock().await.resume().unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(engine.lock().await.snapshot().seconds_remaining, 12);

        driver.shutdown();
        driver.join().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_runs_sequence_to_completion_and_retires() {
        let engine = word_engine(&["wat-1", "wat-2"]);
        engine.lock().await.start().unwrap();
        let driver = CountdownDriver::spawn(Arc::clone(&engine));

        // 15 s per word prompt, plus one extra firing to observe the end.
        tokio::time::advance(Duration::from_secs(31)).await;
        settle().await;

        assert_eq!(engine.lock().await.status(), RunStatus::Ended);
        // The task retires on its own; join without cancelling.
        tokio::time::timeout(Duration::from_secs(5), driver.join())
            .await
            .expect("driver should retire after the run ends")
            .unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_cancels_driver() {
        let engine = word_engine(&["wat-1"]);
        engine.lock().await.start().unwrap();
        let driver = CountdownDriver::spawn(Arc::clone(&engine));
        driver.shutdown();
        tokio::time::timeout(Duration::from_secs(5), driver.join())
            .await
            .expect("driver should stop after shutdown")
            .unwrap();
    }
}
