//! Window Timer
//!
//! Background task that resets the admission window at a fixed cadence.
//! The first reset lands one full period after the timer starts; a delayed
//! tick does not shift the ones after it.

use crate::gate::admission::RequestGate;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, timeout, Instant};

/// Periodic reset driver for a [`RequestGate`]
///
/// Owns the background task from `start` until `stop`. Dropping the timer
/// without stopping it also terminates the task, through the closed signal
/// channel, but `stop` is the supported path because it bounds how long the
/// task may linger.
pub struct WindowTimer {
    /// Signals the reset task to exit
    shutdown_tx: watch::Sender<bool>,

    /// Reset task handle, taken by the first `stop`
    task: Mutex<Option<JoinHandle<()>>>,
}

impl WindowTimer {
    /// Spawn the reset task for `gate`, ticking once per window period
    pub fn start(gate: Arc<RequestGate>) -> Self {
        let period = gate.window().period();
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        // Anchor the cadence to the moment the timer is created, not to
        // whenever the task first runs.
        let first_tick = Instant::now() + period;

        let task = tokio::spawn(async move {
            let mut ticks = interval_at(first_tick, period);

            loop {
                tokio::select! {
                    _ = ticks.tick() => {
                        let previous = gate.reset_window();
                        tracing::trace!("Window reset, {} admissions in closed window", previous);
                    }
                    _ = shutdown_rx.changed() => {
                        tracing::debug!("Window timer stopping");
                        break;
                    }
                }
            }
        });

        tracing::debug!("Window timer started with {}ms period", period.as_millis());

        Self {
            shutdown_tx,
            task: Mutex::new(Some(task)),
        }
    }

    /// Stop the reset task, aborting it if it has not exited within `grace`
    ///
    /// Repeated calls are no-ops.
    pub async fn stop(&self, grace: Duration) {
        let handle = self.task.lock().await.take();
        let Some(mut handle) = handle else {
            return;
        };

        let _ = self.shutdown_tx.send(true);

        match timeout(grace, &mut handle).await {
            Ok(_) => tracing::debug!("Window timer stopped"),
            Err(_) => {
                tracing::warn!(
                    "Window timer did not stop within {}ms, aborting",
                    grace.as_millis()
                );
                handle.abort();
                let _ = handle.await;
            }
        }
    }
}
