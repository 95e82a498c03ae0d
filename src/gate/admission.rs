//! Admission Gate
//!
//! Fixed-window admission shared by every caller of one client. The gate
//! holds a single atomic counter of admissions in the current window; the
//! window timer zeroes it once per period and wakes parked callers.
//!
//! Check and increment are one compare-and-swap, so concurrent callers can
//! never push the counter past the limit. Parked callers re-check the
//! counter after every wake and give up once their wait budget (twice the
//! window period, measured from entry) runs out.

use crate::config::RateWindow;
use crate::error::AdmissionError;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;

/// Proof of a granted admission
#[derive(Debug, Clone, Copy)]
pub struct Admission {
    /// Time spent waiting for a slot
    pub waited: Duration,
}

/// Shared admission gate enforcing a fixed window
pub struct RequestGate {
    /// Window parameters, immutable after construction
    window: RateWindow,

    /// Admissions granted in the current window
    admitted: AtomicU32,

    /// Set once by shutdown, never cleared
    closed: AtomicBool,

    /// Broadcast waking parked callers after a reset or on close
    reset_notify: Notify,
}

impl RequestGate {
    /// Create an open gate for the given window
    pub fn new(window: RateWindow) -> Self {
        Self {
            window,
            admitted: AtomicU32::new(0),
            closed: AtomicBool::new(false),
            reset_notify: Notify::new(),
        }
    }

    /// Window parameters this gate enforces
    pub fn window(&self) -> RateWindow {
        self.window
    }

    /// Admissions granted in the current window
    pub fn admitted(&self) -> u32 {
        self.admitted.load(Ordering::SeqCst)
    }

    /// Whether the gate has been closed by shutdown
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Attempt a non-blocking admission
    ///
    /// Returns true if a slot was taken. Check and increment are a single
    /// atomic step.
    pub fn try_admit(&self) -> bool {
        let limit = self.window.limit();
        let mut current = self.admitted.load(Ordering::SeqCst);

        loop {
            if current >= limit {
                return false;
            }

            match self.admitted.compare_exchange_weak(
                current,
                current + 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return true,
                Err(actual) => {
                    current = actual;
                }
            }
        }
    }

    /// Block until admitted, the gate closes, or the wait budget runs out
    ///
    /// The budget is twice the window period, measured from entry. Being
    /// woken by a reset and finding the window already re-saturated does
    /// not extend it.
    pub async fn admit(&self) -> Result<Admission, AdmissionError> {
        let entered = Instant::now();
        let budget = self.window.wait_budget();
        let deadline = entered + budget;

        let notified = self.reset_notify.notified();
        tokio::pin!(notified);

        loop {
            // Register for the next wake before checking state, so a reset
            // landing between the check and the await is not lost.
            notified.as_mut().enable();

            if self.is_closed() {
                return Err(AdmissionError::Rejected);
            }

            if self.try_admit() {
                let waited = entered.elapsed();
                if !waited.is_zero() {
                    tracing::debug!("Admitted after waiting {}ms", waited.as_millis());
                }
                return Ok(Admission { waited });
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(AdmissionError::Timeout {
                    waited: now - entered,
                    budget,
                });
            }

            match tokio::time::timeout_at(deadline, notified.as_mut()).await {
                Ok(()) => {
                    // Woken by a reset or by close; arm a fresh wake and
                    // re-check everything.
                    notified.set(self.reset_notify.notified());
                }
                Err(_) => {
                    return Err(AdmissionError::Timeout {
                        waited: entered.elapsed(),
                        budget,
                    });
                }
            }
        }
    }

    /// Zero the counter, waking parked callers if the window was saturated
    ///
    /// Returns the number of admissions in the window that just ended. A
    /// parked caller implies the counter was at the limit, and nothing but
    /// a reset lowers it, so the conditional wake cannot strand anyone.
    pub fn reset_window(&self) -> u32 {
        let previous = self.admitted.swap(0, Ordering::SeqCst);

        if previous >= self.window.limit() {
            self.reset_notify.notify_waiters();
        }

        previous
    }

    /// Close the gate and wake every parked caller so they observe the
    /// rejection instead of sleeping out their budgets
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!("Admission gate closed");
            self.reset_notify.notify_waiters();
        }
    }
}
