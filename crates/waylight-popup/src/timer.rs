//! Single-slot cancellable timer.
//!
//! The timer does not sleep by itself. It records a deadline and a payload;
//! whoever owns the event loop asks for [`PendingTimer::deadline`], sleeps
//! until then and calls [`PendingTimer::take_due`]. Re-arming replaces the
//! previous deadline, so a superseded payload can never fire.

use tokio::time::Instant;

#[derive(Debug)]
pub struct PendingTimer<T> {
    slot: Option<(Instant, T)>,
}

impl<T> Default for PendingTimer<T> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<T> PendingTimer<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any pending payload, then arm `payload` for `deadline`.
    ///
    /// Returns the payload that was superseded, if any.
    pub fn arm(&mut self, deadline: Instant, payload: T) -> Option<T> {
        self.slot.replace((deadline, payload)).map(|(_, old)| old)
    }

    /// Cancel the pending payload, returning it.
    pub fn cancel(&mut self) -> Option<T> {
        self.slot.take().map(|(_, payload)| payload)
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.slot.as_ref().map(|(deadline, _)| *deadline)
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.slot.is_some()
    }

    /// Take the payload if its deadline has been reached at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.slot {
            Some((deadline, _)) if *deadline <= now => self.cancel(),
            _ => None,
        }
    }
}
