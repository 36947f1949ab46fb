//! Query dispatcher: owns the input text and debounces searches.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::timer::PendingTimer;

/// Incremental edit of the input text, for hosts that deliver keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEdit {
    Insert(char),
    Backspace,
    Clear,
}

/// What the controller has to do after an input change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Input is blank: hide immediately, nothing will be sent
    Hide,
    /// A search is armed for the given deadline
    Armed(Instant),
}

#[derive(Debug)]
pub struct QueryDispatcher {
    text: String,
    delay: Duration,
    pending: PendingTimer<String>,
}

impl QueryDispatcher {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            text: String::new(),
            delay,
            pending: PendingTimer::new(),
        }
    }

    /// Current input text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the input text.
    ///
    /// Blank input cancels any pending search synchronously. Anything else
    /// re-arms the debounce with the raw (untrimmed) text.
    pub fn on_input(&mut self, raw: impl Into<String>, now: Instant) -> InputAction {
        self.text = raw.into();

        if self.text.trim().is_empty() {
            if self.pending.cancel().is_some() {
                debug!("Input cleared, cancelled pending search");
            }
            return InputAction::Hide;
        }

        let deadline = now + self.delay;
        if let Some(superseded) = self.pending.arm(deadline, self.text.clone()) {
            debug!("Search for '{}' superseded", superseded);
        }
        InputAction::Armed(deadline)
    }

    /// Apply a keystroke-level edit and treat the result as new input.
    pub fn apply_edit(&mut self, edit: InputEdit, now: Instant) -> InputAction {
        let mut text = std::mem::take(&mut self.text);
        match edit {
            InputEdit::Insert(c) => text.push(c),
            InputEdit::Backspace => {
                text.pop();
            }
            InputEdit::Clear => text.clear(),
        }
        self.on_input(text, now)
    }

    /// Query to send if the debounce has elapsed at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<String> {
        self.pending.take_due(now)
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.deadline()
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.pending.is_armed()
    }

    /// Clear the text and drop any pending search.
    pub fn reset(&mut self) {
        self.text.clear();
        self.pending.cancel();
    }
}
