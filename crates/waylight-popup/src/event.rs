//! Events delivered by the host surface.

use crate::dispatcher::InputEdit;

/// Logical keys the popup reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Escape
    Cancel,
    Down,
    Up,
    /// Enter
    Confirm,
}

/// Whether the host should suppress its default handling of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The input field now holds this text
    Input(String),
    /// Keystroke-level edit of the input field
    Edit(InputEdit),
    Key(Key),
    /// Pointer activation of a result row
    RowActivated(usize),
    /// The icon image of a result row failed to load
    IconLoadFailed(usize),
    /// The popup window became visible
    Shown,
}
