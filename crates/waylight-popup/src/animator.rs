//! Container height animator.
//!
//! A surface can only animate between two explicit heights, so a change in
//! content height is turned into one: measure where we are, measure where the
//! content wants to be, pin the former, flush, then set the latter.

use tracing::debug;

use crate::surface::{HeightConstraint, Surface};

/// Height transition started by [`HeightAnimator::run`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightChange {
    pub from: f32,
    pub to: f32,
}

/// Coalesces height recomputation requests into one run per frame.
#[derive(Debug, Default)]
pub struct HeightAnimator {
    pending: bool,
}

impl HeightAnimator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a recomputation on the next frame.
    ///
    /// Returns `false` if one was already scheduled.
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Run the scheduled recomputation, if any.
    pub fn run<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Option<HeightChange> {
        if !std::mem::take(&mut self.pending) {
            return None;
        }

        let from = surface.container_height();
        surface.set_container_height(HeightConstraint::Auto);
        let to = surface.container_height();
        surface.set_container_height(HeightConstraint::Fixed(from));
        surface.flush_layout();
        surface.set_container_height(HeightConstraint::Fixed(to));

        debug!("Container height {} -> {}", from, to);
        Some(HeightChange { from, to })
    }

    /// Pin the current natural height as an explicit height, without animating.
    ///
    /// Drops any scheduled recomputation.
    pub fn pin<S: Surface + ?Sized>(&mut self, surface: &mut S) -> f32 {
        self.pending = false;
        surface.set_container_height(HeightConstraint::Auto);
        let height = surface.container_height();
        surface.set_container_height(HeightConstraint::Fixed(height));
        height
    }
}
