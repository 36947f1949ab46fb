//! Popup controller: ties input, results, rendering and the surface together.
//!
//! The controller is a synchronous state machine. Every entry point takes the
//! current time explicitly; timed work (the search debounce and the per-frame
//! geometry work) is only recorded, and performed when the owner of the event
//! loop calls [`PopupController::tick`] at or after
//! [`PopupController::next_deadline`].

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};
use waylight_bridge::BridgeHandle;
use waylight_types::{Inbound, Outbound, ResultItem};

use crate::animator::HeightAnimator;
use crate::config::PopupConfig;
use crate::dispatcher::{InputAction, InputEdit, QueryDispatcher};
use crate::event::{Key, KeyOutcome, UiEvent};
use crate::render::{RenderedList, render};
use crate::store::{ResultStore, SelectionState};
use crate::surface::Surface;
use crate::sync::{Preview, SelectorPlacement, preview_for};

pub struct PopupController<S: Surface> {
    surface: S,
    bridge: BridgeHandle,
    dispatcher: QueryDispatcher,
    store: ResultStore,
    animator: HeightAnimator,
    rendered: RenderedList,
    preview: Preview,
    frame_interval: Duration,
    /// Next paint opportunity, if frame work is pending
    frame_at: Option<Instant>,
    selector_dirty: bool,
    /// Number of searches dispatched so far
    generation: u64,
    /// Results are only accepted for searches dispatched after this generation
    accepted_after: u64,
    last_query: Option<String>,
    close_requested: bool,
}

impl<S: Surface> PopupController<S> {
    pub fn new(surface: S, bridge: BridgeHandle, config: &PopupConfig) -> Self {
        Self {
            surface,
            bridge,
            dispatcher: QueryDispatcher::new(config.debounce()),
            store: ResultStore::new(),
            animator: HeightAnimator::new(),
            rendered: render(&[], None),
            preview: Preview::Hidden,
            frame_interval: config.frame_interval(),
            frame_at: None,
            selector_dirty: false,
            generation: 0,
            accepted_after: 0,
            last_query: None,
            close_requested: false,
        }
    }

    /// Bring the surface into the initial state: empty, focused, height pinned.
    pub fn start(&mut self) {
        self.surface.apply_rows(&self.rendered);
        self.surface.set_results_visible(false);
        self.surface.set_preview(&self.preview);
        self.surface.focus_input();
        self.animator.pin(&mut self.surface);
    }

    /// Dispatch a host event.
    ///
    /// Returns the key outcome for [`UiEvent::Key`], `None` for everything else.
    pub fn handle(&mut self, event: UiEvent, now: Instant) -> Option<KeyOutcome> {
        match event {
            UiEvent::Input(text) => self.on_input(text, now),
            UiEvent::Edit(edit) => self.on_edit(edit, now),
            UiEvent::Key(key) => return Some(self.on_key(key, now)),
            UiEvent::RowActivated(index) => self.activate_row(index),
            UiEvent::IconLoadFailed(index) => {
                debug!("Icon for row {} failed to load, showing initial", index);
            }
            UiEvent::Shown => self.on_shown(),
        }
        None
    }

    /// The input field changed to `text`.
    pub fn on_input(&mut self, text: impl Into<String>, now: Instant) {
        let action = self.dispatcher.on_input(text, now);
        self.after_input(action, now);
    }

    /// Apply a keystroke-level edit and mirror the new text to the surface.
    pub fn on_edit(&mut self, edit: InputEdit, now: Instant) {
        let action = self.dispatcher.apply_edit(edit, now);
        self.surface.set_input_text(self.dispatcher.text());
        self.after_input(action, now);
    }

    fn after_input(&mut self, action: InputAction, now: Instant) {
        match action {
            InputAction::Armed(deadline) => {
                debug!("Search armed for {:?}", deadline.saturating_duration_since(now));
            }
            InputAction::Hide => {
                self.accepted_after = self.generation;
                self.clear_results(now);
            }
        }
    }

    pub fn on_key(&mut self, key: Key, now: Instant) -> KeyOutcome {
        match key {
            Key::Cancel => {
                info!("Closing popup");
                self.bridge.send(Outbound::Close);
                self.close_requested = true;
                KeyOutcome::Ignored
            }
            Key::Down | Key::Up if self.store.is_empty() => KeyOutcome::Ignored,
            Key::Down => {
                if self.store.move_down() {
                    self.selection_changed(now);
                }
                KeyOutcome::Handled
            }
            Key::Up => {
                if self.store.move_up() {
                    self.selection_changed(now);
                }
                KeyOutcome::Handled
            }
            Key::Confirm if self.store.is_empty() => KeyOutcome::Ignored,
            Key::Confirm => {
                self.activate();
                KeyOutcome::Handled
            }
        }
    }

    /// Send the selected result to the backend. No-op while empty.
    pub fn activate(&self) {
        if let Some(result) = self.store.selected_result() {
            self.send_select(result.clone());
        }
    }

    /// Send the result at `index` to the backend, regardless of the selection.
    pub fn activate_row(&self, index: usize) {
        match self.store.get(index) {
            Some(result) => self.send_select(result.clone()),
            None => debug!("Ignoring activation of row {} (out of range)", index),
        }
    }

    fn send_select(&self, result: ResultItem) {
        debug!("Selecting {} result {:?}", result.kind().as_str(), result.name());
        self.bridge.send(Outbound::Select { result });
    }

    pub fn on_inbound(&mut self, message: Inbound, now: Instant) {
        match message {
            Inbound::Results { results } => {
                if self.generation > self.accepted_after {
                    self.set_results(results, now);
                } else {
                    debug!(
                        "Discarding {} results: no search outstanding since last clear",
                        results.len()
                    );
                }
            }
            Inbound::Reset => self.reset(),
        }
    }

    /// Replace the result set and resynchronize the surface.
    pub fn set_results(&mut self, results: Vec<ResultItem>, now: Instant) {
        let state = self.store.set_results(results);
        debug!("Results updated: {:?}", state);

        self.rendered = render(self.store.results(), self.store.selected());
        self.surface.apply_rows(&self.rendered);
        self.surface.set_results_visible(!self.store.is_empty());
        self.update_preview();

        if let Some(index) = self.store.selected() {
            self.surface.scroll_row_into_view(index);
            self.selector_dirty = true;
        }
        self.request_height(now);
    }

    fn selection_changed(&mut self, now: Instant) {
        let Some(index) = self.store.selected() else {
            return;
        };
        debug!("Selection moved to {}", index);

        self.rendered = render(self.store.results(), Some(index));
        self.surface.mark_selected(index);
        self.surface.scroll_row_into_view(index);
        self.update_preview();
        self.selector_dirty = true;
        self.request_frame(now);
    }

    /// Empty the store and hide the panel, clearing the preview right away.
    fn clear_results(&mut self, now: Instant) {
        self.store.reset();
        self.rendered = render(&[], None);
        self.surface.apply_rows(&self.rendered);
        self.surface.set_results_visible(false);
        self.update_preview();
        self.selector_dirty = false;
        self.request_height(now);
    }

    /// Return to the initial state regardless of the current one and refocus
    /// the input.
    pub fn reset(&mut self) {
        debug!("Resetting popup (was {:?})", self.store.state());
        self.dispatcher.reset();
        self.accepted_after = self.generation;
        self.close_requested = false;
        self.surface.set_input_text("");

        self.store.reset();
        self.rendered = render(&[], None);
        self.surface.apply_rows(&self.rendered);
        self.surface.set_results_visible(false);
        self.update_preview();
        self.selector_dirty = false;

        self.animator.pin(&mut self.surface);
        self.frame_at = None;
        self.surface.focus_input();
    }

    /// The popup window was shown again.
    pub fn on_shown(&mut self) {
        self.reset();
    }

    fn update_preview(&mut self) {
        self.preview = preview_for(self.store.selected_result());
        self.surface.set_preview(&self.preview);
    }

    fn request_height(&mut self, now: Instant) {
        self.animator.request();
        self.request_frame(now);
    }

    fn request_frame(&mut self, now: Instant) {
        if self.frame_at.is_none() {
            self.frame_at = Some(now + self.frame_interval);
        }
    }

    /// Earliest time [`Self::tick`] has work to do.
    #[must_use]
    pub fn next_deadline(&self, now: Instant) -> Option<Instant> {
        let animating = self
            .surface
            .is_animating()
            .then(|| now + self.frame_interval);
        [self.dispatcher.deadline(), self.frame_at, animating]
            .into_iter()
            .flatten()
            .min()
    }

    /// Run whatever timed work is due at `now`.
    pub fn tick(&mut self, now: Instant) {
        if let Some(query) = self.dispatcher.take_due(now) {
            self.generation += 1;
            debug!("Dispatching search #{} for '{}'", self.generation, query);
            self.last_query = Some(query.clone());
            self.bridge.send(Outbound::Search { query });
        }

        if self.frame_at.is_some_and(|at| at <= now) {
            self.frame_at = None;
            self.run_frame();
        }
    }

    /// Geometry-dependent work: height animation, then the selector.
    fn run_frame(&mut self) {
        self.animator.run(&mut self.surface);

        if std::mem::take(&mut self.selector_dirty)
            && let Some(index) = self.store.selected()
        {
            match self.surface.row_geometry(index) {
                Some(geometry) => self
                    .surface
                    .place_selector(SelectorPlacement::from(geometry)),
                None => debug!("Row {} not laid out, selector left in place", index),
            }
        }
    }

    #[must_use]
    pub fn state(&self) -> SelectionState {
        self.store.state()
    }

    #[must_use]
    pub fn results(&self) -> &[ResultItem] {
        self.store.results()
    }

    #[must_use]
    pub fn selected_result(&self) -> Option<&ResultItem> {
        self.store.selected_result()
    }

    #[must_use]
    pub fn input_text(&self) -> &str {
        self.dispatcher.text()
    }

    #[must_use]
    pub fn rendered(&self) -> &RenderedList {
        &self.rendered
    }

    #[must_use]
    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    /// Query text of the most recent dispatched search
    #[must_use]
    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    #[must_use]
    pub fn is_search_pending(&self) -> bool {
        self.dispatcher.is_armed()
    }

    #[must_use]
    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::Glyph;
    use crate::surface::{HeightConstraint, RecordingSurface, SurfaceCall};
    use tokio::sync::mpsc;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn controller() -> (
        PopupController<RecordingSurface>,
        mpsc::UnboundedReceiver<Outbound>,
    ) {
        let (bridge, rx) = BridgeHandle::channel();
        let mut controller =
            PopupController::new(RecordingSurface::new(), bridge, &PopupConfig::default());
        controller.start();
        controller.surface_mut().take_calls();
        (controller, rx)
    }

    fn three_apps() -> Vec<ResultItem> {
        vec![
            ResultItem::app("Firefox").with_icon("🌐"),
            ResultItem::app("Terminal").with_icon("⌨️"),
            ResultItem::app("Files").with_icon("📁"),
        ]
    }

    #[test]
    fn test_start_pins_height_and_focuses() {
        let (controller, _rx) = controller();
        assert!(controller.surface().is_focused());
        assert!(matches!(
            controller.surface().constraint(),
            HeightConstraint::Fixed(_)
        ));
        assert_eq!(controller.state(), SelectionState::Empty);
    }

    #[test]
    fn test_search_sent_after_debounce() {
        let (mut controller, mut rx) = controller();
        let t0 = Instant::now();

        controller.on_input("fire", t0);
        assert_eq!(controller.next_deadline(t0), Some(t0 + ms(50)));
        controller.tick(t0 + ms(49));
        assert!(rx.try_recv().is_err());

        controller.tick(t0 + ms(50));
        assert_eq!(
            rx.try_recv().unwrap(),
            Outbound::Search {
                query: "fire".to_string()
            }
        );
        assert_eq!(controller.last_query(), Some("fire"));
    }

    #[test]
    fn test_set_results_selects_first_and_updates_preview() {
        let (mut controller, _rx) = controller();
        let t0 = Instant::now();

        controller.set_results(three_apps(), t0);
        assert_eq!(
            controller.state(),
            SelectionState::Listing { len: 3, index: 0 }
        );
        assert!(controller.surface().results_visible());
        assert_eq!(controller.preview(), &Preview::Icon("🌐".to_string()));
        assert_eq!(controller.surface().selected_mark(), Some(0));
    }

    #[test]
    fn test_empty_results_while_listing_hide_panel() {
        let (mut controller, _rx) = controller();
        let t0 = Instant::now();

        controller.set_results(three_apps(), t0);
        controller.on_key(Key::Down, t0);
        controller.tick(t0 + ms(16));
        controller.surface_mut().take_calls();

        let t1 = t0 + ms(100);
        controller.set_results(Vec::new(), t1);

        assert_eq!(controller.state(), SelectionState::Empty);
        assert!(controller.selected_result().is_none());
        assert!(controller.rendered().is_empty());
        assert!(!controller.surface().results_visible());
        assert!(controller.preview().is_hidden());
        assert!(controller.surface().preview().is_hidden());
        assert_eq!(controller.next_deadline(t1), Some(t1 + ms(16)));

        controller.tick(t1 + ms(16));
        let calls = controller.surface_mut().take_calls();
        assert_eq!(
            calls.last(),
            Some(&SurfaceCall::SetHeight(HeightConstraint::Fixed(
                crate::surface::INPUT_HEIGHT
            )))
        );
        assert!(
            !calls
                .iter()
                .any(|call| matches!(call, SurfaceCall::PlaceSelector(_)))
        );
        assert_eq!(controller.on_key(Key::Confirm, t1), KeyOutcome::Ignored);
    }

    #[test]
    fn test_set_results_twice_is_idempotent() {
        let (mut controller, _rx) = controller();
        let t0 = Instant::now();

        controller.set_results(three_apps(), t0);
        let first = controller.rendered().clone();
        controller.on_key(Key::Down, t0);
        controller.set_results(three_apps(), t0);

        assert_eq!(controller.rendered(), &first);
        assert_eq!(
            controller.state(),
            SelectionState::Listing { len: 3, index: 0 }
        );
    }

    #[test]
    fn test_selector_placed_on_frame_not_synchronously() {
        let (mut controller, _rx) = controller();
        let t0 = Instant::now();

        controller.set_results(three_apps(), t0);
        assert!(controller.surface().selector().is_none());

        controller.tick(t0 + ms(16));
        let first = controller.surface().selector().unwrap();

        controller.on_key(Key::Down, t0 + ms(20));
        assert_eq!(controller.surface().selector(), Some(first));

        controller.tick(t0 + ms(36));
        let second = controller.surface().selector().unwrap();
        assert!(second.offset > first.offset);
    }

    #[test]
    fn test_frame_requests_coalesce() {
        let (mut controller, _rx) = controller();
        let t0 = Instant::now();

        controller.set_results(three_apps(), t0);
        controller.on_key(Key::Down, t0 + ms(5));
        controller.on_key(Key::Down, t0 + ms(10));
        assert_eq!(controller.next_deadline(t0 + ms(10)), Some(t0 + ms(16)));

        controller.surface_mut().take_calls();
        controller.tick(t0 + ms(16));
        let flushes = controller
            .surface()
            .calls()
            .iter()
            .filter(|c| **c == SurfaceCall::FlushLayout)
            .count();
        assert_eq!(flushes, 1);
        assert!(controller.next_deadline(t0 + ms(16)).is_none());
    }

    #[test]
    fn test_navigation_keys() {
        let (mut controller, mut rx) = controller();
        let t0 = Instant::now();

        assert_eq!(controller.on_key(Key::Down, t0), KeyOutcome::Ignored);
        assert_eq!(controller.on_key(Key::Confirm, t0), KeyOutcome::Ignored);
        assert!(rx.try_recv().is_err());

        controller.set_results(three_apps(), t0);
        assert_eq!(controller.on_key(Key::Down, t0), KeyOutcome::Handled);
        assert_eq!(controller.on_key(Key::Up, t0), KeyOutcome::Handled);
        assert_eq!(controller.on_key(Key::Up, t0), KeyOutcome::Handled);
        assert_eq!(
            controller.state(),
            SelectionState::Listing { len: 3, index: 0 }
        );
    }

    #[test]
    fn test_cancel_sends_close() {
        let (mut controller, mut rx) = controller();
        let outcome = controller.on_key(Key::Cancel, Instant::now());

        assert_eq!(outcome, KeyOutcome::Ignored);
        assert_eq!(rx.try_recv().unwrap(), Outbound::Close);
        assert!(controller.close_requested());
    }

    #[test]
    fn test_activate_row_ignores_selection() {
        let (mut controller, mut rx) = controller();
        controller.set_results(three_apps(), Instant::now());

        controller.activate_row(2);
        controller.activate_row(7);
        assert_eq!(
            rx.try_recv().unwrap(),
            Outbound::Select {
                result: three_apps()[2].clone()
            }
        );
        assert!(rx.try_recv().is_err());
        assert_eq!(controller.selected_result(), Some(&three_apps()[0]));
    }

    #[test]
    fn test_clearing_input_hides_synchronously() {
        let (mut controller, mut rx) = controller();
        let t0 = Instant::now();

        controller.on_input("fire", t0);
        controller.tick(t0 + ms(50));
        let _ = rx.try_recv();
        controller.on_inbound(
            Inbound::Results {
                results: three_apps(),
            },
            t0 + ms(60),
        );
        assert!(controller.surface().results_visible());

        controller.on_input("abc", t0 + ms(70));
        controller.on_input("", t0 + ms(80));

        assert!(!controller.surface().results_visible());
        assert!(controller.surface().preview().is_hidden());
        assert_eq!(controller.state(), SelectionState::Empty);
        assert!(!controller.is_search_pending());

        controller.tick(t0 + ms(1000));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_late_results_after_clear_are_discarded() {
        let (mut controller, mut rx) = controller();
        let t0 = Instant::now();

        controller.on_input("fire", t0);
        controller.tick(t0 + ms(50));
        assert!(rx.try_recv().is_ok());

        controller.on_input("", t0 + ms(55));
        controller.on_inbound(
            Inbound::Results {
                results: three_apps(),
            },
            t0 + ms(100),
        );
        assert_eq!(controller.state(), SelectionState::Empty);
        assert!(!controller.surface().results_visible());
    }

    #[test]
    fn test_results_without_any_search_are_discarded() {
        let (mut controller, _rx) = controller();
        controller.on_inbound(
            Inbound::Results {
                results: three_apps(),
            },
            Instant::now(),
        );
        assert_eq!(controller.state(), SelectionState::Empty);
    }

    #[test]
    fn test_calc_preview_uses_glyph() {
        let (mut controller, _rx) = controller();
        controller.set_results(vec![ResultItem::calc("12*4", "48")], Instant::now());
        assert_eq!(controller.preview(), &Preview::Glyph(Glyph::Calculator));
    }

    #[test]
    fn test_edits_mirror_text_to_surface() {
        let (mut controller, _rx) = controller();
        let t0 = Instant::now();

        controller.on_edit(InputEdit::Insert('h'), t0);
        controller.on_edit(InputEdit::Insert('i'), t0);
        assert_eq!(controller.surface().input_text(), "hi");
        assert_eq!(controller.input_text(), "hi");

        controller.on_edit(InputEdit::Clear, t0);
        assert_eq!(controller.surface().input_text(), "");
        assert!(!controller.is_search_pending());
    }

    #[test]
    fn test_shown_resets_and_refocuses() {
        let (mut controller, _rx) = controller();
        let t0 = Instant::now();
        controller.on_input("fire", t0);
        controller.set_results(three_apps(), t0);
        controller.surface_mut().take_calls();

        controller.handle(UiEvent::Shown, t0);
        assert_eq!(controller.state(), SelectionState::Empty);
        assert_eq!(controller.input_text(), "");
        assert!(
            controller
                .surface()
                .calls()
                .contains(&SurfaceCall::FocusInput)
        );
    }
}
