//! The seam between the controller and whatever draws the popup.
//!
//! A surface owns layout: it knows how tall rows are, where they sit, and
//! how to animate a height change. The controller only tells it what to
//! show and asks it for measurements.

use crate::render::{RenderedList, Row};
use crate::sync::{Preview, SelectorPlacement};

/// Laid-out position of a result row, relative to the list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowGeometry {
    pub top: f32,
    pub height: f32,
}

/// Height constraint on the popup container
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeightConstraint {
    /// Size to content
    Auto,
    /// Explicit height; changes between fixed heights animate
    Fixed(f32),
}

pub trait Surface {
    /// Replace the rendered rows.
    fn apply_rows(&mut self, list: &RenderedList);

    /// Move the `selected` marker to `index` without rebuilding rows.
    fn mark_selected(&mut self, index: usize);

    fn set_results_visible(&mut self, visible: bool);

    fn set_input_text(&mut self, text: &str);

    fn focus_input(&mut self);

    fn set_preview(&mut self, preview: &Preview);

    fn place_selector(&mut self, placement: SelectorPlacement);

    /// Scroll the list the minimum amount needed to show row `index`.
    fn scroll_row_into_view(&mut self, index: usize);

    /// Geometry of result row `index`, if it is laid out.
    fn row_geometry(&self, index: usize) -> Option<RowGeometry>;

    /// Measure the container under its current constraint.
    fn container_height(&mut self) -> f32;

    fn set_container_height(&mut self, height: HeightConstraint);

    /// Force pending layout work to happen now.
    fn flush_layout(&mut self);

    /// Push the current state to the screen. Called once per loop iteration.
    fn present(&mut self) {}

    /// Whether a height transition is still in progress.
    fn is_animating(&self) -> bool {
        false
    }
}

/// Height of the input bar
pub const INPUT_HEIGHT: f32 = 56.0;
/// Height of one line of row text
pub const LINE_HEIGHT: f32 = 22.0;
/// Vertical padding inside every row
pub const ROW_PADDING: f32 = 12.0;
/// Vertical padding around the list while it is visible
pub const LIST_PADDING: f32 = 8.0;

/// Recorded surface call
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    ApplyRows(usize),
    MarkSelected(usize),
    ResultsVisible(bool),
    InputText(String),
    FocusInput,
    Preview(Preview),
    PlaceSelector(SelectorPlacement),
    ScrollIntoView(usize),
    MeasureHeight(f32),
    SetHeight(HeightConstraint),
    FlushLayout,
}

/// Surface that lays rows out on a fixed line grid and records every call.
///
/// Used for headless runs and as a test double.
#[derive(Debug)]
pub struct RecordingSurface {
    rows: Vec<f32>,
    list: RenderedList,
    selected_mark: Option<usize>,
    visible: bool,
    input_text: String,
    focused: bool,
    preview: Preview,
    selector: Option<SelectorPlacement>,
    constraint: HeightConstraint,
    calls: Vec<SurfaceCall>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            list: RenderedList::default(),
            selected_mark: None,
            visible: false,
            input_text: String::new(),
            focused: false,
            preview: Preview::Hidden,
            selector: None,
            constraint: HeightConstraint::Auto,
            calls: Vec::new(),
        }
    }
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Height the container has when sized to content.
    #[must_use]
    pub fn natural_height(&self) -> f32 {
        if self.visible && !self.rows.is_empty() {
            INPUT_HEIGHT + LIST_PADDING * 2.0 + self.rows.iter().sum::<f32>()
        } else {
            INPUT_HEIGHT
        }
    }

    #[must_use]
    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Drain the call log.
    pub fn take_calls(&mut self) -> Vec<SurfaceCall> {
        std::mem::take(&mut self.calls)
    }

    #[must_use]
    pub fn list(&self) -> &RenderedList {
        &self.list
    }

    #[must_use]
    pub fn selected_mark(&self) -> Option<usize> {
        self.selected_mark
    }

    #[must_use]
    pub fn results_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    #[must_use]
    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    #[must_use]
    pub fn selector(&self) -> Option<SelectorPlacement> {
        self.selector
    }

    #[must_use]
    pub fn constraint(&self) -> HeightConstraint {
        self.constraint
    }
}

impl Surface for RecordingSurface {
    fn apply_rows(&mut self, list: &RenderedList) {
        self.rows = list
            .rows()
            .iter()
            .filter_map(|row| match row {
                Row::Result(r) => {
                    #[allow(clippy::cast_precision_loss)]
                    let lines = r.line_count() as f32;
                    Some(lines * LINE_HEIGHT + ROW_PADDING)
                }
                Row::Selector => None,
            })
            .collect();
        self.selected_mark = list.result_rows().find(|r| r.selected).map(|r| r.index);
        self.list = list.clone();
        self.calls.push(SurfaceCall::ApplyRows(list.len()));
    }

    fn mark_selected(&mut self, index: usize) {
        self.selected_mark = Some(index);
        self.calls.push(SurfaceCall::MarkSelected(index));
    }

    fn set_results_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.calls.push(SurfaceCall::ResultsVisible(visible));
    }

    fn set_input_text(&mut self, text: &str) {
        self.input_text = text.to_string();
        self.calls.push(SurfaceCall::InputText(text.to_string()));
    }

    fn focus_input(&mut self) {
        self.focused = true;
        self.calls.push(SurfaceCall::FocusInput);
    }

    fn set_preview(&mut self, preview: &Preview) {
        self.preview = preview.clone();
        self.calls.push(SurfaceCall::Preview(preview.clone()));
    }

    fn place_selector(&mut self, placement: SelectorPlacement) {
        self.selector = Some(placement);
        self.calls.push(SurfaceCall::PlaceSelector(placement));
    }

    fn scroll_row_into_view(&mut self, index: usize) {
        self.calls.push(SurfaceCall::ScrollIntoView(index));
    }

    fn row_geometry(&self, index: usize) -> Option<RowGeometry> {
        if !self.visible {
            return None;
        }
        let height = *self.rows.get(index)?;
        let top = LIST_PADDING + self.rows[..index].iter().sum::<f32>();
        Some(RowGeometry { top, height })
    }

    fn container_height(&mut self) -> f32 {
        let height = match self.constraint {
            HeightConstraint::Auto => self.natural_height(),
            HeightConstraint::Fixed(h) => h,
        };
        self.calls.push(SurfaceCall::MeasureHeight(height));
        height
    }

    fn set_container_height(&mut self, height: HeightConstraint) {
        self.constraint = height;
        self.calls.push(SurfaceCall::SetHeight(height));
    }

    fn flush_layout(&mut self) {
        self.calls.push(SurfaceCall::FlushLayout);
    }
}
