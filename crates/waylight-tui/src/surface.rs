//! Terminal implementation of the popup surface.

use std::io::{self, Stdout};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use waylight_popup::{
    HeightConstraint, IconSlot, Preview, RenderedList, RowGeometry, SelectorPlacement, Surface,
    UiEvent,
};

use crate::view::{self, HitRegion, ViewState};

pub struct TerminalSurface {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    view: ViewState,
    hits: watch::Sender<Vec<HitRegion>>,
    events: mpsc::UnboundedSender<UiEvent>,
}

impl TerminalSurface {
    /// Take over the terminal: raw mode, alternate screen, mouse capture.
    ///
    /// `events` receives surface-originated events such as icon load failures.
    pub fn enter(
        events: mpsc::UnboundedSender<UiEvent>,
    ) -> io::Result<(Self, watch::Receiver<Vec<HitRegion>>)> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        let height = terminal.size().map(|size| size.height).unwrap_or(24);

        let (hits, hits_rx) = watch::channel(Vec::new());
        Ok((
            Self {
                terminal,
                view: ViewState::new(height),
                hits,
                events,
            },
            hits_rx,
        ))
    }

    /// Give the terminal back.
    pub fn leave(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Surface for TerminalSurface {
    fn apply_rows(&mut self, list: &RenderedList) {
        self.view.apply_rows(list);

        // Images cannot be drawn here; rows fall back to their initial
        for row in list.result_rows() {
            if matches!(row.icon, IconSlot::Image { .. }) {
                let _ = self.events.send(UiEvent::IconLoadFailed(row.index));
            }
        }
    }

    fn mark_selected(&mut self, index: usize) {
        self.view.selected_mark = Some(index);
    }

    fn set_results_visible(&mut self, visible: bool) {
        self.view.visible = visible;
    }

    fn set_input_text(&mut self, text: &str) {
        text.clone_into(&mut self.view.input_text);
    }

    fn focus_input(&mut self) {
        self.view.focused = true;
    }

    fn set_preview(&mut self, preview: &Preview) {
        self.view.preview = preview.clone();
    }

    fn place_selector(&mut self, placement: SelectorPlacement) {
        self.view.selector = Some(placement);
    }

    fn scroll_row_into_view(&mut self, index: usize) {
        self.view.scroll_into_view(index);
    }

    fn row_geometry(&self, index: usize) -> Option<RowGeometry> {
        self.view.row_geometry(index)
    }

    fn container_height(&mut self) -> f32 {
        self.view.container_height(Instant::now())
    }

    fn set_container_height(&mut self, height: HeightConstraint) {
        self.view.set_constraint(height, Instant::now());
    }

    fn flush_layout(&mut self) {
        self.view.flush();
    }

    fn present(&mut self) {
        if let Ok(size) = self.terminal.size() {
            self.view.set_max_height(size.height);
        }
        let height = self.view.advance(Instant::now());

        let view = &self.view;
        let mut hits = Vec::new();
        if let Err(e) = self.terminal.draw(|f| hits = view::draw(f, view, height)) {
            tracing::error!("Failed to draw popup: {}", e);
            return;
        }
        self.hits.send_replace(hits);
    }

    fn is_animating(&self) -> bool {
        self.view.is_animating()
    }
}
