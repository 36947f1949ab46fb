//! Terminal view of the popup: layout model and drawing.
//!
//! Geometry is measured in terminal lines. The popup is a bordered input
//! box with a bordered result list below it; the container height covers
//! both and is what the height animation drives.

use std::time::Duration;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tokio::time::Instant;
use waylight_popup::{
    HeightConstraint, IconSlot, Preview, RenderedList, ResultRow, RowGeometry, RowLayout,
    SelectorPlacement,
};
use waylight_types::IconKind;

use crate::colors;

/// Lines taken by the bordered input box
pub const INPUT_LINES: u16 = 3;
/// Border lines around the result list
pub const LIST_BORDER: u16 = 2;
const MAX_WIDTH: u16 = 80;
const ANIMATION_DURATION: Duration = Duration::from_millis(250);

/// Screen lines `top..bottom` belong to result `index`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitRegion {
    pub top: u16,
    pub bottom: u16,
    pub index: usize,
}

/// Result row under screen line `row`, if any.
pub fn hit_test(hits: &[HitRegion], row: u16) -> Option<usize> {
    hits.iter()
        .find(|hit| (hit.top..hit.bottom).contains(&row))
        .map(|hit| hit.index)
}

/// Ease-out cubic height transition
#[derive(Debug, Clone, Copy)]
struct HeightTransition {
    from: f32,
    to: f32,
    started: Instant,
}

impl HeightTransition {
    fn value(&self, now: Instant) -> (f32, bool) {
        let t = (now.saturating_duration_since(self.started).as_secs_f32()
            / ANIMATION_DURATION.as_secs_f32())
        .min(1.0);
        let eased = 1.0 - (1.0 - t).powi(3);
        (self.from + (self.to - self.from) * eased, t >= 1.0)
    }
}

#[derive(Debug)]
pub struct ViewState {
    pub(crate) rows: Vec<ResultRow>,
    row_tops: Vec<u16>,
    pub(crate) selected_mark: Option<usize>,
    pub(crate) visible: bool,
    pub(crate) input_text: String,
    pub(crate) focused: bool,
    pub(crate) preview: Preview,
    pub(crate) selector: Option<SelectorPlacement>,
    scroll: u16,
    max_height: u16,
    constraint: HeightConstraint,
    displayed: f32,
    transition: Option<HeightTransition>,
}

impl ViewState {
    pub fn new(max_height: u16) -> Self {
        Self {
            rows: Vec::new(),
            row_tops: Vec::new(),
            selected_mark: None,
            visible: false,
            input_text: String::new(),
            focused: false,
            preview: Preview::Hidden,
            selector: None,
            scroll: 0,
            max_height,
            constraint: HeightConstraint::Auto,
            displayed: f32::from(INPUT_LINES),
            transition: None,
        }
    }

    pub fn set_max_height(&mut self, max_height: u16) {
        self.max_height = max_height.max(INPUT_LINES);
    }

    pub fn apply_rows(&mut self, list: &RenderedList) {
        self.rows = list.result_rows().cloned().collect();
        self.row_tops.clear();
        let mut top = 0u16;
        for row in &self.rows {
            self.row_tops.push(top);
            top = top.saturating_add(line_count(row));
        }
        self.selected_mark = self.rows.iter().find(|r| r.selected).map(|r| r.index);
        self.scroll = 0;
    }

    fn content_lines(&self) -> u16 {
        self.rows.iter().map(line_count).sum()
    }

    /// Lines available for rows at the maximum container height
    fn viewport_lines(&self) -> u16 {
        self.max_height
            .saturating_sub(INPUT_LINES + LIST_BORDER)
            .max(1)
    }

    pub fn natural_height(&self) -> f32 {
        let lines = if self.visible && !self.rows.is_empty() {
            INPUT_LINES + LIST_BORDER + self.content_lines()
        } else {
            INPUT_LINES
        };
        f32::from(lines.min(self.max_height))
    }

    pub fn row_geometry(&self, index: usize) -> Option<RowGeometry> {
        if !self.visible {
            return None;
        }
        let row = self.rows.get(index)?;
        Some(RowGeometry {
            top: f32::from(self.row_tops[index]),
            height: f32::from(line_count(row)),
        })
    }

    /// Scroll the least amount that brings row `index` fully into view.
    pub fn scroll_into_view(&mut self, index: usize) {
        let Some(row) = self.rows.get(index) else {
            return;
        };
        let top = self.row_tops[index];
        let bottom = top + line_count(row);
        let viewport = self.viewport_lines();

        if top < self.scroll {
            self.scroll = top;
        } else if bottom > self.scroll + viewport {
            self.scroll = bottom.saturating_sub(viewport);
        }
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// Height on screen at `now`. A fixed constraint that is still being
    /// animated towards reports the in-flight height, not its target.
    pub fn container_height(&self, now: Instant) -> f32 {
        match self.constraint {
            HeightConstraint::Auto => self.natural_height(),
            HeightConstraint::Fixed(_) => self.height_at(now).0,
        }
    }

    /// Change the constraint. Moving between fixed heights animates; leaving
    /// `Auto` snaps.
    pub fn set_constraint(&mut self, constraint: HeightConstraint, now: Instant) {
        match (self.constraint, constraint) {
            (HeightConstraint::Fixed(_), HeightConstraint::Fixed(to)) => {
                let (from, _) = self.height_at(now);
                self.transition = ((from - to).abs() > f32::EPSILON).then_some(HeightTransition {
                    from,
                    to,
                    started: now,
                });
                if self.transition.is_none() {
                    self.displayed = to;
                }
            }
            (_, HeightConstraint::Fixed(to)) => {
                self.transition = None;
                self.displayed = to;
            }
            (_, HeightConstraint::Auto) => {}
        }
        self.constraint = constraint;
    }

    /// Commit the current constraint without animating.
    pub fn flush(&mut self) {
        self.displayed = match self.constraint {
            HeightConstraint::Auto => self.natural_height(),
            HeightConstraint::Fixed(h) => h,
        };
        self.transition = None;
    }

    fn height_at(&self, now: Instant) -> (f32, bool) {
        match &self.transition {
            Some(transition) => transition.value(now),
            None => (self.displayed, true),
        }
    }

    /// Advance the height animation to `now` and return the height to draw.
    pub fn advance(&mut self, now: Instant) -> u16 {
        let (height, done) = self.height_at(now);
        self.displayed = height;
        if done {
            self.transition = None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let lines = height.round().max(0.0) as u16;
        lines.clamp(INPUT_LINES.min(self.max_height), self.max_height)
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }
}

fn line_count(row: &ResultRow) -> u16 {
    u16::try_from(row.line_count()).unwrap_or(u16::MAX)
}

fn icon_text(icon: &IconSlot) -> String {
    match icon {
        IconSlot::None => " ".to_string(),
        IconSlot::Glyph(glyph) => glyph.symbol().to_string(),
        IconSlot::Text(text) => text.clone(),
        IconSlot::Image { fallback, .. } => fallback.to_string(),
        IconSlot::Initial(letter) => letter.to_string(),
    }
}

fn preview_text(preview: &Preview) -> String {
    match preview {
        Preview::Hidden => "›".to_string(),
        Preview::Glyph(glyph) => glyph.symbol().to_string(),
        Preview::Icon(icon) if IconKind::classify(icon) == IconKind::Glyph => icon.clone(),
        Preview::Icon(_) => "▣".to_string(),
    }
}

fn row_lines(row: &ResultRow, selected: bool) -> Vec<Line<'static>> {
    let label_style = if selected {
        Style::default()
            .fg(colors::ON_SURFACE)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors::ON_SURFACE)
    };

    match &row.layout {
        RowLayout::Calc { expression, value } => vec![
            Line::from(Span::styled(
                format!("   {expression}"),
                Style::default().fg(colors::SUBTEXT),
            )),
            Line::from(vec![
                Span::styled(
                    format!("   {value}"),
                    Style::default()
                        .fg(colors::SUCCESS)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("  ⧉", Style::default().fg(colors::OUTLINE)),
            ]),
        ],
        RowLayout::Entry { label, detail } => {
            let mut lines = vec![Line::from(vec![
                Span::raw(format!(" {} ", icon_text(&row.icon))),
                Span::styled(label.clone(), label_style),
            ])];
            if let Some(detail) = detail {
                lines.push(Line::from(Span::styled(
                    format!("    {detail}"),
                    Style::default().fg(colors::SUBTEXT),
                )));
            }
            lines
        }
    }
}

/// Draw the popup `height` lines tall. Returns where each visible row landed.
pub fn draw(f: &mut Frame, view: &ViewState, height: u16) -> Vec<HitRegion> {
    let area = f.area();
    let width = area.width.min(MAX_WIDTH);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y,
        width,
        height: height.min(area.height),
    };

    f.render_widget(
        Block::default().style(Style::default().bg(colors::BG)),
        popup,
    );

    let input_area = Rect {
        height: INPUT_LINES.min(popup.height),
        ..popup
    };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::PRIMARY))
        .title(" Waylight ");
    let input_inner = input_block.inner(input_area);

    let prefix = format!(" {} ", preview_text(&view.preview));
    let input_line = if view.input_text.is_empty() {
        Line::from(vec![
            Span::raw(prefix.clone()),
            Span::styled("Search...", Style::default().fg(colors::OUTLINE)),
        ])
    } else {
        Line::from(vec![
            Span::raw(prefix.clone()),
            Span::styled(
                view.input_text.clone(),
                Style::default().fg(colors::ON_SURFACE),
            ),
        ])
    };
    f.render_widget(Paragraph::new(input_line).block(input_block), input_area);

    if view.focused && input_inner.height > 0 {
        let typed = Line::from(format!("{prefix}{}", view.input_text)).width();
        let offset = u16::try_from(typed).unwrap_or(u16::MAX);
        let x = input_inner
            .x
            .saturating_add(offset)
            .min(input_inner.right().saturating_sub(1));
        f.set_cursor_position((x, input_inner.y));
    }

    let mut hits = Vec::new();
    let list_height = popup.height.saturating_sub(INPUT_LINES);
    if !view.visible || list_height <= LIST_BORDER {
        return hits;
    }

    let list_area = Rect {
        y: popup.y + INPUT_LINES,
        height: list_height,
        ..popup
    };
    let list_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::OUTLINE));
    let inner = list_block.inner(list_area);
    f.render_widget(list_block, list_area);

    let highlight = view.selector.map(|placement| {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let top = placement.offset.max(0.0) as u16;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let bottom = (placement.offset + placement.height).max(0.0) as u16;
        top..bottom
    });

    let scroll = view.scroll();
    let mut lines = Vec::new();
    let mut line_no = 0u16;
    for row in &view.rows {
        let row_lines = row_lines(row, view.selected_mark == Some(row.index));
        let row_top = line_no;
        for line in row_lines {
            if line_no >= scroll && line_no < scroll + inner.height {
                let line = if highlight.as_ref().is_some_and(|h| h.contains(&line_no)) {
                    line.style(Style::default().bg(colors::SURFACE_HIGH))
                } else {
                    line
                };
                lines.push(line);
            }
            line_no += 1;
        }

        let top = row_top.max(scroll);
        let bottom = line_no.min(scroll + inner.height);
        if top < bottom {
            hits.push(HitRegion {
                top: inner.y + (top - scroll),
                bottom: inner.y + (bottom - scroll),
                index: row.index,
            });
        }
    }
    f.render_widget(Paragraph::new(lines), inner);

    hits
}
