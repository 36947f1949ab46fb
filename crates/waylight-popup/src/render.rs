//! Render engine: a pure mapping from results and selection to visual rows.
//!
//! The output carries both structured row data (for surfaces that draw
//! natively) and an HTML fragment per row (for web-view surfaces). Every
//! backend-supplied string is escaped before it reaches the markup.

use std::fmt::Write;

use waylight_types::{IconKind, ResultItem, ResultKind};

use crate::escape::escape_html;
use crate::glyph::{Glyph, initial};

/// Icon column of a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSlot {
    /// No icon column (calculator rows)
    None,
    /// Built-in glyph
    Glyph(Glyph),
    /// Backend-supplied literal glyph (emoji, symbol)
    Text(String),
    /// Backend-supplied image, with the letter to show if it fails to load
    Image { src: String, fallback: char },
    /// No icon supplied: letter avatar
    Initial(char),
}

/// Text content of a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowLayout {
    /// Two-line calculator block: `"{query} ="` above the value
    Calc { expression: String, value: String },
    /// Label with optional secondary line
    Entry {
        label: String,
        detail: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    /// Position in the result set; activating the row selects this result
    pub index: usize,
    pub kind: ResultKind,
    pub selected: bool,
    pub icon: IconSlot,
    pub layout: RowLayout,
    /// Calculator rows offer a copy affordance
    pub copyable: bool,
    /// Escaped HTML for this row
    pub markup: String,
}

impl ResultRow {
    /// Number of text lines the row occupies.
    #[must_use]
    pub fn line_count(&self) -> usize {
        match &self.layout {
            RowLayout::Calc { .. }
            | RowLayout::Entry {
                detail: Some(_), ..
            } => 2,
            RowLayout::Entry { detail: None, .. } => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// Placeholder for the sliding highlight; always first
    Selector,
    Result(ResultRow),
}

const SELECTOR_MARKUP: &str = r#"<div class="selector"></div>"#;

/// Output of [`render`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedList {
    rows: Vec<Row>,
}

impl RenderedList {
    /// All rows, the selector placeholder first.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Only the result rows, in display order.
    pub fn result_rows(&self) -> impl Iterator<Item = &ResultRow> {
        self.rows.iter().filter_map(|row| match row {
            Row::Result(r) => Some(r),
            Row::Selector => None,
        })
    }

    #[must_use]
    pub fn result_row(&self, index: usize) -> Option<&ResultRow> {
        self.result_rows().nth(index)
    }

    /// Number of result rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Complete list markup.
    #[must_use]
    pub fn markup(&self) -> String {
        self.rows
            .iter()
            .map(|row| match row {
                Row::Selector => SELECTOR_MARKUP,
                Row::Result(r) => r.markup.as_str(),
            })
            .collect()
    }
}

/// Map the result set and selection to rows.
#[must_use]
pub fn render(results: &[ResultItem], selected: Option<usize>) -> RenderedList {
    let mut rows = Vec::with_capacity(results.len() + 1);
    rows.push(Row::Selector);
    rows.extend(
        results
            .iter()
            .enumerate()
            .map(|(index, result)| Row::Result(render_row(index, result, selected == Some(index)))),
    );
    RenderedList { rows }
}

fn render_row(index: usize, result: &ResultItem, selected: bool) -> ResultRow {
    let kind = result.kind();
    let (icon, layout) = match result {
        ResultItem::Calc { query, value } => (
            IconSlot::None,
            RowLayout::Calc {
                expression: format!("{query} ="),
                value: value.clone(),
            },
        ),
        ResultItem::File { name, description } => (
            IconSlot::Glyph(Glyph::File),
            RowLayout::Entry {
                label: name.clone(),
                detail: Some(description.clone()),
            },
        ),
        ResultItem::Dir { name, description } => (
            IconSlot::Glyph(Glyph::Folder),
            RowLayout::Entry {
                label: name.clone(),
                detail: Some(description.clone()),
            },
        ),
        ResultItem::App {
            name, description, ..
        } => (
            app_icon(result.icon(), name),
            RowLayout::Entry {
                label: name.clone(),
                detail: description.clone().filter(|d| !d.is_empty()),
            },
        ),
    };

    let mut row = ResultRow {
        index,
        kind,
        selected,
        icon,
        layout,
        copyable: kind == ResultKind::Calc,
        markup: String::new(),
    };
    row.markup = row_markup(&row);
    row
}

fn app_icon(icon: Option<&str>, name: &str) -> IconSlot {
    match icon {
        Some(icon) if IconKind::classify(icon) == IconKind::Image => IconSlot::Image {
            src: icon.to_string(),
            fallback: initial(name),
        },
        Some(icon) => IconSlot::Text(icon.to_string()),
        None => IconSlot::Initial(initial(name)),
    }
}

fn row_markup(row: &ResultRow) -> String {
    let mut out = String::with_capacity(256);
    let calc_class = if row.kind == ResultKind::Calc {
        " calc-result"
    } else {
        ""
    };
    let selected_class = if row.selected { " selected" } else { "" };
    let _ = write!(
        out,
        r#"<div class="result-item{calc_class}{selected_class}" data-index="{}" data-kind="{}">"#,
        row.index,
        row.kind.as_str()
    );

    match &row.layout {
        RowLayout::Calc { expression, value } => {
            let _ = write!(
                out,
                r#"<div class="result-text"><div class="result-description">{}</div><div class="result-name">{}</div></div>{}"#,
                escape_html(expression),
                escape_html(value),
                Glyph::Copy.svg()
            );
        }
        RowLayout::Entry { label, detail } => {
            out.push_str(r#"<div class="result-icon">"#);
            push_icon_markup(&mut out, &row.icon);
            let _ = write!(
                out,
                r#"</div><div class="result-text"><div class="result-name">{}</div>"#,
                escape_html(label)
            );
            if let Some(detail) = detail {
                let _ = write!(
                    out,
                    r#"<div class="result-description">{}</div>"#,
                    escape_html(detail)
                );
            }
            out.push_str("</div>");
        }
    }

    out.push_str("</div>");
    out
}

fn push_icon_markup(out: &mut String, icon: &IconSlot) {
    match icon {
        IconSlot::None => {}
        IconSlot::Glyph(glyph) => out.push_str(glyph.svg()),
        IconSlot::Text(text) => {
            let _ = write!(out, r#"<span class="icon-glyph">{}</span>"#, escape_html(text));
        }
        IconSlot::Image { src, fallback } => {
            let _ = write!(
                out,
                r#"<img src="{}" alt=""><span class="icon-fallback" hidden>{}</span>"#,
                escape_html(src),
                escape_html(&fallback.to_string())
            );
        }
        IconSlot::Initial(letter) => {
            let _ = write!(
                out,
                r#"<span class="icon-fallback">{}</span>"#,
                escape_html(&letter.to_string())
            );
        }
    }
}
