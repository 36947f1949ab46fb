//! Selector and preview synchronization.
//!
//! The preview slot follows the selected result immediately. The sliding
//! selector depends on row geometry, so it is placed from a frame callback
//! once the surface has laid the rows out.

use waylight_types::{IconKind, ResultItem};

use crate::escape::escape_html;
use crate::glyph::Glyph;
use crate::surface::RowGeometry;

/// Content of the preview slot next to the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    Hidden,
    Glyph(Glyph),
    /// Icon supplied by the backend for the selected app
    Icon(String),
}

impl Preview {
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        matches!(self, Preview::Hidden)
    }

    /// Preview markup; empty while hidden.
    #[must_use]
    pub fn markup(&self) -> String {
        match self {
            Preview::Hidden => String::new(),
            Preview::Glyph(glyph) => glyph.svg().to_string(),
            Preview::Icon(icon) if IconKind::classify(icon) == IconKind::Image => format!(
                r#"<img src="{}" alt="" class="preview-icon">"#,
                escape_html(icon)
            ),
            Preview::Icon(icon) => format!(
                r#"<span class="preview-glyph">{}</span>"#,
                escape_html(icon)
            ),
        }
    }
}

/// Preview for the selected result.
#[must_use]
pub fn preview_for(selected: Option<&ResultItem>) -> Preview {
    match selected {
        Some(ResultItem::Calc { .. }) => Preview::Glyph(Glyph::Calculator),
        Some(ResultItem::Dir { .. }) => Preview::Glyph(Glyph::Folder),
        Some(ResultItem::File { .. }) => Preview::Glyph(Glyph::File),
        Some(item @ ResultItem::App { .. }) => item
            .icon()
            .map_or(Preview::Hidden, |icon| Preview::Icon(icon.to_string())),
        None => Preview::Hidden,
    }
}

/// Where the sliding highlight goes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectorPlacement {
    pub offset: f32,
    pub height: f32,
}

impl From<RowGeometry> for SelectorPlacement {
    fn from(geometry: RowGeometry) -> Self {
        Self {
            offset: geometry.top,
            height: geometry.height,
        }
    }
}
