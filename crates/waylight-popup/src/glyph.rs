//! Fixed icons used by the popup and the initial-letter fallback.

/// Built-in icon, independent of the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Glyph {
    Calculator,
    Folder,
    File,
    Copy,
}

const CALCULATOR_SVG: &str = r#"<svg width="32" height="32" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="1.5" stroke-linecap="round" stroke-linejoin="round"><rect x="4" y="2" width="16" height="20" rx="2"/><line x1="8" y1="6" x2="16" y2="6"/><line x1="8" y1="10" x2="8" y2="10.01"/><line x1="12" y1="10" x2="12" y2="10.01"/><line x1="16" y1="10" x2="16" y2="10.01"/><line x1="8" y1="14" x2="8" y2="14.01"/><line x1="12" y1="14" x2="12" y2="14.01"/><line x1="16" y1="14" x2="16" y2="14.01"/><line x1="8" y1="18" x2="8" y2="18.01"/><line x1="12" y1="18" x2="16" y2="18"/></svg>"#;

const FOLDER_SVG: &str = r#"<svg width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="1.5" stroke-linecap="round" stroke-linejoin="round"><path d="M3 7a2 2 0 0 1 2-2h4l2 2h8a2 2 0 0 1 2 2v8a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2z"/></svg>"#;

const FILE_SVG: &str = r#"<svg width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="1.5" stroke-linecap="round" stroke-linejoin="round"><path d="M14 2H6a2 2 0 0 0-2 2v16a2 2 0 0 0 2 2h12a2 2 0 0 0 2-2V8z"/><polyline points="14 2 14 8 20 8"/></svg>"#;

const COPY_SVG: &str = r#"<svg class="copy-icon" width="18" height="18" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><rect x="9" y="9" width="13" height="13" rx="2" ry="2"/><path d="M5 15H4a2 2 0 0 1-2-2V4a2 2 0 0 1 2-2h9a2 2 0 0 1 2 2v1"/></svg>"#;

impl Glyph {
    /// Inline SVG markup
    #[must_use]
    pub fn svg(self) -> &'static str {
        match self {
            Glyph::Calculator => CALCULATOR_SVG,
            Glyph::Folder => FOLDER_SVG,
            Glyph::File => FILE_SVG,
            Glyph::Copy => COPY_SVG,
        }
    }

    /// Text stand-in for surfaces that cannot draw SVG
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Glyph::Calculator => "🧮",
            Glyph::Folder => "📁",
            Glyph::File => "📄",
            Glyph::Copy => "⧉",
        }
    }
}

/// Fallback avatar letter: the first character of `name`, upper-cased.
#[must_use]
pub fn initial(name: &str) -> char {
    name.chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or('?')
}
