//! Shared types for the Waylight launcher popup.
//!
//! This crate provides the result model and the message contract exchanged
//! between the popup controller and the search backend. All types are
//! serializable for transport; the backend speaks JSON objects tagged with a
//! `"type"` field.

use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a result list leniently.
///
/// A `null` or missing list becomes empty, and entries that cannot be decoded
/// at all (unknown `type`, non-object) are dropped so one bad entry never
/// rejects the whole response.
fn deserialize_lenient_results<'de, D>(deserializer: D) -> Result<Vec<ResultItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect())
}

/// A single search result as supplied by the backend.
///
/// Required text fields default to empty when absent, so a malformed entry
/// still renders (with empty text) instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResultItem {
    /// Installed application
    App {
        #[serde(default)]
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// Image URI/path or a literal glyph such as an emoji
        #[serde(default, skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
    },

    /// Calculator result
    Calc {
        #[serde(default)]
        query: String,
        #[serde(default)]
        value: String,
    },

    /// Regular file
    File {
        #[serde(default)]
        name: String,
        /// Usually the full path
        #[serde(default)]
        description: String,
    },

    /// Directory
    Dir {
        #[serde(default)]
        name: String,
        /// Usually the full path
        #[serde(default)]
        description: String,
    },
}

/// Discriminant of [`ResultItem`], used where only the kind matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultKind {
    App,
    Calc,
    File,
    Dir,
}

impl ResultKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ResultKind::App => "app",
            ResultKind::Calc => "calc",
            ResultKind::File => "file",
            ResultKind::Dir => "dir",
        }
    }
}

impl ResultItem {
    /// Convenience constructor for an application result.
    #[must_use]
    pub fn app(name: impl Into<String>) -> Self {
        ResultItem::App {
            name: name.into(),
            description: None,
            icon: None,
        }
    }

    #[must_use]
    pub fn calc(query: impl Into<String>, value: impl Into<String>) -> Self {
        ResultItem::Calc {
            query: query.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn file(name: impl Into<String>, description: impl Into<String>) -> Self {
        ResultItem::File {
            name: name.into(),
            description: description.into(),
        }
    }

    #[must_use]
    pub fn dir(name: impl Into<String>, description: impl Into<String>) -> Self {
        ResultItem::Dir {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Set the description of an `App` result. No-op for other kinds.
    #[must_use]
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        if let ResultItem::App { description, .. } = &mut self {
            *description = Some(text.into());
        }
        self
    }

    /// Set the icon of an `App` result. No-op for other kinds.
    #[must_use]
    pub fn with_icon(mut self, reference: impl Into<String>) -> Self {
        if let ResultItem::App { icon, .. } = &mut self {
            *icon = Some(reference.into());
        }
        self
    }

    #[must_use]
    pub fn kind(&self) -> ResultKind {
        match self {
            ResultItem::App { .. } => ResultKind::App,
            ResultItem::Calc { .. } => ResultKind::Calc,
            ResultItem::File { .. } => ResultKind::File,
            ResultItem::Dir { .. } => ResultKind::Dir,
        }
    }

    /// Display name. Calculator results have none.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            ResultItem::App { name, .. }
            | ResultItem::File { name, .. }
            | ResultItem::Dir { name, .. } => Some(name),
            ResultItem::Calc { .. } => None,
        }
    }

    /// The supplied icon of an `App` result, if any.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        match self {
            ResultItem::App { icon, .. } => icon.as_deref().filter(|i| !i.is_empty()),
            _ => None,
        }
    }
}

/// How an icon reference should be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    /// Loadable image (path or URI); may fail to load
    Image,
    /// Literal text shown as-is (emoji, symbol)
    Glyph,
}

const IMAGE_SCHEMES: &[&str] = &["file:", "http:", "https:", "data:", "resource:"];

impl IconKind {
    /// Classify an opaque icon reference.
    ///
    /// Anything that looks like a path or carries a known URI scheme is an
    /// image; everything else is treated as a literal glyph.
    #[must_use]
    pub fn classify(icon: &str) -> Self {
        let lower = icon.trim_start().to_ascii_lowercase();
        if icon.contains('/') || IMAGE_SCHEMES.iter().any(|s| lower.starts_with(s)) {
            IconKind::Image
        } else {
            IconKind::Glyph
        }
    }
}

/// Messages sent from the popup to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    /// Request results for the current query text
    Search { query: String },

    /// User committed to a result
    Select { result: ResultItem },

    /// User asked to dismiss the popup
    Close,
}

impl Outbound {
    #[must_use]
    pub fn method(&self) -> &'static str {
        match self {
            Outbound::Search { .. } => "search",
            Outbound::Select { .. } => "select",
            Outbound::Close => "close",
        }
    }
}

/// Messages sent from the backend to the popup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inbound {
    /// Replace the current result set
    Results {
        #[serde(default, deserialize_with = "deserialize_lenient_results")]
        results: Vec<ResultItem>,
    },

    /// Return to the empty initial state and refocus the input
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_app_result_wire_shape() {
        let item = ResultItem::app("Firefox")
            .with_description("Web Browser")
            .with_icon("🌐");
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({"type": "app", "name": "Firefox", "description": "Web Browser", "icon": "🌐"})
        );
    }

    #[test]
    fn test_app_result_omits_absent_optionals() {
        let value = serde_json::to_value(ResultItem::app("Files")).unwrap();
        assert!(value.get("description").is_none());
        assert!(value.get("icon").is_none());
    }

    #[test]
    fn test_calc_result_from_backend_json() {
        let item: ResultItem =
            serde_json::from_value(json!({"type": "calc", "query": "12*4", "value": "48"}))
                .unwrap();
        assert_eq!(item, ResultItem::calc("12*4", "48"));
        assert_eq!(item.kind(), ResultKind::Calc);
        assert!(item.name().is_none());
    }

    #[test]
    fn test_file_without_description_decodes_empty() {
        let item: ResultItem =
            serde_json::from_value(json!({"type": "file", "name": "notes.txt"})).unwrap();
        assert_eq!(item, ResultItem::file("notes.txt", ""));
    }

    #[test]
    fn test_app_without_name_decodes_empty() {
        let item: ResultItem = serde_json::from_value(json!({"type": "app"})).unwrap();
        assert_eq!(item.name(), Some(""));
    }

    #[test]
    fn test_builders_ignore_non_app_kinds() {
        let item = ResultItem::dir("src", "/home/me/src").with_icon("x.png");
        assert_eq!(item, ResultItem::dir("src", "/home/me/src"));
        assert!(item.icon().is_none());
    }

    #[test]
    fn test_empty_icon_is_treated_as_absent() {
        let item = ResultItem::app("Foo").with_icon("");
        assert!(item.icon().is_none());
    }

    #[test]
    fn test_icon_classification() {
        assert_eq!(
            IconKind::classify("/usr/share/icons/firefox.png"),
            IconKind::Image
        );
        assert_eq!(
            IconKind::classify("file:///usr/share/pixmaps/a.svg"),
            IconKind::Image
        );
        assert_eq!(
            IconKind::classify("HTTPS://example.org/i.png"),
            IconKind::Image
        );
        assert_eq!(IconKind::classify("🌐"), IconKind::Glyph);
        assert_eq!(IconKind::classify("firefox"), IconKind::Glyph);
    }

    #[test]
    fn test_outbound_messages_are_type_tagged() {
        assert_eq!(
            serde_json::to_value(Outbound::Search {
                query: "fire".to_string()
            })
            .unwrap(),
            json!({"type": "search", "query": "fire"})
        );
        assert_eq!(
            serde_json::to_value(Outbound::Close).unwrap(),
            json!({"type": "close"})
        );

        let select = Outbound::Select {
            result: ResultItem::calc("1+1", "2"),
        };
        assert_eq!(select.method(), "select");
        assert_eq!(
            serde_json::to_value(select).unwrap(),
            json!({"type": "select", "result": {"type": "calc", "query": "1+1", "value": "2"}})
        );
    }

    #[test]
    fn test_inbound_reset() {
        let msg: Inbound = serde_json::from_value(json!({"type": "reset"})).unwrap();
        assert_eq!(msg, Inbound::Reset);
    }

    #[test]
    fn test_inbound_results_drops_undecodable_entries() {
        let msg: Inbound = serde_json::from_value(json!({
            "type": "results",
            "results": [
                {"type": "app", "name": "Firefox"},
                {"type": "plugin", "name": "???"},
                42,
                {"type": "dir", "name": "src", "description": "/src"}
            ]
        }))
        .unwrap();

        let Inbound::Results { results } = msg else {
            panic!("Expected Results");
        };
        assert_eq!(
            results,
            vec![ResultItem::app("Firefox"), ResultItem::dir("src", "/src")]
        );
    }

    #[test]
    fn test_inbound_results_null_or_missing_is_empty() {
        let msg: Inbound =
            serde_json::from_value(json!({"type": "results", "results": null})).unwrap();
        assert_eq!(msg, Inbound::Results { results: vec![] });

        let msg: Inbound = serde_json::from_value(json!({"type": "results"})).unwrap();
        assert_eq!(msg, Inbound::Results { results: vec![] });
    }
}
