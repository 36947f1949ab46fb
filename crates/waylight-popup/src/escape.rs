//! Markup escaping for backend-supplied text.

use std::borrow::Cow;

/// Escape text for use in element content or a quoted attribute value.
///
/// Borrows the input when nothing needs escaping.
#[must_use]
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(escape_html("Firefox 🌐"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_script_tag_is_neutralized() {
        assert_eq!(
            escape_html("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_attribute_breakout_is_neutralized() {
        assert_eq!(
            escape_html(r#"a.png" onerror="alert(1)"#),
            "a.png&quot; onerror=&quot;alert(1)"
        );
    }

    #[test]
    fn test_ampersand_escaped_once() {
        assert_eq!(escape_html("Tom & Jerry &amp;"), "Tom &amp; Jerry &amp;amp;");
    }
}
