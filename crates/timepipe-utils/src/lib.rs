//! Utility functions and helpers

/// Escape text for an HTML element body or a quoted attribute
///
/// Transaction fields come from a remote server and are placed into
/// `format!`-built markup, so every one of them goes through here.
pub fn escape_html(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
