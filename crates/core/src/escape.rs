use crate::flavor::Flavor;
use std::borrow::Cow;

/// Escapes `&`, `<` and `>` in character data.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escapes a value for a double-quoted attribute.
pub fn escape_attribute(value: &str, flavor: Flavor) -> Cow<'_, str> {
    let encode_whitespace = flavor.encodes_attribute_whitespace();
    let needs_escape = value.chars().any(|c| {
        matches!(c, '&' | '<' | '>' | '"') || (encode_whitespace && matches!(c, '\n' | '\r' | '\t'))
    });
    if !needs_escape {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' if encode_whitespace => out.push_str("&#10;"),
            '\r' if encode_whitespace => out.push_str("&#13;"),
            '\t' if encode_whitespace => out.push_str("&#9;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
