//! HTML element and attribute sets. Names compare ASCII case-insensitively.

use super::Predicate;
use super::element::TagIn;

pub const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "dialog", "dd", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hgroup", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tbody",
    "tfoot", "thead", "tr", "ul",
];

pub const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "br", "cite", "code", "data", "dfn", "em", "i", "kbd", "mark",
    "q", "ruby", "s", "samp", "small", "span", "strong", "sub", "sup", "time", "u", "var", "wbr",
];

pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub const WHITESPACE_SIGNIFICANT_ELEMENTS: &[&str] = &["pre", "style", "script", "textarea", "code"];

pub const METADATA_ELEMENTS: &[&str] = &[
    "head", "title", "base", "link", "meta", "style", "script", "noscript",
];

/// Attributes written as a bare name in HTML5.
pub const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "async", "autofocus", "autoplay", "checked", "controls", "default", "defer", "disabled",
    "formnovalidate", "hidden", "ismap", "itemscope", "loop", "multiple", "muted", "nomodule",
    "novalidate", "open", "readonly", "required", "reversed", "selected",
];

pub fn contains_ignore_case(set: &[&str], name: &str) -> bool {
    set.iter().any(|s| s.eq_ignore_ascii_case(name))
}

fn html_set(set: &[&str]) -> Predicate {
    Predicate::new(TagIn {
        names: set.iter().map(|s| s.to_string()).collect(),
        ignore_case: true,
    })
}

pub fn html_block_elements() -> Predicate {
    html_set(BLOCK_ELEMENTS)
}

pub fn html_inline_elements() -> Predicate {
    html_set(INLINE_ELEMENTS)
}

pub fn html_void_elements() -> Predicate {
    html_set(VOID_ELEMENTS)
}

/// Elements whose whitespace is content: `pre`, `style`, `script`, `textarea`, `code`.
pub fn html_whitespace_significant_elements() -> Predicate {
    html_set(WHITESPACE_SIGNIFICANT_ELEMENTS)
}

pub fn html_metadata_elements() -> Predicate {
    html_set(METADATA_ELEMENTS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::tests::matching;
    use markfmt_dom::parse_xml;

    #[test]
    fn test_html_sets_ignore_case() {
        let doc = parse_xml("<HTML><Div><BR/><span/></Div><PRE/></HTML>").unwrap();
        assert_eq!(matching(&doc, &html_block_elements()), vec!["Div", "PRE"]);
        assert_eq!(matching(&doc, &html_inline_elements()), vec!["BR", "span"]);
        assert_eq!(matching(&doc, &html_void_elements()), vec!["BR"]);
        assert_eq!(matching(&doc, &html_whitespace_significant_elements()), vec!["PRE"]);
        assert!(matching(&doc, &html_metadata_elements()).is_empty());
    }

    #[test]
    fn test_boolean_attribute_lookup() {
        assert!(contains_ignore_case(BOOLEAN_ATTRIBUTES, "Checked"));
        assert!(!contains_ignore_case(BOOLEAN_ATTRIBUTES, "value"));
    }
}
