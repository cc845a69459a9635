//! Start and end tag syntax.
//!
//! The renderer writes every element through a [`TagRenderer`] chosen by the flavor's
//! [`ClosingTable`]; it never inspects the style itself.

use crate::error::FormatError;
use crate::predicate::html::{VOID_ELEMENTS, contains_ignore_case};

/// A start tag whose attributes are already rendered, spacing included.
#[derive(Debug, Clone, Copy)]
pub struct StartTag<'a> {
    pub name: &'a str,
    pub attributes: &'a str,
    /// Attributes are on their own lines and `attributes` ends with the element's indentation.
    pub wrapped: bool,
}

pub trait TagRenderer: Send + Sync {
    fn render_open(&self, out: &mut String, tag: &StartTag<'_>);
    fn render_close(&self, out: &mut String, name: &str);
}

/// `<name ...>` ... `</name>`, with or without content.
pub struct ExplicitTags;

/// `<name ... />`, or `/>` on its own line after wrapped attributes.
pub struct SelfClosing;

/// `<name ...>` with no end tag.
pub struct Void;

fn write_start(out: &mut String, tag: &StartTag<'_>) {
    out.push('<');
    out.push_str(tag.name);
    out.push_str(tag.attributes);
}

impl TagRenderer for ExplicitTags {
    fn render_open(&self, out: &mut String, tag: &StartTag<'_>) {
        write_start(out, tag);
        out.push('>');
    }

    fn render_close(&self, out: &mut String, name: &str) {
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }
}

impl TagRenderer for SelfClosing {
    fn render_open(&self, out: &mut String, tag: &StartTag<'_>) {
        write_start(out, tag);
        out.push_str(if tag.wrapped { "/>" } else { " />" });
    }

    fn render_close(&self, _out: &mut String, _name: &str) {}
}

impl TagRenderer for Void {
    fn render_open(&self, out: &mut String, tag: &StartTag<'_>) {
        write_start(out, tag);
        out.push('>');
    }

    fn render_close(&self, _out: &mut String, _name: &str) {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TagStyle {
    #[default]
    Explicit,
    SelfClosing,
    Void,
}

impl TagStyle {
    pub fn renderer(self) -> &'static dyn TagRenderer {
        match self {
            TagStyle::Explicit => &ExplicitTags,
            TagStyle::SelfClosing => &SelfClosing,
            TagStyle::Void => &Void,
        }
    }
}

/// Maps (element name, emptiness) to a [`TagStyle`] for one flavor.
#[derive(Debug)]
pub struct ClosingTable {
    /// Style for empty elements in `void_elements`.
    pub empty_void: TagStyle,
    /// Style for every other empty element.
    pub empty_other: TagStyle,
    pub void_elements: &'static [&'static str],
    /// Whether an element from `void_elements` may have content at all.
    pub void_content_allowed: bool,
}

impl ClosingTable {
    pub const XML: ClosingTable = ClosingTable {
        empty_void: TagStyle::SelfClosing,
        empty_other: TagStyle::SelfClosing,
        void_elements: &[],
        void_content_allowed: true,
    };

    pub const HTML5: ClosingTable = ClosingTable {
        empty_void: TagStyle::Void,
        empty_other: TagStyle::Explicit,
        void_elements: VOID_ELEMENTS,
        void_content_allowed: false,
    };

    pub const XHTML: ClosingTable = ClosingTable {
        empty_void: TagStyle::SelfClosing,
        empty_other: TagStyle::Explicit,
        void_elements: VOID_ELEMENTS,
        void_content_allowed: true,
    };

    pub fn is_void(&self, name: &str) -> bool {
        contains_ignore_case(self.void_elements, name)
    }

    /// False for void elements in flavors where they cannot have content.
    pub fn accepts_content(&self, name: &str) -> bool {
        self.void_content_allowed || !self.is_void(name)
    }

    pub fn select(&self, name: &str, is_empty: bool) -> Result<TagStyle, FormatError> {
        let void = self.is_void(name);
        match (is_empty, void) {
            (true, true) => Ok(self.empty_void),
            (true, false) => Ok(self.empty_other),
            (false, true) if !self.void_content_allowed => {
                Err(FormatError::VoidElementWithContent(name.to_string()))
            }
            (false, _) => Ok(TagStyle::Explicit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(style: TagStyle, attributes: &str, wrapped: bool) -> String {
        let mut out = String::new();
        let renderer = style.renderer();
        renderer.render_open(
            &mut out,
            &StartTag {
                name: "x",
                attributes,
                wrapped,
            },
        );
        renderer.render_close(&mut out, "x");
        out
    }

    #[test]
    fn test_renderers() {
        assert_eq!(render(TagStyle::Explicit, r#" a="1""#, false), r#"<x a="1"></x>"#);
        assert_eq!(render(TagStyle::SelfClosing, r#" a="1""#, false), r#"<x a="1" />"#);
        assert_eq!(render(TagStyle::SelfClosing, "", false), "<x />");
        assert_eq!(render(TagStyle::SelfClosing, "\n  a=\"1\"\n", true), "<x\n  a=\"1\"\n/>");
        assert_eq!(render(TagStyle::Void, r#" a="1""#, false), r#"<x a="1">"#);
    }

    #[test]
    fn test_tables() {
        assert_eq!(ClosingTable::XML.select("br", true).unwrap(), TagStyle::SelfClosing);
        assert_eq!(ClosingTable::XML.select("div", false).unwrap(), TagStyle::Explicit);
        assert_eq!(ClosingTable::HTML5.select("BR", true).unwrap(), TagStyle::Void);
        assert_eq!(ClosingTable::HTML5.select("div", true).unwrap(), TagStyle::Explicit);
        assert_eq!(ClosingTable::XHTML.select("img", true).unwrap(), TagStyle::SelfClosing);
        assert_eq!(ClosingTable::XHTML.select("p", true).unwrap(), TagStyle::Explicit);
        assert_eq!(ClosingTable::XHTML.select("br", false).unwrap(), TagStyle::Explicit);
    }

    #[test]
    fn test_accepts_content() {
        assert!(ClosingTable::XML.accepts_content("br"));
        assert!(ClosingTable::XHTML.accepts_content("br"));
        assert!(!ClosingTable::HTML5.accepts_content("br"));
        assert!(ClosingTable::HTML5.accepts_content("div"));
    }

    #[test]
    fn test_html5_void_element_with_content_is_rejected() {
        assert!(matches!(
            ClosingTable::HTML5.select("img", false),
            Err(FormatError::VoidElementWithContent(name)) if name == "img"
        ));
    }
}
