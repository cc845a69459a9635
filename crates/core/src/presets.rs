//! Ready-made formatter configurations.
//!
//! Each preset returns a [`FormatterBuilder`], so any setting can still be overridden before
//! `build` is called.

use crate::config::FormatterBuilder;
use crate::flavor::Flavor;
use crate::predicate::{html_block_elements, html_inline_elements, html_whitespace_significant_elements};

/// XML output: every element is a block unless content says otherwise.
pub fn xml() -> FormatterBuilder {
    FormatterBuilder::new()
}

/// HTML5 output.
///
/// Block and inline layout follow the HTML element sets. `pre`, `script`, `style`, `textarea` and
/// `code` keep their whitespace, other block elements have theirs normalized. The flavor adds
/// `<!DOCTYPE html>` when the document has none and minimizes boolean attributes.
pub fn html5() -> FormatterBuilder {
    html_rules(FormatterBuilder::new().with_flavor(Flavor::Html5))
}

/// Like [`html5`], but void elements self-close and the output stays well-formed XML.
pub fn xhtml() -> FormatterBuilder {
    html_rules(FormatterBuilder::new().with_flavor(Flavor::Xhtml))
}

fn html_rules(builder: FormatterBuilder) -> FormatterBuilder {
    let significant = html_whitespace_significant_elements();
    builder
        .with_block_rule(html_block_elements())
        .with_inline_rule(html_inline_elements())
        .with_preserve_whitespace_rule(significant.clone())
        .with_normalize_whitespace_rule(html_block_elements().and(significant.negate()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use markfmt_dom::parse_xml;

    #[test]
    fn test_html5_preset() {
        let doc = parse_xml("<html><body><p>Hello   <b>big</b><br/>  world</p><pre>  a\n  b</pre></body></html>")
            .unwrap();
        let out = html5().build().unwrap().format_document(&doc).unwrap();
        assert_eq!(
            out,
            "<!DOCTYPE html>\n<html>\n  <body>\n    <p>Hello <b>big</b><br> world</p>\n    <pre>  a\n  b</pre>\n  </body>\n</html>"
        );
    }

    #[test]
    fn test_xhtml_preset_self_closes_void_elements() {
        let doc = parse_xml(r#"<html><body><img src="a.png"/><hr/><p></p></body></html>"#).unwrap();
        let out = xhtml().build().unwrap().format_document(&doc).unwrap();
        assert_eq!(out, "<html>\n  <body>\n    <img src=\"a.png\" />\n    <hr />\n    <p></p>\n  </body>\n</html>");
    }
}
