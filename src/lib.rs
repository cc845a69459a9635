//! # markfmt
//!
//! Rule-driven structural formatting for XML and HTML.
//!
//! A [`Formatter`] is configured once with predicates that decide, per element, whether it is a
//! block or inline, how its whitespace is treated, and whether its attributes wrap. It can then
//! format any number of documents, concurrently if needed.
//!
//! [`format_str`] picks the reader from the formatter's flavor: HTML5 input goes through the
//! browser-grade `html5ever` tree builder, XML and XHTML through the XML reader.
//!
//! ```ignore
//! use markfmt::{format_xml_str, predicate::tag_in, presets};
//!
//! let formatter = presets::xml()
//!     .with_inline_rule(tag_in(["b", "i"])?)
//!     .build()?;
//! let output = format_xml_str("<doc><p>Hello <b>world</b></p></doc>", &formatter)?;
//! ```

mod error;

pub use error::MarkfmtError;
pub use markfmt_core::{
    Annotation, AnnotationStore, AttributeFormatter, AttributeRule, BoxError, ClosingTable,
    ConfigError, Flavor, FormatError, FormatOptions, Formatter, FormatterBuilder, FormatterConfig,
    Layout, Matcher, Predicate, RuleOptions, TagStyle, TextFormatter, WhitespaceMode,
    XML_DECLARATION,
};
pub use markfmt_core::{closing, css, escape, options, predicate, presets, whitespace};
pub use markfmt_dom::{Attribute, Document, DomError, NodeId, NodeKind, parse_html, parse_xml};
pub use markfmt_xpath as xpath;

use log::info;
use std::time::Instant;

/// Parses `input` as XML and formats it.
pub fn format_xml_str(input: &str, formatter: &Formatter) -> Result<String, MarkfmtError> {
    read_and_format(input, formatter, parse_xml)
}

/// Parses `input` as HTML5 and formats it. Missing `html`, `head` and `body` elements are
/// supplied and unclosed tags are closed, as a browser would.
pub fn format_html_str(input: &str, formatter: &Formatter) -> Result<String, MarkfmtError> {
    read_and_format(input, formatter, parse_html)
}

/// Formats `input` with the reader that matches the formatter's flavor.
pub fn format_str(input: &str, formatter: &Formatter) -> Result<String, MarkfmtError> {
    match formatter.config().flavor() {
        Flavor::Html5 => format_html_str(input, formatter),
        Flavor::Xml | Flavor::Xhtml => format_xml_str(input, formatter),
    }
}

fn read_and_format(
    input: &str,
    formatter: &Formatter,
    read: fn(&str) -> Result<Document, DomError>,
) -> Result<String, MarkfmtError> {
    let start = Instant::now();
    let doc = read(input)?;
    let output = formatter.format_document(&doc)?;
    info!(
        "Formatted {} nodes ({} -> {} bytes) as {:?} in {:.2?}",
        doc.node_count(),
        input.len(),
        output.len(),
        formatter.config().flavor(),
        start.elapsed()
    );
    Ok(output)
}

/// Builds a formatter from declarative options and formats `input` with it.
pub fn format_with_options(input: &str, options: &FormatOptions) -> Result<String, MarkfmtError> {
    let formatter = options.clone().into_builder()?.build()?;
    format_str(input, &formatter)
}
