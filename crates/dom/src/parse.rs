//! Builds a [`Document`] from XML text.
//!
//! `roxmltree` checks the input first: well-formedness, namespace bindings and the DTD. The tree
//! is then built from `quick-xml` events, which keep what `roxmltree` resolves away: qualified
//! names as written, CDATA boundaries and the doctype.

use crate::document::Document;
use crate::error::DomError;
use crate::node::NodeId;
use log::{debug, trace};
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use std::str;

pub fn parse_xml(input: &str) -> Result<Document, DomError> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    roxmltree::Document::parse_with_options(input, options)?;

    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(false);

    let mut doc = Document::new();
    let mut open = vec![Document::DOCUMENT];
    loop {
        let parent = open.last().copied().unwrap_or(Document::DOCUMENT);
        match reader.read_event()? {
            Event::Start(tag) => {
                let id = start_element(&mut doc, parent, &tag)?;
                open.push(id);
            }
            Event::Empty(tag) => {
                start_element(&mut doc, parent, &tag)?;
            }
            Event::End(_) => {
                open.pop();
            }
            Event::Text(text) => {
                let raw = normalize_newlines(str::from_utf8(&text)?);
                append_character_data(&mut doc, parent, &unescape(&raw)?)?;
            }
            Event::GeneralRef(reference) => {
                let name = str::from_utf8(&reference)?;
                append_character_data(&mut doc, parent, &unescape(&format!("&{name};"))?)?;
            }
            Event::CData(section) => {
                doc.append_cdata(parent, &normalize_newlines(str::from_utf8(&section)?))?;
            }
            Event::Comment(comment) => {
                doc.append_comment(parent, &normalize_newlines(str::from_utf8(&comment)?))?;
            }
            Event::PI(pi) => {
                let target = str::from_utf8(pi.target())?;
                let data = normalize_newlines(str::from_utf8(pi.content())?);
                doc.append_processing_instruction(parent, target, data.trim_start())?;
            }
            Event::DocType(body) => {
                doc.append_doctype(str::from_utf8(&body)?.trim())?;
            }
            Event::Eof => break,
            // The XML declaration is written from configuration.
            _ => {}
        }
    }

    debug!(
        "Parsed XML document: {} nodes, root <{}>",
        doc.node_count(),
        doc.root_element().and_then(|r| doc.name(r)).unwrap_or_default()
    );
    Ok(doc)
}

fn start_element(doc: &mut Document, parent: NodeId, tag: &BytesStart<'_>) -> Result<NodeId, DomError> {
    let id = doc.create_element(parent, str::from_utf8(tag.name().as_ref())?)?;
    for attribute in tag.attributes() {
        let attribute = attribute?;
        let name = str::from_utf8(attribute.key.as_ref())?;
        // Literal whitespace in a value reads as spaces; `&#10;` and friends survive.
        let raw = normalize_newlines(str::from_utf8(&attribute.value)?).replace(['\t', '\n'], " ");
        doc.set_attribute(id, name, &unescape(&raw)?)?;
    }
    Ok(id)
}

/// Whitespace between top-level nodes is not part of the tree.
fn append_character_data(doc: &mut Document, parent: NodeId, text: &str) -> Result<(), DomError> {
    if text.is_empty() || (parent == Document::DOCUMENT && text.trim().is_empty()) {
        trace!("Skipping {} bytes of whitespace under {:?}", text.len(), parent);
        return Ok(());
    }
    doc.append_text(parent, text)?;
    Ok(())
}

fn normalize_newlines(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n")
}
