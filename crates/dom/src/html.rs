//! Builds a [`Document`] from HTML5 text with `html5ever`.
//!
//! The HTML tree builder never fails: it supplies implied `html`, `head` and `body` elements,
//! closes void elements and repairs misnested tags the way browsers do. The repaired tree is
//! copied into the arena as-is.

use crate::document::Document;
use crate::error::DomError;
use crate::node::NodeId;
use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, QualName, parse_document};
use log::{debug, trace};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

pub fn parse_html(input: &str) -> Result<Document, DomError> {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(input);

    let mut doc = Document::new();
    let mut pending: Vec<(Handle, NodeId)> = children_of(&dom.document)
        .into_iter()
        .rev()
        .map(|child| (child, Document::DOCUMENT))
        .collect();
    while let Some((handle, parent)) = pending.pop() {
        if let Some(id) = import(&mut doc, parent, &handle)? {
            pending.extend(children_of(&handle).into_iter().rev().map(|child| (child, id)));
        }
    }

    debug!(
        "Parsed HTML document: {} nodes, doctype {:?}",
        doc.node_count(),
        doc.doctype()
    );
    Ok(doc)
}

/// A `<template>` keeps its children in a separate fragment.
fn children_of(handle: &Handle) -> Vec<Handle> {
    if let NodeData::Element { template_contents, .. } = &handle.data
        && let Some(contents) = template_contents.borrow().as_ref()
    {
        return contents.children.borrow().clone();
    }
    handle.children.borrow().clone()
}

/// Appends one node. Returns the new element, which receives the node's children.
fn import(doc: &mut Document, parent: NodeId, handle: &Handle) -> Result<Option<NodeId>, DomError> {
    match &handle.data {
        NodeData::Element { name, attrs, .. } => {
            let id = doc.create_element(parent, &qualified(name))?;
            for attribute in attrs.borrow().iter() {
                doc.set_attribute(id, &qualified(&attribute.name), &attribute.value)?;
            }
            return Ok(Some(id));
        }
        NodeData::Text { contents } => {
            let text = contents.borrow();
            if parent == Document::DOCUMENT && text.trim().is_empty() {
                trace!("Skipping top-level whitespace");
            } else {
                doc.append_text(parent, &text)?;
            }
        }
        NodeData::Comment { contents } => {
            doc.append_comment(parent, contents)?;
        }
        NodeData::ProcessingInstruction { target, contents } => {
            doc.append_processing_instruction(parent, target, contents)?;
        }
        NodeData::Doctype {
            name,
            public_id,
            system_id,
        } => {
            if name.is_empty() {
                trace!("Skipping a doctype without a name");
            } else {
                doc.append_doctype(&doctype_body(name, public_id, system_id))?;
            }
        }
        NodeData::Document => {}
    }
    Ok(None)
}

/// Foreign content keeps prefixes such as `xlink:href`.
fn qualified(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{}:{}", prefix, name.local),
        None => name.local.to_string(),
    }
}

fn doctype_body(name: &str, public_id: &str, system_id: &str) -> String {
    let mut body = name.to_string();
    if !public_id.is_empty() {
        body.push_str(&format!(" PUBLIC \"{public_id}\""));
        if !system_id.is_empty() {
            body.push_str(&format!(" \"{system_id}\""));
        }
    } else if !system_id.is_empty() {
        body.push_str(&format!(" SYSTEM \"{system_id}\""));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    fn names(doc: &Document, id: NodeId) -> Vec<&str> {
        doc.element_children(id).filter_map(|c| doc.name(c)).collect()
    }

    fn find(doc: &Document, name: &str) -> NodeId {
        doc.descendants(Document::DOCUMENT)
            .find(|&n| doc.name(n) == Some(name))
            .unwrap()
    }

    #[test]
    fn test_implied_structure() {
        let doc = parse_html("<p>hi").unwrap();
        let html = doc.root_element().unwrap();
        assert_eq!(doc.name(html), Some("html"));
        assert_eq!(names(&doc, html), vec!["head", "body"]);
        let p = find(&doc, "p");
        assert_eq!(doc.string_value(p), "hi");
    }

    #[test]
    fn test_void_elements_take_no_children() {
        let doc = parse_html("<p>a<br>b</p>").unwrap();
        let p = find(&doc, "p");
        let kinds: Vec<_> = doc.children(p).iter().map(|&c| doc.kind(c).describe()).collect();
        assert_eq!(kinds, vec!["text", "element", "text"]);
        assert!(doc.children(find(&doc, "br")).is_empty());
    }

    #[test]
    fn test_doctype_and_attributes() {
        let doc = parse_html("<!DOCTYPE html><div id=a CLASS='b c'></div>").unwrap();
        assert_eq!(doc.doctype(), Some("html"));
        let div = find(&doc, "div");
        let attrs: Vec<_> = doc
            .attributes(div)
            .iter()
            .map(|a| (a.name.as_str(), a.value.as_str()))
            .collect();
        assert_eq!(attrs, vec![("id", "a"), ("class", "b c")]);
    }

    #[test]
    fn test_legacy_doctype_identifiers() {
        let doc = parse_html(
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\"><p>x</p>",
        )
        .unwrap();
        assert_eq!(
            doc.doctype(),
            Some("html PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\"")
        );
    }

    #[test]
    fn test_template_contents_become_children() {
        let doc = parse_html("<template><b>x</b></template>").unwrap();
        let template = find(&doc, "template");
        assert_eq!(names(&doc, template), vec!["b"]);
    }

    #[test]
    fn test_comments_are_kept() {
        let doc = parse_html("<body><!-- note --><p>x</p></body>").unwrap();
        let body = find(&doc, "body");
        let first = doc.children(body)[0];
        assert_eq!(doc.kind(first), &NodeKind::Comment(" note ".into()));
    }
}
