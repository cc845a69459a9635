//! Writes an annotated document.
//!
//! Rendering reads the [`AnnotationStore`] and never re-runs a rule. The tree is walked with an
//! explicit stack so deep documents cannot overflow the call stack. Output is collected into a
//! single `String` that is handed back only when every node has been written.

use crate::annotation::{Annotation, AnnotationStore};
use crate::closing::StartTag;
use crate::config::FormatterConfig;
use crate::error::FormatError;
use crate::escape::{escape_attribute, escape_text};
use crate::predicate::html::{BOOLEAN_ATTRIBUTES, contains_ignore_case};
use crate::whitespace::{Gap, Neighbour, newline_indent, shape_gap};
use log::debug;
use markfmt_dom::{Attribute, Document, NodeId, NodeKind};
use std::borrow::Cow;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

enum Visit {
    Enter(NodeId),
    Exit(NodeId),
    Text(String),
}

struct Renderer<'a> {
    doc: &'a Document,
    config: &'a FormatterConfig,
    store: &'a AnnotationStore,
    out: String,
}

pub(crate) fn render_document(
    doc: &Document,
    config: &FormatterConfig,
    store: &AnnotationStore,
) -> Result<String, FormatError> {
    let root = doc.root_element().ok_or(FormatError::MissingRoot)?;
    let mut renderer = Renderer {
        doc,
        config,
        store,
        out: String::with_capacity(doc.node_count() * 16),
    };

    if config.xml_declaration {
        renderer.out.push_str(XML_DECLARATION);
        renderer.out.push('\n');
    }
    let doctype = config
        .doctype
        .as_deref()
        .or(doc.doctype())
        .or(config.flavor.implied_doctype());
    if let Some(body) = doctype {
        renderer.out.push_str("<!DOCTYPE ");
        renderer.out.push_str(body);
        renderer.out.push_str(">\n");
    }

    let top_level = doc.children(Document::DOCUMENT);
    let split = top_level
        .iter()
        .position(|&id| id == root)
        .ok_or_else(|| FormatError::Invariant(format!("root {} is not a document child", root)))?;
    for &id in &top_level[..split] {
        if renderer.write_misc(id) {
            renderer.out.push('\n');
        }
    }
    renderer.render_tree(root)?;
    for &id in &top_level[split + 1..] {
        if matches!(
            doc.kind(id),
            NodeKind::Comment(_) | NodeKind::ProcessingInstruction { .. }
        ) {
            renderer.out.push('\n');
            renderer.write_misc(id);
        }
    }

    debug!("Rendered {} bytes", renderer.out.len());
    Ok(renderer.out)
}

impl Renderer<'_> {
    fn render_tree(&mut self, root: NodeId) -> Result<(), FormatError> {
        let mut stack = vec![Visit::Enter(root)];
        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(id) => self.enter(id, &mut stack)?,
                Visit::Exit(id) => {
                    let annotation = self.store.require(id)?;
                    let name = self.doc.name(id).unwrap_or_default();
                    annotation.tag_style.renderer().render_close(&mut self.out, name);
                }
                Visit::Text(text) => self.out.push_str(&text),
            }
        }
        Ok(())
    }

    fn enter(&mut self, id: NodeId, stack: &mut Vec<Visit>) -> Result<(), FormatError> {
        let doc = self.doc;
        match doc.kind(id) {
            NodeKind::Element { name, attributes } => {
                let annotation = self.store.require(id)?;
                let rendered = self.render_attributes(name, attributes, annotation)?;
                let tag = StartTag {
                    name,
                    attributes: &rendered,
                    wrapped: annotation.wrap_attributes,
                };
                annotation.tag_style.renderer().render_open(&mut self.out, &tag);
                stack.push(Visit::Exit(id));
                if !annotation.is_empty {
                    self.push_content(id, name, annotation, stack)?;
                }
            }
            NodeKind::Text {
                content,
                cdata: true,
            } => {
                self.out.push_str("<![CDATA[");
                self.out.push_str(content);
                self.out.push_str("]]>");
            }
            NodeKind::Text { content, .. } => self.out.push_str(&escape_text(content)),
            NodeKind::Comment(_) | NodeKind::ProcessingInstruction { .. } => {
                self.write_misc(id);
            }
            other => {
                return Err(FormatError::Invariant(format!(
                    "{} {} inside the root element",
                    other.describe(),
                    id
                )));
            }
        }
        Ok(())
    }

    /// Writes the leading text now and schedules items and the gaps after them.
    fn push_content(
        &mut self,
        id: NodeId,
        name: &str,
        annotation: &Annotation,
        stack: &mut Vec<Visit>,
    ) -> Result<(), FormatError> {
        let doc = self.doc;
        let mut items = Vec::new();
        let mut gaps = vec![String::new()];
        for &child in doc.children(id) {
            match doc.kind(child) {
                NodeKind::Text {
                    content,
                    cdata: false,
                } => {
                    if let Some(gap) = gaps.last_mut() {
                        gap.push_str(content);
                    }
                }
                _ => {
                    items.push(child);
                    gaps.push(String::new());
                }
            }
        }

        let neighbours = items
            .iter()
            .map(|&item| {
                self.store.require(item).map(|a| Neighbour {
                    layout: a.layout,
                    depth: a.depth,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let indent = self.config.indent.as_str();
        let mut shaped = Vec::with_capacity(gaps.len());
        for (index, text) in gaps.iter().enumerate() {
            let formatter = match index {
                0 => annotation.text_formatter,
                _ => None,
            };
            let output = match formatter {
                Some(i) => self.config.text_formatters[i]
                    .1
                    .format_text(text, indent, annotation.depth)
                    .map_err(|source| FormatError::TextFormatter {
                        element: name.to_string(),
                        source,
                    })?,
                None => {
                    let gap = Gap {
                        mode: annotation.whitespace,
                        before: index.checked_sub(1).map(|i| neighbours[i]),
                        after: neighbours.get(index).copied(),
                        parent_depth: annotation.depth,
                    };
                    shape_gap(text, &gap, indent)
                }
            };
            shaped.push(escape_text(&output).into_owned());
        }

        let mut shaped = shaped.into_iter();
        if let Some(leading) = shaped.next() {
            self.out.push_str(&leading);
        }
        let trailing: Vec<String> = shaped.collect();
        for (&item, text) in items.iter().zip(trailing).rev() {
            stack.push(Visit::Text(text));
            stack.push(Visit::Enter(item));
        }
        Ok(())
    }

    /// Renders the attribute list of a start tag, leading separator included.
    fn render_attributes(
        &self,
        element: &str,
        attributes: &[Attribute],
        annotation: &Annotation,
    ) -> Result<String, FormatError> {
        let config = self.config;
        let mut out = String::new();
        let level = annotation.depth + usize::from(annotation.wrap_attributes);
        for (index, attribute) in attributes.iter().enumerate() {
            if annotation.wrap_attributes {
                newline_indent(&mut out, &config.indent, level);
            } else {
                out.push(' ');
            }
            out.push_str(&attribute.name);
            if config.flavor.minimizes_boolean_attributes()
                && contains_ignore_case(BOOLEAN_ATTRIBUTES, &attribute.name)
            {
                continue;
            }

            let formatter = annotation.attribute_formatters.get(index).copied().flatten();
            let value = match formatter {
                Some(i) => Cow::Owned(
                    config.attribute_formatters[i]
                        .1
                        .format_value(&attribute.value, &config.indent, level)
                        .map_err(|source| FormatError::AttributeFormatter {
                            element: element.to_string(),
                            attribute: attribute.name.clone(),
                            source,
                        })?,
                ),
                None => Cow::Borrowed(attribute.value.as_str()),
            };
            out.push_str("=\"");
            out.push_str(&escape_attribute(&value, config.flavor));
            out.push('"');
        }
        if annotation.wrap_attributes {
            newline_indent(&mut out, &config.indent, annotation.depth);
        }
        Ok(out)
    }

    /// Writes a comment or processing instruction. Returns false for any other node.
    fn write_misc(&mut self, id: NodeId) -> bool {
        match self.doc.kind(id) {
            NodeKind::Comment(text) => {
                self.out.push_str("<!--");
                self.out.push_str(text);
                self.out.push_str("-->");
            }
            NodeKind::ProcessingInstruction { target, data } => {
                self.out.push_str("<?");
                self.out.push_str(target);
                if !data.is_empty() {
                    self.out.push(' ');
                    self.out.push_str(data);
                }
                self.out.push_str("?>");
            }
            _ => return false,
        }
        true
    }
}
