//! Exposes a [`Document`] to the XPath evaluator.

use crate::document::Document;
use crate::node::{NodeId, NodeKind};
use markfmt_xpath::{NodeType, QName, XPathNode};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// A tree node, or one attribute of an element, as seen by XPath.
#[derive(Debug, Clone, Copy)]
pub struct DomNode<'a> {
    doc: &'a Document,
    id: NodeId,
    attribute: Option<usize>,
}

impl<'a> DomNode<'a> {
    pub fn new(doc: &'a Document, id: NodeId) -> Self {
        Self {
            doc,
            id,
            attribute: None,
        }
    }

    pub fn root(doc: &'a Document) -> Self {
        Self::new(doc, Document::DOCUMENT)
    }

    /// The tree node, or the owning element for an attribute.
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn is_attribute(&self) -> bool {
        self.attribute.is_some()
    }
}

impl PartialEq for DomNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.attribute == other.attribute
    }
}

impl Eq for DomNode<'_> {}

impl Hash for DomNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.attribute.hash(state);
    }
}

impl PartialOrd for DomNode<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// An element sorts before its own attributes and they precede its children,
// whose ids are all greater.
impl Ord for DomNode<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id
            .cmp(&other.id)
            .then_with(|| self.attribute.cmp(&other.attribute))
    }
}

impl<'a> XPathNode<'a> for DomNode<'a> {
    fn node_type(&self) -> NodeType {
        if self.attribute.is_some() {
            return NodeType::Attribute;
        }
        match self.doc.kind(self.id) {
            NodeKind::Document => NodeType::Root,
            NodeKind::Element { .. } => NodeType::Element,
            NodeKind::Text { .. } => NodeType::Text,
            NodeKind::ProcessingInstruction { .. } => NodeType::ProcessingInstruction,
            // Doctypes are filtered out of `children`, so only comments land here.
            NodeKind::Comment(_) | NodeKind::Doctype(_) => NodeType::Comment,
        }
    }

    fn name(&self) -> Option<QName<'a>> {
        let doc = self.doc;
        if let Some(index) = self.attribute {
            return doc
                .attributes(self.id)
                .get(index)
                .map(|a| QName::parse(&a.name));
        }
        match doc.kind(self.id) {
            NodeKind::Element { name, .. } => Some(QName::parse(name)),
            NodeKind::ProcessingInstruction { target, .. } => Some(QName {
                prefix: None,
                local_part: target,
            }),
            _ => None,
        }
    }

    fn string_value(&self) -> String {
        match self.attribute {
            Some(index) => self
                .doc
                .attributes(self.id)
                .get(index)
                .map(|a| a.value.clone())
                .unwrap_or_default(),
            None => self.doc.string_value(self.id),
        }
    }

    fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        if self.attribute.is_some() {
            return Box::new(std::iter::empty());
        }
        let (doc, id) = (self.doc, self.id);
        Box::new((0..doc.attributes(id).len()).map(move |i| DomNode {
            doc,
            id,
            attribute: Some(i),
        }))
    }

    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        if self.attribute.is_some() {
            return Box::new(std::iter::empty());
        }
        let doc = self.doc;
        Box::new(
            doc.children(self.id)
                .iter()
                .filter(move |&&c| !matches!(doc.kind(c), NodeKind::Doctype(_)))
                .map(move |&c| DomNode::new(doc, c)),
        )
    }

    fn parent(&self) -> Option<Self> {
        match self.attribute {
            Some(_) => Some(DomNode::new(self.doc, self.id)),
            None => self.doc.parent(self.id).map(|p| DomNode::new(self.doc, p)),
        }
    }
}
