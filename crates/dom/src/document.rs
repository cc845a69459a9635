use crate::error::DomError;
use crate::node::{Attribute, NodeId, NodeKind};

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An arena-backed document.
///
/// The document node is always [`Document::DOCUMENT`]. Its children form the prolog, at most one
/// root element, and the epilog. Adjacent plain text appended to the same parent is merged into
/// one node, so between two non-text children there is at most one text node.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub const DOCUMENT: NodeId = NodeId(0);

    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Number of nodes in the arena, the document node included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All node ids in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.kind(id).is_element()
    }

    pub fn root_element(&self) -> Option<NodeId> {
        self.children(Self::DOCUMENT)
            .iter()
            .copied()
            .find(|&c| self.is_element(c))
    }

    /// Qualified element name.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        match self.kind(id) {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Content of a text or CDATA node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Text { content, .. } => Some(content),
            _ => None,
        }
    }

    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&c| self.is_element(c))
    }

    /// Plain text before the first non-text child of `id`.
    pub fn leading_text(&self, id: NodeId) -> Option<&str> {
        let first = *self.children(id).first()?;
        self.plain_text(first)
    }

    /// Plain text between `id` and its next non-text sibling.
    pub fn trailing_text(&self, id: NodeId) -> Option<&str> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|&s| s == id)?;
        self.plain_text(*siblings.get(index + 1)?)
    }

    fn plain_text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Text {
                content,
                cdata: false,
            } => Some(content),
            _ => None,
        }
    }

    /// Concatenated text of all descendants, CDATA included.
    pub fn string_value(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::Text { content, .. } => content.clone(),
            NodeKind::Comment(text) => text.clone(),
            NodeKind::ProcessingInstruction { data, .. } => data.clone(),
            NodeKind::Doctype(_) => String::new(),
            NodeKind::Document | NodeKind::Element { .. } => self
                .descendants(id)
                .filter_map(|d| self.text(d))
                .collect(),
        }
    }

    /// Pre-order traversal of everything below `id`, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// Number of ancestors between `id` and the document node.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(p) = current {
            if p != Self::DOCUMENT {
                depth += 1;
            }
            current = self.parent(p);
        }
        depth
    }

    // --- Building ---

    fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    fn check_container(&self, parent: NodeId, what: &'static str) -> Result<(), DomError> {
        match self.nodes.get(parent.0).map(|n| &n.kind) {
            Some(NodeKind::Document) | Some(NodeKind::Element { .. }) => Ok(()),
            _ => Err(DomError::InvalidParent(parent, what)),
        }
    }

    pub fn create_element(&mut self, parent: NodeId, name: &str) -> Result<NodeId, DomError> {
        self.check_container(parent, "an element")?;
        validate_name(name)?;
        if parent == Self::DOCUMENT && self.root_element().is_some() {
            return Err(DomError::DuplicateRoot);
        }
        Ok(self.push(
            parent,
            NodeKind::Element {
                name: name.to_string(),
                attributes: Vec::new(),
            },
        ))
    }

    /// Adds an attribute, or replaces the value of an existing one in place.
    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        validate_name(name)?;
        match self.nodes.get_mut(element.0).map(|n| &mut n.kind) {
            Some(NodeKind::Element { attributes, .. }) => {
                match attributes.iter_mut().find(|a| a.name == name) {
                    Some(existing) => existing.value = value.to_string(),
                    None => attributes.push(Attribute {
                        name: name.to_string(),
                        value: value.to_string(),
                    }),
                }
                Ok(())
            }
            _ => Err(DomError::InvalidParent(element, "attributes")),
        }
    }

    /// Appends character data, merging with a preceding plain text sibling.
    /// Returns the id of the text node holding the data.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId, DomError> {
        self.check_container(parent, "text")?;
        if parent == Self::DOCUMENT {
            return Err(DomError::TextOutsideRoot);
        }
        if let Some(&last) = self.nodes[parent.0].children.last()
            && let NodeKind::Text {
                content,
                cdata: false,
            } = &mut self.nodes[last.0].kind
        {
            content.push_str(text);
            return Ok(last);
        }
        Ok(self.push(
            parent,
            NodeKind::Text {
                content: text.to_string(),
                cdata: false,
            },
        ))
    }

    pub fn append_cdata(&mut self, parent: NodeId, text: &str) -> Result<NodeId, DomError> {
        self.check_container(parent, "a CDATA section")?;
        if parent == Self::DOCUMENT {
            return Err(DomError::TextOutsideRoot);
        }
        if text.contains("]]>") {
            return Err(invalid_content("CDATA", "contains ']]>'"));
        }
        Ok(self.push(
            parent,
            NodeKind::Text {
                content: text.to_string(),
                cdata: true,
            },
        ))
    }

    pub fn append_comment(&mut self, parent: NodeId, text: &str) -> Result<NodeId, DomError> {
        self.check_container(parent, "a comment")?;
        if text.contains("--") || text.ends_with('-') {
            return Err(invalid_content("comment", "contains '--' or ends with '-'"));
        }
        Ok(self.push(parent, NodeKind::Comment(text.to_string())))
    }

    pub fn append_processing_instruction(
        &mut self,
        parent: NodeId,
        target: &str,
        data: &str,
    ) -> Result<NodeId, DomError> {
        self.check_container(parent, "a processing instruction")?;
        validate_name(target)?;
        if target.eq_ignore_ascii_case("xml") {
            return Err(invalid_content(
                "processing instruction",
                "the target 'xml' is reserved",
            ));
        }
        if data.contains("?>") {
            return Err(invalid_content("processing instruction", "data contains '?>'"));
        }
        Ok(self.push(
            parent,
            NodeKind::ProcessingInstruction {
                target: target.to_string(),
                data: data.to_string(),
            },
        ))
    }

    /// Adds `<!DOCTYPE body>` to the prolog. Allowed once, before the root element.
    pub fn append_doctype(&mut self, body: &str) -> Result<NodeId, DomError> {
        let misplaced = self.root_element().is_some()
            || self
                .children(Self::DOCUMENT)
                .iter()
                .any(|&c| matches!(self.kind(c), NodeKind::Doctype(_)));
        if misplaced {
            return Err(DomError::MisplacedDoctype);
        }
        let body = body.trim();
        if body.is_empty() || (body.contains('>') && !body.contains('[')) {
            return Err(invalid_content("doctype", "expected a name such as 'html'"));
        }
        Ok(self.push(Self::DOCUMENT, NodeKind::Doctype(body.to_string())))
    }

    pub fn doctype(&self) -> Option<&str> {
        self.children(Self::DOCUMENT)
            .iter()
            .find_map(|&c| match self.kind(c) {
                NodeKind::Doctype(body) => Some(body.as_str()),
                _ => None,
            })
    }
}

pub struct Descendants<'d> {
    doc: &'d Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(current).iter().rev().copied());
        Some(current)
    }
}

fn invalid_content(kind: &'static str, reason: &str) -> DomError {
    DomError::InvalidContent {
        kind,
        reason: reason.to_string(),
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == ':'
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_numeric() || matches!(c, '-' | '.' | '\u{B7}')
}

/// Accepts XML names, qualified or not.
pub fn validate_name(name: &str) -> Result<(), DomError> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(is_name_start) && chars.all(is_name_char);
    if valid {
        Ok(())
    } else {
        Err(DomError::InvalidName(name.to_string()))
    }
}
