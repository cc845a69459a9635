use std::fmt;

/// Index of a node in its [`Document`](crate::Document) arena.
///
/// Ids are handed out in creation order; documents produced by the parser are
/// created in document order, so comparing ids compares document positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Qualified name as written in the source (`class`, `xml:space`, `xmlns:svg`).
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The invisible node owning the prolog, the root element and the epilog.
    Document,
    Element {
        name: String,
        /// Unique names, source order.
        attributes: Vec<Attribute>,
    },
    Text {
        content: String,
        cdata: bool,
    },
    Comment(String),
    ProcessingInstruction {
        target: String,
        data: String,
    },
    /// Body of a `<!DOCTYPE ...>` declaration, e.g. `html`.
    Doctype(String),
}

impl NodeKind {
    pub fn is_element(&self) -> bool {
        matches!(self, NodeKind::Element { .. })
    }

    /// Plain character data; CDATA sections are reported separately.
    pub fn is_plain_text(&self) -> bool {
        matches!(self, NodeKind::Text { cdata: false, .. })
    }

    pub fn describe(&self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Element { .. } => "element",
            NodeKind::Text { cdata: false, .. } => "text",
            NodeKind::Text { cdata: true, .. } => "CDATA section",
            NodeKind::Comment(_) => "comment",
            NodeKind::ProcessingInstruction { .. } => "processing instruction",
            NodeKind::Doctype(_) => "document type declaration",
        }
    }
}
