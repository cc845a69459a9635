//! Per-node rendering decisions for one format call.

use crate::closing::TagStyle;
use crate::error::FormatError;
use markfmt_dom::NodeId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// On its own line, indented by depth.
    #[default]
    Block,
    /// Flows with the surrounding text.
    Inline,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WhitespaceMode {
    /// Whitespace that only separates block items is replaced by indentation.
    #[default]
    Default,
    Normalize,
    Preserve,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    pub layout: Layout,
    pub whitespace: WhitespaceMode,
    pub wrap_attributes: bool,
    /// Index into the configured text formatters.
    pub text_formatter: Option<usize>,
    /// Per attribute, in source order: index into the configured attribute formatters.
    pub attribute_formatters: Vec<Option<usize>>,
    pub tag_style: TagStyle,
    pub depth: usize,
    pub is_empty: bool,
}

/// Annotations indexed by node id. Each node is annotated at most once.
#[derive(Debug)]
pub struct AnnotationStore {
    entries: Vec<Option<Annotation>>,
}

impl AnnotationStore {
    pub fn new(node_count: usize) -> Self {
        Self {
            entries: vec![None; node_count],
        }
    }

    pub fn insert(&mut self, id: NodeId, annotation: Annotation) -> Result<(), FormatError> {
        match self.entries.get_mut(id.index()) {
            Some(slot) if slot.is_none() => {
                *slot = Some(annotation);
                Ok(())
            }
            Some(_) => Err(FormatError::Invariant(format!("node {} annotated twice", id))),
            None => Err(FormatError::Invariant(format!("node {} is outside the document", id))),
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Annotation> {
        self.entries.get(id.index()).and_then(Option::as_ref)
    }

    pub fn require(&self, id: NodeId) -> Result<&Annotation, FormatError> {
        self.get(id)
            .ok_or_else(|| FormatError::Invariant(format!("node {} was not annotated", id)))
    }

    /// Number of annotated nodes.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
