use crate::node::NodeId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomError {
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Invalid name '{0}'")]
    InvalidName(String),

    #[error("Node {0} cannot contain {1}")]
    InvalidParent(NodeId, &'static str),

    #[error("Document already has a root element")]
    DuplicateRoot,

    #[error("Non-whitespace text is not allowed outside the root element")]
    TextOutsideRoot,

    #[error("A document type declaration must come before the root element and appear once")]
    MisplacedDoctype,

    #[error("Invalid {kind} content: {reason}")]
    InvalidContent { kind: &'static str, reason: String },

    #[error("XML read error: {0}")]
    Reader(#[from] quick_xml::Error),

    #[error("Malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Cannot decode character data: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    #[error("Input is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
}
