//! The document tree consumed by the formatter.
//!
//! Nodes live in an arena owned by [`Document`] and are addressed by [`NodeId`]. Text is stored
//! as child nodes, so an element's "leading text" and each child's "trailing text" are views
//! over its children rather than separate fields.

pub mod document;
pub mod error;
pub mod html;
pub mod node;
pub mod parse;
pub mod xpath;

pub use document::{Descendants, Document};
pub use error::DomError;
pub use html::parse_html;
pub use node::{Attribute, NodeId, NodeKind};
pub use parse::parse_xml;
pub use xpath::DomNode;
