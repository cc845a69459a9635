use crate::closing::ClosingTable;
use serde::{Deserialize, Serialize};

/// The serialization dialect. Each flavor owns a [`ClosingTable`] and its escaping rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    #[default]
    Xml,
    Html5,
    Xhtml,
}

impl Flavor {
    pub fn closing_table(self) -> &'static ClosingTable {
        match self {
            Flavor::Xml => &ClosingTable::XML,
            Flavor::Html5 => &ClosingTable::HTML5,
            Flavor::Xhtml => &ClosingTable::XHTML,
        }
    }

    /// Whether tab, newline and carriage return in attribute values are written as
    /// character references so they survive attribute-value normalization.
    pub fn encodes_attribute_whitespace(self) -> bool {
        !matches!(self, Flavor::Html5)
    }

    pub fn minimizes_boolean_attributes(self) -> bool {
        matches!(self, Flavor::Html5)
    }

    /// The doctype written when the document has none.
    pub fn implied_doctype(self) -> Option<&'static str> {
        match self {
            Flavor::Html5 => Some("html"),
            Flavor::Xml | Flavor::Xhtml => None,
        }
    }
}
