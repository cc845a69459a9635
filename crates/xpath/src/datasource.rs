//! The read-only node abstraction the evaluator navigates.
use std::hash::Hash;

/// A qualified name, consisting of an optional prefix and a local part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QName<'a> {
    pub prefix: Option<&'a str>,
    pub local_part: &'a str,
}

impl<'a> QName<'a> {
    /// Splits `prefix:local` at the first colon.
    pub fn parse(qualified: &'a str) -> Self {
        match qualified.split_once(':') {
            Some((prefix, local_part)) => QName {
                prefix: Some(prefix),
                local_part,
            },
            None => QName {
                prefix: None,
                local_part: qualified,
            },
        }
    }

    /// Matches a name test written in an expression (`p`, `svg:rect`).
    /// Unprefixed tests only match unprefixed names.
    pub fn matches_test(&self, test: &str) -> bool {
        let wanted = QName::parse(test);
        self.prefix == wanted.prefix && self.local_part == wanted.local_part
    }
}

/// The XPath 1.0 node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Root,
    Element,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction,
}

/// A node in a navigable tree. The evaluator is written exclusively against this trait.
///
/// `Ord` must follow document order; node-sets are sorted with it.
/// `'a` is the lifetime of the underlying tree.
pub trait XPathNode<'a>:
    std::fmt::Debug + Clone + Copy + PartialEq + Eq + Hash + PartialOrd + Ord
{
    fn node_type(&self) -> NodeType;

    /// Element and attribute names, and processing-instruction targets.
    fn name(&self) -> Option<QName<'a>>;

    /// The XPath `string()` value of the node.
    fn string_value(&self) -> String;

    fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a>;

    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a>;

    fn parent(&self) -> Option<Self>;
}
