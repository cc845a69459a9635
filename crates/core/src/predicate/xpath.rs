use super::{NodeSet, Predicate, PreparedRule, Rule};
use crate::error::{ConfigError, FormatError};
use log::trace;
use markfmt_dom::{Document, DomNode};
use markfmt_xpath::{Expr, XPathValue, parse_expression, select};
use std::sync::Arc;

#[derive(Debug)]
struct XPathRule {
    source: String,
    expression: Expr,
}

impl Rule for XPathRule {
    fn prepare(&self, doc: &Document) -> Result<PreparedRule, FormatError> {
        let root = DomNode::root(doc);
        let nodes = match select(&self.expression, root, root)? {
            XPathValue::NodeSet(nodes) => nodes,
            _ => return Err(self.non_element("a non-node-set value")),
        };
        let mut set = NodeSet::empty(doc);
        for node in &nodes {
            if node.is_attribute() {
                return Err(self.non_element("an attribute"));
            }
            if !doc.is_element(node.id()) {
                return Err(self.non_element(doc.kind(node.id()).describe()));
            }
            set.insert(node.id());
        }
        trace!("XPath '{}' matched {} elements", self.source, nodes.len());
        Ok(PreparedRule::Set(Arc::new(set)))
    }
}

impl XPathRule {
    fn non_element(&self, kind: &'static str) -> FormatError {
        FormatError::NonElementSelection {
            expression: self.source.clone(),
            kind,
        }
    }
}

/// Matches the elements selected by an XPath expression evaluated from the document node.
/// The expression is parsed here; evaluation happens once per document.
pub fn matches_xpath(expression: &str) -> Result<Predicate, ConfigError> {
    let parsed = parse_expression(expression).map_err(|source| ConfigError::XPath {
        expression: expression.to_string(),
        source,
    })?;
    Ok(Predicate::new(XPathRule {
        source: expression.to_string(),
        expression: parsed,
    }))
}
