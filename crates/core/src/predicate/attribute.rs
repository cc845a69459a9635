use super::{Matcher, Predicate, PreparedRule, RuleCache, any_element};
use crate::error::FormatError;
use markfmt_dom::{Document, NodeId};

/// Selects attributes: an element rule plus tests on the attribute's name and, optionally,
/// its value. Used to bind attribute formatters.
#[derive(Debug, Clone)]
pub struct AttributeRule {
    element: Predicate,
    name: Matcher,
    value: Option<Matcher>,
}

impl AttributeRule {
    pub fn new(element: Predicate, name: impl Into<Matcher>) -> Self {
        Self {
            element,
            name: name.into(),
            value: None,
        }
    }

    /// An attribute rule that applies on any element.
    pub fn named(name: impl Into<Matcher>) -> Self {
        Self::new(any_element(), name)
    }

    pub fn with_value(mut self, value: impl Into<Matcher>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn prepare(&self, doc: &Document) -> Result<PreparedAttributeRule, FormatError> {
        self.prepare_in(&mut RuleCache::new(doc))
    }

    pub fn prepare_in(&self, cache: &mut RuleCache<'_>) -> Result<PreparedAttributeRule, FormatError> {
        Ok(PreparedAttributeRule {
            element: self.element.prepare_in(cache)?,
            name: self.name.clone(),
            value: self.value.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct PreparedAttributeRule {
    element: PreparedRule,
    name: Matcher,
    value: Option<Matcher>,
}

impl PreparedAttributeRule {
    pub fn test(&self, element: NodeId, name: &str, value: &str) -> bool {
        self.element.test(element)
            && self.name.matches(name)
            && self.value.as_ref().is_none_or(|m| m.matches(value))
    }
}
