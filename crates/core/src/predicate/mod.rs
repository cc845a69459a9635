//! Element rules, prepared once per document.
//!
//! A [`Predicate`] is built and validated when the configuration is built. Formatting a document
//! prepares every configured predicate through one [`RuleCache`], so each distinct predicate scans
//! the tree once even when it is shared between rules or nested inside combinators. The result is
//! a [`PreparedRule`] whose [`PreparedRule::test`] is a constant-time lookup.

mod attribute;
mod content;
mod element;
pub mod html;
mod matcher;
mod xpath;

pub use attribute::{AttributeRule, PreparedAttributeRule};
pub use content::{has_child_elements, has_direct_significant_text, has_mixed_content, has_no_significant_content, has_significant_content};
pub use element::{
    attribute_count_between, attribute_count_max, attribute_count_min, attribute_equals,
    attribute_matches, has_attribute, has_class, tag_equals, tag_in,
};
pub use html::{
    html_block_elements, html_inline_elements, html_metadata_elements, html_void_elements,
    html_whitespace_significant_elements,
};
pub use matcher::Matcher;
pub use xpath::matches_xpath;

use crate::error::FormatError;
use log::trace;
use markfmt_dom::{Document, NodeId, NodeKind};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A validated rule. Implementations hold configuration only, never per-document state.
pub trait Rule: Send + Sync + fmt::Debug {
    fn prepare(&self, doc: &Document) -> Result<PreparedRule, FormatError>;

    /// Rules built from other predicates override this to prepare them through `cache`.
    fn prepare_with(&self, cache: &mut RuleCache<'_>) -> Result<PreparedRule, FormatError> {
        self.prepare(cache.document())
    }
}

/// Predicates already prepared against one document, keyed by the shared rule behind them.
pub struct RuleCache<'d> {
    doc: &'d Document,
    prepared: HashMap<*const (), PreparedRule>,
}

impl<'d> RuleCache<'d> {
    pub fn new(doc: &'d Document) -> Self {
        Self {
            doc,
            prepared: HashMap::new(),
        }
    }

    pub fn document(&self) -> &'d Document {
        self.doc
    }

    /// Number of distinct predicates prepared so far.
    pub fn len(&self) -> usize {
        self.prepared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prepared.is_empty()
    }
}

/// A shareable handle to a [`Rule`].
#[derive(Clone, Debug)]
pub struct Predicate(Arc<dyn Rule>);

impl Predicate {
    pub fn new(rule: impl Rule + 'static) -> Self {
        Predicate(Arc::new(rule))
    }

    /// Prepares this predicate on its own. Formatting goes through [`Predicate::prepare_in`].
    pub fn prepare(&self, doc: &Document) -> Result<PreparedRule, FormatError> {
        self.prepare_in(&mut RuleCache::new(doc))
    }

    /// Prepares this predicate unless a clone of it was already prepared into `cache`.
    pub fn prepare_in(&self, cache: &mut RuleCache<'_>) -> Result<PreparedRule, FormatError> {
        let key = Arc::as_ptr(&self.0).cast::<()>();
        if let Some(prepared) = cache.prepared.get(&key) {
            trace!("Reusing prepared {:?}", self.0);
            return Ok(prepared.clone());
        }
        let prepared = self.0.prepare_with(cache)?;
        cache.prepared.insert(key, prepared.clone());
        Ok(prepared)
    }

    pub fn or(self, other: Predicate) -> Predicate {
        any_of([self, other])
    }

    pub fn and(self, other: Predicate) -> Predicate {
        all_of([self, other])
    }

    pub fn negate(self) -> Predicate {
        not(self)
    }

    /// Narrows this rule to elements carrying an attribute whose name and value both match.
    pub fn with_attribute(self, name: impl Into<Matcher>, value: impl Into<Matcher>) -> Predicate {
        self.and(element::attribute_test(name.into(), Some(value.into())))
    }
}

/// Membership bitmap over a document's node ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSet {
    members: Vec<bool>,
}

impl NodeSet {
    pub fn empty(doc: &Document) -> Self {
        Self {
            members: vec![false; doc.node_count()],
        }
    }

    pub fn insert(&mut self, id: NodeId) {
        if let Some(slot) = self.members.get_mut(id.index()) {
            *slot = true;
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.members.get(id.index()).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.members.iter().filter(|m| **m).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.members.contains(&true)
    }
}

/// The per-document form of a rule. Cloning shares the node sets.
#[derive(Debug, Clone)]
pub enum PreparedRule {
    Never,
    Always,
    Set(Arc<NodeSet>),
    AnyOf(Vec<PreparedRule>),
    AllOf(Vec<PreparedRule>),
    Not(Box<PreparedRule>),
}

impl PreparedRule {
    /// Evaluates `test` once for every node of `doc` and keeps the matches.
    pub fn collect(doc: &Document, test: impl Fn(NodeId) -> bool) -> Self {
        let mut set = NodeSet::empty(doc);
        for id in doc.node_ids().filter(|&id| test(id)) {
            set.insert(id);
        }
        PreparedRule::Set(Arc::new(set))
    }

    /// Like [`PreparedRule::collect`], restricted to elements.
    pub fn collect_elements(doc: &Document, test: impl Fn(NodeId) -> bool) -> Self {
        Self::collect(doc, |id| doc.is_element(id) && test(id))
    }

    pub fn test(&self, node: NodeId) -> bool {
        match self {
            PreparedRule::Never => false,
            PreparedRule::Always => true,
            PreparedRule::Set(set) => set.contains(node),
            PreparedRule::AnyOf(rules) => rules.iter().any(|r| r.test(node)),
            PreparedRule::AllOf(rules) => rules.iter().all(|r| r.test(node)),
            PreparedRule::Not(rule) => !rule.test(node),
        }
    }
}

#[derive(Debug)]
struct Never;

impl Rule for Never {
    fn prepare(&self, _doc: &Document) -> Result<PreparedRule, FormatError> {
        Ok(PreparedRule::Never)
    }
}

/// Matches nothing.
pub fn never() -> Predicate {
    Predicate::new(Never)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KindTest {
    Element,
    Comment,
}

#[derive(Debug)]
struct NodeKindRule(KindTest);

impl Rule for NodeKindRule {
    fn prepare(&self, doc: &Document) -> Result<PreparedRule, FormatError> {
        Ok(PreparedRule::collect(doc, |id| match (self.0, doc.kind(id)) {
            (KindTest::Element, NodeKind::Element { .. }) => true,
            (KindTest::Comment, NodeKind::Comment(_)) => true,
            _ => false,
        }))
    }
}

/// Matches every element, but not comments or processing instructions.
pub fn any_element() -> Predicate {
    Predicate::new(NodeKindRule(KindTest::Element))
}

pub fn is_element() -> Predicate {
    any_element()
}

pub fn is_comment() -> Predicate {
    Predicate::new(NodeKindRule(KindTest::Comment))
}

#[derive(Debug)]
struct ProcessingInstructionRule {
    target: Option<String>,
}

impl Rule for ProcessingInstructionRule {
    fn prepare(&self, doc: &Document) -> Result<PreparedRule, FormatError> {
        Ok(PreparedRule::collect(doc, |id| match doc.kind(id) {
            NodeKind::ProcessingInstruction { target, .. } => {
                self.target.as_deref().is_none_or(|t| t == target)
            }
            _ => false,
        }))
    }
}

/// Matches processing instructions, optionally only those with the given target.
pub fn is_processing_instruction(target: Option<&str>) -> Predicate {
    Predicate::new(ProcessingInstructionRule {
        target: target.map(str::to_string),
    })
}

#[derive(Debug)]
struct AnyOf(Vec<Predicate>);

impl Rule for AnyOf {
    fn prepare(&self, doc: &Document) -> Result<PreparedRule, FormatError> {
        self.prepare_with(&mut RuleCache::new(doc))
    }

    fn prepare_with(&self, cache: &mut RuleCache<'_>) -> Result<PreparedRule, FormatError> {
        let rules = self
            .0
            .iter()
            .map(|p| p.prepare_in(cache))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(match rules.len() {
            0 => PreparedRule::Never,
            _ => PreparedRule::AnyOf(rules),
        })
    }
}

#[derive(Debug)]
struct AllOf(Vec<Predicate>);

impl Rule for AllOf {
    fn prepare(&self, doc: &Document) -> Result<PreparedRule, FormatError> {
        self.prepare_with(&mut RuleCache::new(doc))
    }

    fn prepare_with(&self, cache: &mut RuleCache<'_>) -> Result<PreparedRule, FormatError> {
        let rules = self
            .0
            .iter()
            .map(|p| p.prepare_in(cache))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PreparedRule::AllOf(rules))
    }
}

#[derive(Debug)]
struct Not(Predicate);

impl Rule for Not {
    fn prepare(&self, doc: &Document) -> Result<PreparedRule, FormatError> {
        self.prepare_with(&mut RuleCache::new(doc))
    }

    fn prepare_with(&self, cache: &mut RuleCache<'_>) -> Result<PreparedRule, FormatError> {
        Ok(PreparedRule::Not(Box::new(self.0.prepare_in(cache)?)))
    }
}

/// Matches when any of `predicates` match. An empty list matches nothing.
pub fn any_of(predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
    Predicate::new(AnyOf(predicates.into_iter().collect()))
}

/// Matches when all of `predicates` match. An empty list matches everything.
pub fn all_of(predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
    Predicate::new(AllOf(predicates.into_iter().collect()))
}

pub fn not(predicate: Predicate) -> Predicate {
    Predicate::new(Not(predicate))
}

type NodeFn = dyn Fn(&Document, NodeId) -> bool + Send + Sync;

struct FnRule(Arc<NodeFn>);

impl fmt::Debug for FnRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnRule(..)")
    }
}

impl Rule for FnRule {
    fn prepare(&self, doc: &Document) -> Result<PreparedRule, FormatError> {
        Ok(PreparedRule::collect(doc, |id| (self.0)(doc, id)))
    }
}

/// A custom rule. `test` runs once per node when a document is prepared.
pub fn from_fn<F>(test: F) -> Predicate
where
    F: Fn(&Document, NodeId) -> bool + Send + Sync + 'static,
{
    Predicate::new(FnRule(Arc::new(test)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use markfmt_dom::parse_xml;

    pub(crate) fn matching(doc: &Document, predicate: &Predicate) -> Vec<String> {
        let prepared = predicate.prepare(doc).unwrap();
        doc.node_ids()
            .filter(|&id| prepared.test(id))
            .map(|id| match doc.kind(id) {
                NodeKind::Element { name, .. } => name.clone(),
                other => other.describe().to_string(),
            })
            .collect()
    }

    #[test]
    fn test_combinators() {
        let doc = parse_xml("<r><a/><b/><c/></r>").unwrap();
        let a = tag_equals("a").unwrap();
        let b = tag_equals("b").unwrap();
        assert_eq!(matching(&doc, &a.clone().or(b.clone())), vec!["a", "b"]);
        assert!(matching(&doc, &a.clone().and(b.clone())).is_empty());
        assert_eq!(matching(&doc, &all_of([any_element(), a.negate()])), vec!["r", "b", "c"]);
        assert!(matching(&doc, &any_of([])).is_empty());
    }

    #[test]
    fn test_node_kinds() {
        let doc = parse_xml("<r><!-- c --><?php x?><?other y?><a/></r>").unwrap();
        assert_eq!(matching(&doc, &is_comment()), vec!["comment"]);
        assert_eq!(
            matching(&doc, &is_processing_instruction(Some("php"))),
            vec!["processing instruction"]
        );
        assert_eq!(matching(&doc, &is_processing_instruction(None)).len(), 2);
        assert_eq!(matching(&doc, &is_element()), vec!["r", "a"]);
        assert!(matching(&doc, &never()).is_empty());
    }

    #[test]
    fn test_from_fn_runs_once_per_node() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let deep = from_fn(move |doc, id| {
            counter.fetch_add(1, Ordering::SeqCst);
            doc.is_element(id) && doc.depth(id) >= 2
        });
        let doc = parse_xml("<r><a><b/><c/></a></r>").unwrap();
        let prepared = deep.prepare(&doc).unwrap();
        let matched: Vec<_> = doc.node_ids().filter(|&id| prepared.test(id)).collect();
        assert_eq!(matched.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), doc.node_count());
        // Testing again does not re-run the rule.
        for id in doc.node_ids() {
            prepared.test(id);
        }
        assert_eq!(calls.load(Ordering::SeqCst), doc.node_count());
    }

    #[test]
    fn test_shared_predicate_is_prepared_once_per_cache() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let first = from_fn(move |doc, id| {
            counter.fetch_add(1, Ordering::SeqCst);
            doc.name(id) == Some("a")
        });
        let doc = parse_xml("<r><a/><b/></r>").unwrap();
        let mut cache = RuleCache::new(&doc);
        let combined = first.clone().or(tag_equals("b").unwrap());
        let negated = all_of([any_element(), first.clone().negate()]);

        let direct = first.prepare_in(&mut cache).unwrap();
        let either = combined.prepare_in(&mut cache).unwrap();
        let other = negated.prepare_in(&mut cache).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), doc.node_count());

        let root = doc.root_element().unwrap();
        let a = doc.children(root)[0];
        let b = doc.children(root)[1];
        assert!(direct.test(a) && !direct.test(b));
        assert!(either.test(a) && either.test(b));
        assert!(!other.test(a) && other.test(b) && other.test(root));

        // A separate cache prepares again.
        first.prepare(&doc).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2 * doc.node_count());
    }

    #[test]
    fn test_with_attribute_refinement() {
        let doc = parse_xml(r#"<r><div style="a:1;b:2"/><div style="a:1"/><p style="a:1;b:2"/></r>"#)
            .unwrap();
        let two_declarations = Matcher::func(|v| v.matches(';').count() >= 1);
        let rule = tag_equals("div").unwrap().with_attribute("style", two_declarations);
        let prepared = rule.prepare(&doc).unwrap();
        let hits: Vec<_> = doc.node_ids().filter(|&id| prepared.test(id)).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(doc.attribute(hits[0], "style"), Some("a:1;b:2"));
    }
}
