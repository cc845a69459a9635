//! The classification pass: decides layout, whitespace mode, depth, and tag style for every node
//! before anything is written.

use crate::annotation::{Annotation, AnnotationStore, Layout, WhitespaceMode};
use crate::closing::ClosingTable;
use crate::config::FormatterConfig;
use crate::error::FormatError;
use crate::predicate::{PreparedAttributeRule, PreparedRule, RuleCache, has_direct_significant_text};
use crate::whitespace::is_blank;
use log::{debug, trace};
use markfmt_dom::{Document, NodeId, NodeKind};

/// Every configured rule, prepared against one document. A predicate shared between several
/// rules is prepared once.
pub(crate) struct PreparedRules {
    block: PreparedRule,
    inline: PreparedRule,
    normalize_whitespace: PreparedRule,
    preserve_whitespace: PreparedRule,
    wrap_attributes: PreparedRule,
    text_formatters: Vec<PreparedRule>,
    attribute_formatters: Vec<PreparedAttributeRule>,
}

impl PreparedRules {
    pub(crate) fn prepare(config: &FormatterConfig, doc: &Document) -> Result<Self, FormatError> {
        let mut cache = RuleCache::new(doc);
        let rules = Self {
            block: config.block.prepare_in(&mut cache)?,
            inline: config.inline.prepare_in(&mut cache)?,
            normalize_whitespace: config.normalize_whitespace.prepare_in(&mut cache)?,
            preserve_whitespace: config.preserve_whitespace.prepare_in(&mut cache)?,
            wrap_attributes: config.wrap_attributes.prepare_in(&mut cache)?,
            text_formatters: config
                .text_formatters
                .iter()
                .map(|(rule, _)| rule.prepare_in(&mut cache))
                .collect::<Result<_, _>>()?,
            attribute_formatters: config
                .attribute_formatters
                .iter()
                .map(|(rule, _)| rule.prepare_in(&mut cache))
                .collect::<Result<_, _>>()?,
        };
        debug!(
            "Prepared {} distinct predicates for {} nodes ({} text formatters, {} attribute formatters)",
            cache.len(),
            doc.node_count(),
            rules.text_formatters.len(),
            rules.attribute_formatters.len()
        );
        Ok(rules)
    }
}

/// Whitespace preservation inherited from the enclosing elements.
#[derive(Debug, Clone, Copy, Default)]
struct Scope {
    /// An ancestor-or-self matched the preserve rule.
    preserve_rule: bool,
    /// The nearest `xml:space` in scope says `preserve`.
    xml_space_preserve: bool,
}

struct Classifier<'a> {
    doc: &'a Document,
    rules: &'a PreparedRules,
    table: &'static ClosingTable,
    default_layout: Layout,
    store: AnnotationStore,
}

/// Annotates the root element, everything below it, and the comments and processing
/// instructions beside it.
pub(crate) fn annotate(
    doc: &Document,
    config: &FormatterConfig,
    rules: &PreparedRules,
) -> Result<AnnotationStore, FormatError> {
    let root = doc.root_element().ok_or(FormatError::MissingRoot)?;
    let mut classifier = Classifier {
        doc,
        rules,
        table: config.flavor.closing_table(),
        default_layout: config.default_layout,
        store: AnnotationStore::new(doc.node_count()),
    };

    for &id in doc.children(Document::DOCUMENT) {
        if matches!(
            doc.kind(id),
            NodeKind::Comment(_) | NodeKind::ProcessingInstruction { .. }
        ) {
            classifier.store.insert(id, Annotation::default())?;
        }
    }

    let root_layout = classifier
        .explicit_layout(root)
        .unwrap_or(config.default_layout);
    let root_scope = classifier.annotate_element(root, root_layout, 0, Scope::default())?;

    let mut pending = vec![(root, root_scope)];
    while let Some((parent, scope)) = pending.pop() {
        classifier.annotate_items(parent, scope, &mut pending)?;
    }

    debug!("Annotated {} nodes", classifier.store.len());
    Ok(classifier.store)
}

impl Classifier<'_> {
    /// Layout decided by the rules alone. The block rule wins over the inline rule.
    fn explicit_layout(&self, id: NodeId) -> Option<Layout> {
        if self.rules.block.test(id) {
            Some(Layout::Block)
        } else if self.rules.inline.test(id) {
            Some(Layout::Inline)
        } else {
            None
        }
    }

    fn annotate_items(
        &mut self,
        parent: NodeId,
        scope: Scope,
        pending: &mut Vec<(NodeId, Scope)>,
    ) -> Result<(), FormatError> {
        let doc = self.doc;
        let (parent_layout, parent_depth, parent_mode) = {
            let a = self.store.require(parent)?;
            (a.layout, a.depth, a.whitespace)
        };
        let items: Vec<NodeId> = doc
            .children(parent)
            .iter()
            .copied()
            .filter(|&id| !doc.kind(id).is_plain_text())
            .collect();
        if items.is_empty() {
            return Ok(());
        }

        let mixed = has_direct_significant_text(doc, parent);
        let decided: Vec<Option<Layout>> = items
            .iter()
            .map(|&id| {
                if matches!(doc.kind(id), NodeKind::Text { cdata: true, .. }) {
                    Some(Layout::Inline)
                } else if let Some(layout) = self.explicit_layout(id) {
                    Some(layout)
                } else if mixed || parent_layout == Layout::Inline {
                    Some(Layout::Inline)
                } else {
                    None
                }
            })
            .collect();
        // One inline sibling means the remaining items cannot be stacked as blocks.
        let stackable = parent_layout == Layout::Block && !decided.contains(&Some(Layout::Inline));
        let depth = match parent_layout {
            Layout::Block => parent_depth + 1,
            Layout::Inline => parent_depth,
        };

        for (&id, decided) in items.iter().zip(decided) {
            let layout = decided.unwrap_or(if stackable {
                Layout::Block
            } else {
                self.default_layout
            });
            if doc.is_element(id) {
                let child_scope = self.annotate_element(id, layout, depth, scope)?;
                pending.push((id, child_scope));
            } else {
                trace!("{} {}: {:?} at depth {}", doc.kind(id).describe(), id, layout, depth);
                self.store.insert(
                    id,
                    Annotation {
                        layout,
                        whitespace: parent_mode,
                        depth,
                        ..Default::default()
                    },
                )?;
            }
        }
        Ok(())
    }

    fn annotate_element(
        &mut self,
        id: NodeId,
        layout: Layout,
        depth: usize,
        inherited: Scope,
    ) -> Result<Scope, FormatError> {
        let doc = self.doc;
        let rules = self.rules;
        let name = doc.name(id).unwrap_or_default();

        let scope = Scope {
            preserve_rule: inherited.preserve_rule || rules.preserve_whitespace.test(id),
            xml_space_preserve: match doc.attribute(id, "xml:space") {
                Some("preserve") => true,
                Some("default") => false,
                _ => inherited.xml_space_preserve,
            },
        };
        let whitespace = if scope.preserve_rule || scope.xml_space_preserve {
            WhitespaceMode::Preserve
        } else if rules.normalize_whitespace.test(id) {
            WhitespaceMode::Normalize
        } else {
            WhitespaceMode::Default
        };

        let attributes = doc.attributes(id);
        // Formatter output is content, so a formatted element is never empty.
        let text_formatter = rules
            .text_formatters
            .iter()
            .position(|r| r.test(id))
            .filter(|_| self.table.accepts_content(name));
        let is_empty = text_formatter.is_none() && is_empty_element(doc, id, whitespace);
        let annotation = Annotation {
            layout,
            whitespace,
            wrap_attributes: !attributes.is_empty() && rules.wrap_attributes.test(id),
            text_formatter,
            attribute_formatters: attributes
                .iter()
                .map(|a| {
                    rules
                        .attribute_formatters
                        .iter()
                        .position(|r| r.test(id, &a.name, &a.value))
                })
                .collect(),
            tag_style: self.table.select(name, is_empty)?,
            depth,
            is_empty,
        };
        trace!(
            "<{}> {}: {:?}, {:?}, depth {}, {:?}",
            name, id, layout, whitespace, depth, annotation.tag_style
        );
        self.store.insert(id, annotation)?;
        Ok(scope)
    }
}

/// An element is empty when it has no items and its text would render as nothing.
fn is_empty_element(doc: &Document, id: NodeId, mode: WhitespaceMode) -> bool {
    match doc.children(id) {
        [] => true,
        [only] => match doc.kind(*only) {
            NodeKind::Text {
                content,
                cdata: false,
            } => match mode {
                WhitespaceMode::Normalize => is_blank(content),
                WhitespaceMode::Default | WhitespaceMode::Preserve => content.is_empty(),
            },
            _ => false,
        },
        _ => false,
    }
}
