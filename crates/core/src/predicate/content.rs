//! Rules over an element's content.

use super::{Predicate, PreparedRule, Rule};
use crate::error::FormatError;
use crate::whitespace::is_blank;
use markfmt_dom::{Document, NodeId, NodeKind};

/// True when the element's own text children contain anything but whitespace.
/// A non-empty CDATA section always counts.
pub fn has_direct_significant_text(doc: &Document, id: NodeId) -> bool {
    doc.children(id).iter().any(|&c| match doc.kind(c) {
        NodeKind::Text { content, cdata: false } => !is_blank(content),
        NodeKind::Text { content, cdata: true } => !content.is_empty(),
        _ => false,
    })
}

#[derive(Debug, Clone, Copy)]
enum Content {
    Significant,
    NoSignificant,
    Mixed,
    ChildElements,
}

#[derive(Debug)]
struct ContentRule(Content);

impl Rule for ContentRule {
    fn prepare(&self, doc: &Document) -> Result<PreparedRule, FormatError> {
        Ok(PreparedRule::collect_elements(doc, |id| match self.0 {
            Content::Significant => has_direct_significant_text(doc, id),
            Content::NoSignificant => !has_direct_significant_text(doc, id),
            Content::Mixed => doc
                .parent(id)
                .is_some_and(|p| doc.is_element(p) && has_direct_significant_text(doc, p)),
            Content::ChildElements => doc.element_children(id).next().is_some(),
        }))
    }
}

/// Elements with non-whitespace text of their own.
pub fn has_significant_content() -> Predicate {
    Predicate::new(ContentRule(Content::Significant))
}

pub fn has_no_significant_content() -> Predicate {
    Predicate::new(ContentRule(Content::NoSignificant))
}

/// Elements sitting in mixed content, i.e. whose parent has significant text of its own.
pub fn has_mixed_content() -> Predicate {
    Predicate::new(ContentRule(Content::Mixed))
}

pub fn has_child_elements() -> Predicate {
    Predicate::new(ContentRule(Content::ChildElements))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::tests::matching;
    use markfmt_dom::parse_xml;

    #[test]
    fn test_content_rules() {
        let doc = parse_xml("<r>\n  <p>Hi <em>there</em></p>\n  <q> </q><s><![CDATA[x]]></s></r>").unwrap();
        assert_eq!(matching(&doc, &has_significant_content()), vec!["p", "em", "s"]);
        assert_eq!(matching(&doc, &has_no_significant_content()), vec!["r", "q"]);
        assert_eq!(matching(&doc, &has_mixed_content()), vec!["em"]);
        assert_eq!(matching(&doc, &has_child_elements()), vec!["r", "p"]);
    }
}
