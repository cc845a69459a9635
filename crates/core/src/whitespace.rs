//! Whitespace handling for the text between an element's items.
//!
//! An element's children are seen as a sequence of *items* (child elements, comments,
//! processing instructions, CDATA sections) separated by *gaps* of plain text. For `n` items there
//! are `n + 1` gaps; gap 0 is the element's leading text and the last gap runs up to its end tag.
//! [`shape_gap`] decides what each gap becomes, given the items on either side.

use crate::annotation::{Layout, WhitespaceMode};
use std::borrow::Cow;

pub fn is_xml_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// True for text made only of XML whitespace, including the empty string.
pub fn is_blank(text: &str) -> bool {
    text.chars().all(is_xml_whitespace)
}

pub fn trim_start(text: &str) -> &str {
    text.trim_start_matches(is_xml_whitespace)
}

pub fn trim_end(text: &str) -> &str {
    text.trim_end_matches(is_xml_whitespace)
}

pub fn trim(text: &str) -> &str {
    trim_end(trim_start(text))
}

/// Replaces every whitespace run with a single space.
pub fn collapse(text: &str) -> Cow<'_, str> {
    let needs_work = text
        .char_indices()
        .any(|(i, c)| is_xml_whitespace(c) && (c != ' ' || text[i + 1..].starts_with(is_xml_whitespace)));
    if !needs_work {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if is_xml_whitespace(c) {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    Cow::Owned(out)
}

/// The layout and depth of an item next to a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbour {
    pub layout: Layout,
    pub depth: usize,
}

/// Where a gap sits and what surrounds it.
#[derive(Debug, Clone, Copy)]
pub struct Gap {
    pub mode: WhitespaceMode,
    pub before: Option<Neighbour>,
    pub after: Option<Neighbour>,
    /// Depth of the element that owns the gap.
    pub parent_depth: usize,
}

pub(crate) fn newline_indent(out: &mut String, indent: &str, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str(indent);
    }
}

/// Returns the text to emit for one gap, before escaping.
pub fn shape_gap(text: &str, gap: &Gap, indent: &str) -> String {
    if gap.mode == WhitespaceMode::Preserve {
        return text.to_string();
    }
    let collapsed;
    let mut t = text;
    if gap.mode == WhitespaceMode::Normalize {
        collapsed = collapse(text);
        t = collapsed.as_ref();
        if gap.before.is_none() {
            t = trim_start(t);
        }
        if gap.after.is_none() {
            t = trim_end(t);
        }
    }

    let block = |n: Option<Neighbour>| n.filter(|n| n.layout == Layout::Block);
    let mut out = String::with_capacity(t.len() + 16);
    match (block(gap.before), gap.after) {
        (Some(before), None) => {
            let rest = trim_start(t);
            if rest.is_empty() {
                newline_indent(&mut out, indent, gap.parent_depth);
            } else {
                newline_indent(&mut out, indent, before.depth);
                out.push_str(rest);
            }
        }
        (Some(before), Some(after)) if after.layout == Layout::Block => {
            let rest = trim(t);
            if !rest.is_empty() {
                newline_indent(&mut out, indent, before.depth);
                out.push_str(rest);
            }
            newline_indent(&mut out, indent, after.depth);
        }
        (Some(before), Some(_)) => {
            if t.starts_with(is_xml_whitespace) {
                newline_indent(&mut out, indent, before.depth);
                out.push_str(trim_start(t));
            } else {
                out.push_str(t);
            }
        }
        (None, Some(after)) if after.layout == Layout::Block => {
            out.push_str(trim_end(t));
            newline_indent(&mut out, indent, after.depth);
        }
        (None, _) => out.push_str(t),
    }
    out
}
