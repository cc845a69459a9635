//! Node collection along each XPath axis, starting from a single context node.
//!
//! Forward axes yield document order, reverse axes yield nearest-first so that positional
//! predicates see proximity positions.

use crate::ast::Axis;
use crate::datasource::XPathNode;

pub fn collect<'a, N: XPathNode<'a>>(axis: Axis, node: N, out: &mut Vec<N>) {
    match axis {
        Axis::Child => out.extend(node.children()),
        Axis::Attribute => out.extend(node.attributes()),
        Axis::SelfAxis => out.push(node),
        Axis::Descendant => collect_descendants(node, out),
        Axis::DescendantOrSelf => {
            out.push(node);
            collect_descendants(node, out);
        }
        Axis::Parent => out.extend(node.parent()),
        Axis::Ancestor => collect_ancestors(node, out),
        Axis::AncestorOrSelf => {
            out.push(node);
            collect_ancestors(node, out);
        }
        Axis::FollowingSibling => collect_following_siblings(node, out),
        Axis::PrecedingSibling => collect_preceding_siblings(node, out),
        Axis::Following => collect_following(node, out),
        Axis::Preceding => collect_preceding(node, out),
    }
}

fn collect_descendants<'a, N: XPathNode<'a>>(node: N, out: &mut Vec<N>) {
    let mut stack: Vec<N> = node.children().collect();
    stack.reverse();
    while let Some(current) = stack.pop() {
        out.push(current);
        let first = stack.len();
        stack.extend(current.children());
        stack[first..].reverse();
    }
}

fn collect_ancestors<'a, N: XPathNode<'a>>(node: N, out: &mut Vec<N>) {
    let mut current = node.parent();
    while let Some(p) = current {
        out.push(p);
        current = p.parent();
    }
}

// Attributes have a parent but are not among its children, so they have no siblings.
fn siblings<'a, N: XPathNode<'a>>(node: N) -> Option<(Vec<N>, usize)> {
    let parent = node.parent()?;
    let all: Vec<N> = parent.children().collect();
    let index = all.iter().position(|&s| s == node)?;
    Some((all, index))
}

fn collect_following_siblings<'a, N: XPathNode<'a>>(node: N, out: &mut Vec<N>) {
    if let Some((all, index)) = siblings(node) {
        out.extend_from_slice(&all[index + 1..]);
    }
}

fn collect_preceding_siblings<'a, N: XPathNode<'a>>(node: N, out: &mut Vec<N>) {
    if let Some((all, index)) = siblings(node) {
        out.extend(all[..index].iter().rev().copied());
    }
}

fn collect_following<'a, N: XPathNode<'a>>(node: N, out: &mut Vec<N>) {
    let mut current = node;
    loop {
        if let Some((all, index)) = siblings(current) {
            for &sibling in &all[index + 1..] {
                out.push(sibling);
                collect_descendants(sibling, out);
            }
        }
        match current.parent() {
            Some(p) => current = p,
            None => break,
        }
    }
}

fn collect_preceding<'a, N: XPathNode<'a>>(node: N, out: &mut Vec<N>) {
    let mut current = node;
    loop {
        if let Some((all, index)) = siblings(current) {
            for &sibling in all[..index].iter().rev() {
                let mut subtree = vec![sibling];
                collect_descendants(sibling, &mut subtree);
                out.extend(subtree.into_iter().rev());
            }
        }
        match current.parent() {
            Some(p) => current = p,
            None => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::mock::create_test_tree;

    fn ids<'a, N: XPathNode<'a>>(axis: Axis, node: N, id_of: impl Fn(&N) -> usize) -> Vec<usize> {
        let mut out = Vec::new();
        collect(axis, node, &mut out);
        out.iter().map(id_of).collect()
    }

    #[test]
    fn test_child_and_attribute_axes() {
        let tree = create_test_tree();
        assert_eq!(ids(Axis::Child, tree.node(1), |n| n.id), vec![2, 6, 7, 8, 9]);
        assert_eq!(ids(Axis::Attribute, tree.node(2), |n| n.id), vec![3, 4]);
    }

    #[test]
    fn test_descendants_in_document_order() {
        let tree = create_test_tree();
        assert_eq!(
            ids(Axis::Descendant, tree.node(1), |n| n.id),
            vec![2, 5, 6, 7, 8, 9, 10]
        );
        assert_eq!(ids(Axis::DescendantOrSelf, tree.node(9), |n| n.id), vec![9, 10]);
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let tree = create_test_tree();
        assert_eq!(ids(Axis::Ancestor, tree.node(5), |n| n.id), vec![2, 1, 0]);
        assert_eq!(ids(Axis::AncestorOrSelf, tree.node(5), |n| n.id), vec![5, 2, 1, 0]);
        // An attribute's parent is its element.
        assert_eq!(ids(Axis::Parent, tree.node(3), |n| n.id), vec![2]);
    }

    #[test]
    fn test_sibling_axes() {
        let tree = create_test_tree();
        assert_eq!(ids(Axis::FollowingSibling, tree.node(2), |n| n.id), vec![6, 7, 8, 9]);
        assert_eq!(ids(Axis::PrecedingSibling, tree.node(9), |n| n.id), vec![8, 7, 6, 2]);
        assert!(ids(Axis::FollowingSibling, tree.node(3), |n| n.id).is_empty());
    }

    #[test]
    fn test_following_and_preceding() {
        let tree = create_test_tree();
        assert_eq!(ids(Axis::Following, tree.node(5), |n| n.id), vec![6, 7, 8, 9, 10]);
        assert_eq!(ids(Axis::Preceding, tree.node(7), |n| n.id), vec![6, 5, 2]);
    }
}
