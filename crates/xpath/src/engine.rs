//! Evaluates parsed expressions against any [`XPathNode`] tree.

use crate::ast::{Axis, Expr, NodeTest, Path, PathStart, Step};
use crate::datasource::{NodeType, XPathNode};
use crate::error::XPathError;
use crate::{axes, functions, operators};
use std::fmt;
use std::marker::PhantomData;

/// Represents the possible result types of an XPath expression evaluation.
#[derive(Debug, Clone)]
pub enum XPathValue<N> {
    NodeSet(Vec<N>),
    String(String),
    Number(f64),
    Boolean(bool),
}

impl<'a, N: XPathNode<'a>> XPathValue<N> {
    /// Coerces the value to a boolean as per XPath 1.0 rules.
    pub fn to_bool(&self) -> bool {
        match self {
            XPathValue::NodeSet(nodes) => !nodes.is_empty(),
            XPathValue::String(s) => !s.is_empty(),
            XPathValue::Number(n) => *n != 0.0 && !n.is_nan(),
            XPathValue::Boolean(b) => *b,
        }
    }

    /// Coerces the value to a number as per XPath 1.0 rules.
    pub fn to_number(&self) -> f64 {
        match self {
            XPathValue::Number(n) => *n,
            XPathValue::Boolean(b) => f64::from(u8::from(*b)),
            other => string_to_number(&other.to_string()),
        }
    }
}

pub(crate) fn string_to_number(s: &str) -> f64 {
    s.trim().parse().unwrap_or(f64::NAN)
}

impl<'a, N: XPathNode<'a>> fmt::Display for XPathValue<N> {
    /// The XPath `string()` conversion.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XPathValue::NodeSet(nodes) => match nodes.first() {
                Some(n) => write!(f, "{}", n.string_value()),
                None => Ok(()),
            },
            XPathValue::String(s) => write!(f, "{}", s),
            XPathValue::Number(n) => write!(f, "{}", format_number(*n)),
            XPathValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == n.trunc() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Evaluation state: the context node, its position within the current node list,
/// and the document root used by absolute paths.
/// `'a` is the lifetime of the underlying tree.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a, N: XPathNode<'a>> {
    pub context_node: N,
    pub root_node: N,
    pub context_position: usize, // 1-based
    pub context_size: usize,
    _marker: PhantomData<&'a ()>,
}

impl<'a, N: XPathNode<'a>> EvaluationContext<'a, N> {
    pub fn new(context_node: N, root_node: N) -> Self {
        Self {
            context_node,
            root_node,
            context_position: 1,
            context_size: 1,
            _marker: PhantomData,
        }
    }

    fn focused(&self, node: N, position: usize, size: usize) -> Self {
        Self {
            context_node: node,
            root_node: self.root_node,
            context_position: position,
            context_size: size,
            _marker: PhantomData,
        }
    }
}

/// Evaluates `expr` with `context` as the context node.
pub fn select<'a, N>(expr: &Expr, context: N, root: N) -> Result<XPathValue<N>, XPathError>
where
    N: XPathNode<'a> + 'a,
{
    evaluate(expr, &EvaluationContext::new(context, root))
}

/// Evaluates a compiled expression and returns a concrete `XPathValue`.
pub fn evaluate<'a, N>(
    expr: &Expr,
    e_ctx: &EvaluationContext<'a, N>,
) -> Result<XPathValue<N>, XPathError>
where
    N: XPathNode<'a> + 'a,
{
    match expr {
        Expr::Literal(s) => Ok(XPathValue::String(s.clone())),
        Expr::Number(n) => Ok(XPathValue::Number(*n)),
        Expr::Path(path) => evaluate_path(path, e_ctx).map(XPathValue::NodeSet),
        Expr::Call(name, args) => {
            let evaluated_args = args
                .iter()
                .map(|arg| evaluate(arg, e_ctx))
                .collect::<Result<Vec<_>, _>>()?;
            functions::evaluate_function(name, evaluated_args, e_ctx)
        }
        Expr::Binary(left, op, right) => {
            let left_val = evaluate(left, e_ctx)?;
            let right_val = evaluate(right, e_ctx)?;
            operators::evaluate(*op, left_val, right_val)
        }
        Expr::Negate(inner) => Ok(XPathValue::Number(-evaluate(inner, e_ctx)?.to_number())),
    }
}

fn evaluate_path<'a, N>(path: &Path, e_ctx: &EvaluationContext<'a, N>) -> Result<Vec<N>, XPathError>
where
    N: XPathNode<'a> + 'a,
{
    let mut current_nodes = match &path.start {
        PathStart::Context => vec![e_ctx.context_node],
        PathStart::Root => vec![e_ctx.root_node],
        PathStart::Filter(start) => match evaluate(start, e_ctx)? {
            XPathValue::NodeSet(nodes) => nodes,
            other => {
                return Err(XPathError::TypeError(format!(
                    "cannot apply a path step to a non-node-set value '{}'",
                    other
                )));
            }
        },
    };

    for step in &path.steps {
        current_nodes = evaluate_step(step, &current_nodes, e_ctx)?;
    }
    Ok(current_nodes)
}

/// Runs one step from every context node and merges the results in document order.
fn evaluate_step<'a, N>(
    step: &Step,
    context_nodes: &[N],
    e_ctx: &EvaluationContext<'a, N>,
) -> Result<Vec<N>, XPathError>
where
    N: XPathNode<'a> + 'a,
{
    let mut merged = Vec::new();
    let mut axis_nodes = Vec::new();
    for &node in context_nodes {
        axis_nodes.clear();
        axes::collect(step.axis, node, &mut axis_nodes);
        let tested = filter_by_node_test(&axis_nodes, &step.test, step.axis);
        merged.extend(apply_predicates(tested, &step.predicates, e_ctx)?);
    }
    if context_nodes.len() > 1 || step.axis.is_reverse() {
        merged.sort();
        merged.dedup();
    }
    Ok(merged)
}

fn filter_by_node_test<'a, N>(nodes: &[N], test: &NodeTest, axis: Axis) -> Vec<N>
where
    N: XPathNode<'a> + 'a,
{
    let principal = match axis {
        Axis::Attribute => NodeType::Attribute,
        _ => NodeType::Element,
    };
    nodes
        .iter()
        .filter(|node| match test {
            NodeTest::AnyName => node.node_type() == principal,
            NodeTest::Name(name) => {
                node.node_type() == principal
                    && node.name().is_some_and(|q_name| q_name.matches_test(name))
            }
            NodeTest::AnyNode => true,
            NodeTest::Text => node.node_type() == NodeType::Text,
            NodeTest::Comment => node.node_type() == NodeType::Comment,
            NodeTest::ProcessingInstruction => node.node_type() == NodeType::ProcessingInstruction,
        })
        .copied()
        .collect()
}

/// Filters an axis-ordered node list through each predicate in turn.
fn apply_predicates<'a, N>(
    nodes: Vec<N>,
    predicates: &[Expr],
    e_ctx: &EvaluationContext<'a, N>,
) -> Result<Vec<N>, XPathError>
where
    N: XPathNode<'a> + 'a,
{
    let mut current = nodes;
    for predicate in predicates {
        let size = current.len();
        let mut kept = Vec::with_capacity(size);
        for (i, node) in current.iter().enumerate() {
            let focus = e_ctx.focused(*node, i + 1, size);
            let keep = match evaluate(predicate, &focus)? {
                XPathValue::Number(n) => n == (i + 1) as f64,
                other => other.to_bool(),
            };
            if keep {
                kept.push(*node);
            }
        }
        current = kept;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::mock::{MockNode, MockTree, create_test_tree};
    use crate::parser::parse_expression;

    fn eval<'t>(tree: &'t MockTree, context: usize, xpath: &str) -> XPathValue<MockNode<'t>> {
        let expr = parse_expression(xpath).unwrap();
        select(&expr, tree.node(context), tree.node(0)).unwrap()
    }

    fn node_ids(value: XPathValue<MockNode<'_>>) -> Vec<usize> {
        match value {
            XPathValue::NodeSet(nodes) => nodes.iter().map(|n| n.id).collect(),
            other => panic!("Expected a NodeSet, got {:?}", other),
        }
    }

    #[test]
    fn test_absolute_and_descendant_paths() {
        let tree = create_test_tree();
        assert_eq!(node_ids(eval(&tree, 5, "/page/para")), vec![2, 9]);
        assert_eq!(node_ids(eval(&tree, 0, "//para")), vec![2, 9]);
        assert_eq!(node_ids(eval(&tree, 0, "//*")), vec![1, 2, 7, 9]);
    }

    #[test]
    fn test_predicate_by_attribute() {
        let tree = create_test_tree();
        assert_eq!(node_ids(eval(&tree, 1, "para[@id='p1']")), vec![2]);
        assert_eq!(node_ids(eval(&tree, 1, "para[not(@id)]")), vec![9]);
    }

    #[test]
    fn test_predicate_by_position() {
        let tree = create_test_tree();
        assert_eq!(node_ids(eval(&tree, 1, "para[2]")), vec![9]);
        assert_eq!(node_ids(eval(&tree, 1, "*[position() = last()]")), vec![9]);
    }

    #[test]
    fn test_reverse_axis_positions_are_nearest_first() {
        let tree = create_test_tree();
        assert_eq!(node_ids(eval(&tree, 5, "ancestor::*[1]")), vec![2]);
        assert_eq!(node_ids(eval(&tree, 9, "preceding-sibling::*[1]")), vec![7]);
    }

    #[test]
    fn test_node_type_tests() {
        let tree = create_test_tree();
        assert_eq!(node_ids(eval(&tree, 1, "comment()")), vec![6]);
        assert_eq!(node_ids(eval(&tree, 1, "processing-instruction()")), vec![8]);
        assert_eq!(node_ids(eval(&tree, 2, "text()")), vec![5]);
        assert_eq!(node_ids(eval(&tree, 5, "..")), vec![2]);
    }

    #[test]
    fn test_prefixed_attribute_name() {
        let tree = create_test_tree();
        assert_eq!(node_ids(eval(&tree, 2, "@xml:lang")), vec![4]);
        assert!(node_ids(eval(&tree, 2, "@lang")).is_empty());
    }

    #[test]
    fn test_scalar_results() {
        let tree = create_test_tree();
        assert_eq!(eval(&tree, 0, "count(//para)").to_number(), 2.0);
        assert_eq!(eval(&tree, 0, "string(/page)").to_string(), "HelloWorld");
        assert!(eval(&tree, 1, "para = 'World'").to_bool());
    }

    #[test]
    fn test_path_from_non_node_set_is_an_error() {
        let tree = create_test_tree();
        let expr = parse_expression("string(.)/a").unwrap();
        let result = select(&expr, tree.node(1), tree.node(0));
        assert!(matches!(result, Err(XPathError::TypeError(_))));
    }
}
