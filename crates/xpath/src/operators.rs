//! Binary operator evaluation, including XPath 1.0 node-set comparisons.

use crate::ast::BinaryOp;
use crate::datasource::XPathNode;
use crate::engine::{XPathValue, string_to_number};
use crate::error::XPathError;

pub fn evaluate<'a, N: XPathNode<'a> + 'a>(
    op: BinaryOp,
    left: XPathValue<N>,
    right: XPathValue<N>,
) -> Result<XPathValue<N>, XPathError> {
    use BinaryOp::*;
    match op {
        Or => Ok(XPathValue::Boolean(left.to_bool() || right.to_bool())),
        And => Ok(XPathValue::Boolean(left.to_bool() && right.to_bool())),
        Eq | Ne | Lt | Le | Gt | Ge => {
            Ok(XPathValue::Boolean(compare(op, &left, &right)))
        }
        Add => Ok(XPathValue::Number(left.to_number() + right.to_number())),
        Sub => Ok(XPathValue::Number(left.to_number() - right.to_number())),
        Mul => Ok(XPathValue::Number(left.to_number() * right.to_number())),
        Div => Ok(XPathValue::Number(left.to_number() / right.to_number())),
        Mod => Ok(XPathValue::Number(left.to_number() % right.to_number())),
        Union => evaluate_union(left, right),
    }
}

/// An atomic operand: node-sets are compared member by member.
enum Atom {
    Str(String),
    Num(f64),
    Bool(bool),
}

fn atoms<'a, N: XPathNode<'a>>(value: &XPathValue<N>) -> Vec<Atom> {
    match value {
        XPathValue::NodeSet(nodes) => nodes.iter().map(|n| Atom::Str(n.string_value())).collect(),
        XPathValue::String(s) => vec![Atom::Str(s.clone())],
        XPathValue::Number(n) => vec![Atom::Num(*n)],
        XPathValue::Boolean(b) => vec![Atom::Bool(*b)],
    }
}

fn compare<'a, N: XPathNode<'a>>(
    op: BinaryOp,
    left: &XPathValue<N>,
    right: &XPathValue<N>,
) -> bool {
    // A node-set compared with a boolean converts the node-set as a whole.
    match (left, right) {
        (XPathValue::NodeSet(_), XPathValue::Boolean(b)) => {
            return compare_atoms(op, &Atom::Bool(left.to_bool()), &Atom::Bool(*b));
        }
        (XPathValue::Boolean(b), XPathValue::NodeSet(_)) => {
            return compare_atoms(op, &Atom::Bool(*b), &Atom::Bool(right.to_bool()));
        }
        _ => {}
    }
    let left_atoms = atoms(left);
    let right_atoms = atoms(right);
    left_atoms
        .iter()
        .any(|l| right_atoms.iter().any(|r| compare_atoms(op, l, r)))
}

fn compare_atoms(op: BinaryOp, left: &Atom, right: &Atom) -> bool {
    use BinaryOp::*;
    match op {
        Eq | Ne => {
            let equal = match (left, right) {
                (Atom::Bool(_), _) | (_, Atom::Bool(_)) => as_bool(left) == as_bool(right),
                (Atom::Num(_), _) | (_, Atom::Num(_)) => as_number(left) == as_number(right),
                (Atom::Str(l), Atom::Str(r)) => l == r,
            };
            if op == Eq { equal } else { !equal }
        }
        Lt => as_number(left) < as_number(right),
        Le => as_number(left) <= as_number(right),
        Gt => as_number(left) > as_number(right),
        Ge => as_number(left) >= as_number(right),
        _ => false,
    }
}

fn as_bool(atom: &Atom) -> bool {
    match atom {
        Atom::Str(s) => !s.is_empty(),
        Atom::Num(n) => *n != 0.0 && !n.is_nan(),
        Atom::Bool(b) => *b,
    }
}

fn as_number(atom: &Atom) -> f64 {
    match atom {
        Atom::Str(s) => string_to_number(s),
        Atom::Num(n) => *n,
        Atom::Bool(b) => f64::from(u8::from(*b)),
    }
}

fn evaluate_union<'a, N: XPathNode<'a> + 'a>(
    left: XPathValue<N>,
    right: XPathValue<N>,
) -> Result<XPathValue<N>, XPathError> {
    match (left, right) {
        (XPathValue::NodeSet(mut merged), XPathValue::NodeSet(r_nodes)) => {
            merged.extend(r_nodes);
            merged.sort();
            merged.dedup();
            Ok(XPathValue::NodeSet(merged))
        }
        _ => Err(XPathError::TypeError(
            "Both operands of '|' must be node-sets.".to_string(),
        )),
    }
}
