//! A compact XPath 1.0 evaluator written against a generic read-only node trait.
//!
//! Formatting rules compile their expressions with [`parse_expression`] when the rule is
//! built and evaluate them with [`select`] once per document.

pub mod ast;
pub mod axes;
pub mod datasource;
pub mod engine;
pub mod error;
pub mod functions;
pub mod operators;
pub mod parser;

pub use ast::{Axis, BinaryOp, Expr, NodeTest, Path, PathStart, Step};
pub use datasource::{NodeType, QName, XPathNode};
pub use engine::{EvaluationContext, XPathValue, evaluate, select};
pub use error::XPathError;
pub use parser::parse_expression;
