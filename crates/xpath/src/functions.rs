//! Built-in XPath 1.0 core functions.

use crate::datasource::{NodeType, XPathNode};
use crate::engine::{EvaluationContext, XPathValue};
use crate::error::XPathError;

/// Dispatches a function call to the correct implementation.
pub fn evaluate_function<'a, N: XPathNode<'a>>(
    name: &str,
    args: Vec<XPathValue<N>>,
    e_ctx: &EvaluationContext<'a, N>,
) -> Result<XPathValue<N>, XPathError> {
    match name {
        // Node-set
        "last" => {
            arity(name, &args, 0, 0)?;
            Ok(XPathValue::Number(e_ctx.context_size as f64))
        }
        "position" => {
            arity(name, &args, 0, 0)?;
            Ok(XPathValue::Number(e_ctx.context_position as f64))
        }
        "count" => func_count(name, args),
        "local-name" => func_name(name, args, e_ctx, true),
        "name" => func_name(name, args, e_ctx, false),

        // String
        "string" => {
            arity(name, &args, 0, 1)?;
            Ok(XPathValue::String(string_arg_or_context(args, e_ctx)))
        }
        "concat" => {
            arity(name, &args, 2, usize::MAX)?;
            Ok(XPathValue::String(args.iter().map(|v| v.to_string()).collect()))
        }
        "starts-with" => string_pair(name, args, |s1, s2| XPathValue::Boolean(s1.starts_with(s2))),
        "contains" => string_pair(name, args, |s1, s2| XPathValue::Boolean(s1.contains(s2))),
        "substring-before" => string_pair(name, args, |s1, s2| {
            XPathValue::String(s1.find(s2).map(|i| s1[..i].to_string()).unwrap_or_default())
        }),
        "substring-after" => string_pair(name, args, |s1, s2| {
            XPathValue::String(
                s1.find(s2)
                    .map(|i| s1[i + s2.len()..].to_string())
                    .unwrap_or_default(),
            )
        }),
        "substring" => func_substring(name, args),
        "string-length" => {
            arity(name, &args, 0, 1)?;
            let s = string_arg_or_context(args, e_ctx);
            Ok(XPathValue::Number(s.chars().count() as f64))
        }
        "normalize-space" => {
            arity(name, &args, 0, 1)?;
            let s = string_arg_or_context(args, e_ctx);
            Ok(XPathValue::String(
                s.split_whitespace().collect::<Vec<_>>().join(" "),
            ))
        }
        "translate" => func_translate(name, args),

        // Boolean
        "boolean" => {
            arity(name, &args, 1, 1)?;
            Ok(XPathValue::Boolean(args[0].to_bool()))
        }
        "not" => {
            arity(name, &args, 1, 1)?;
            Ok(XPathValue::Boolean(!args[0].to_bool()))
        }
        "true" => {
            arity(name, &args, 0, 0)?;
            Ok(XPathValue::Boolean(true))
        }
        "false" => {
            arity(name, &args, 0, 0)?;
            Ok(XPathValue::Boolean(false))
        }

        // Number
        "number" => {
            arity(name, &args, 0, 1)?;
            let n = match args.first() {
                Some(v) => v.to_number(),
                None => XPathValue::NodeSet(vec![e_ctx.context_node]).to_number(),
            };
            Ok(XPathValue::Number(n))
        }
        "sum" => func_sum(name, args),
        "floor" => number_fn(name, args, f64::floor),
        "ceiling" => number_fn(name, args, f64::ceil),
        "round" => number_fn(name, args, |n| (n + 0.5).floor()),

        _ => Err(XPathError::FunctionError {
            function: name.to_string(),
            message: "Unknown XPath function".to_string(),
        }),
    }
}

fn arity<N>(name: &str, args: &[N], min: usize, max: usize) -> Result<(), XPathError> {
    if args.len() < min || args.len() > max {
        let expected = match (min, max) {
            (min, max) if min == max => format!("{}", min),
            (min, usize::MAX) => format!("at least {}", min),
            (min, max) => format!("{} to {}", min, max),
        };
        return Err(XPathError::FunctionError {
            function: format!("{}()", name),
            message: format!("Expected {} arguments, got {}", expected, args.len()),
        });
    }
    Ok(())
}

fn string_arg_or_context<'a, N: XPathNode<'a>>(
    mut args: Vec<XPathValue<N>>,
    e_ctx: &EvaluationContext<'a, N>,
) -> String {
    match args.pop() {
        Some(v) => v.to_string(),
        None => e_ctx.context_node.string_value(),
    }
}

fn string_pair<'a, N: XPathNode<'a>>(
    name: &str,
    args: Vec<XPathValue<N>>,
    f: impl Fn(&str, &str) -> XPathValue<N>,
) -> Result<XPathValue<N>, XPathError> {
    arity(name, &args, 2, 2)?;
    Ok(f(&args[0].to_string(), &args[1].to_string()))
}

fn number_fn<'a, N: XPathNode<'a>>(
    name: &str,
    args: Vec<XPathValue<N>>,
    f: impl Fn(f64) -> f64,
) -> Result<XPathValue<N>, XPathError> {
    arity(name, &args, 1, 1)?;
    Ok(XPathValue::Number(f(args[0].to_number())))
}

fn node_set_arg<'a, N: XPathNode<'a>>(
    name: &str,
    value: XPathValue<N>,
) -> Result<Vec<N>, XPathError> {
    match value {
        XPathValue::NodeSet(nodes) => Ok(nodes),
        other => Err(XPathError::TypeError(format!(
            "{}() argument must be a node-set, got '{}'",
            name, other
        ))),
    }
}

fn func_count<'a, N: XPathNode<'a>>(
    name: &str,
    mut args: Vec<XPathValue<N>>,
) -> Result<XPathValue<N>, XPathError> {
    arity(name, &args, 1, 1)?;
    let nodes = node_set_arg(name, args.remove(0))?;
    Ok(XPathValue::Number(nodes.len() as f64))
}

fn func_sum<'a, N: XPathNode<'a>>(
    name: &str,
    mut args: Vec<XPathValue<N>>,
) -> Result<XPathValue<N>, XPathError> {
    arity(name, &args, 1, 1)?;
    let nodes = node_set_arg(name, args.remove(0))?;
    let total = nodes
        .iter()
        .map(|n| XPathValue::String::<N>(n.string_value()).to_number())
        .sum();
    Ok(XPathValue::Number(total))
}

fn func_name<'a, N: XPathNode<'a>>(
    name: &str,
    mut args: Vec<XPathValue<N>>,
    e_ctx: &EvaluationContext<'a, N>,
    local_only: bool,
) -> Result<XPathValue<N>, XPathError> {
    arity(name, &args, 0, 1)?;
    let target = match args.pop() {
        Some(v) => node_set_arg(name, v)?.first().copied(),
        None => Some(e_ctx.context_node),
    };
    let result = target
        .filter(|n| n.node_type() != NodeType::Root)
        .and_then(|n| n.name())
        .map(|q| match (local_only, q.prefix) {
            (false, Some(prefix)) => format!("{}:{}", prefix, q.local_part),
            _ => q.local_part.to_string(),
        })
        .unwrap_or_default();
    Ok(XPathValue::String(result))
}

fn func_substring<'a, N: XPathNode<'a>>(
    name: &str,
    args: Vec<XPathValue<N>>,
) -> Result<XPathValue<N>, XPathError> {
    arity(name, &args, 2, 3)?;
    let chars: Vec<char> = args[0].to_string().chars().collect();
    let round = |n: f64| (n + 0.5).floor();
    let start = round(args[1].to_number());
    let end = match args.get(2) {
        Some(len) => start + round(len.to_number()),
        None => f64::INFINITY,
    };
    // Positions are 1-based; NaN bounds select nothing.
    let result = chars
        .iter()
        .enumerate()
        .filter(|(i, _)| {
            let pos = (*i + 1) as f64;
            pos >= start && pos < end
        })
        .map(|(_, c)| *c)
        .collect();
    Ok(XPathValue::String(result))
}

fn func_translate<'a, N: XPathNode<'a>>(
    name: &str,
    args: Vec<XPathValue<N>>,
) -> Result<XPathValue<N>, XPathError> {
    arity(name, &args, 3, 3)?;
    let from: Vec<char> = args[1].to_string().chars().collect();
    let to: Vec<char> = args[2].to_string().chars().collect();
    let result = args[0]
        .to_string()
        .chars()
        .filter_map(|c| match from.iter().position(|&fc| fc == c) {
            Some(pos) => to.get(pos).copied(),
            None => Some(c),
        })
        .collect();
    Ok(XPathValue::String(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::mock::{MockNode, create_test_tree};

    fn call<'t>(name: &str, args: Vec<XPathValue<MockNode<'t>>>, ctx: MockNode<'t>) -> XPathValue<MockNode<'t>> {
        let e_ctx = EvaluationContext::new(ctx, ctx);
        evaluate_function(name, args, &e_ctx).unwrap()
    }

    fn s<'t>(v: &str) -> XPathValue<MockNode<'t>> {
        XPathValue::String(v.to_string())
    }

    #[test]
    fn test_string_functions() {
        let tree = create_test_tree();
        let ctx = tree.node(2);
        assert_eq!(call("concat", vec![s("a"), s("b"), s("c")], ctx).to_string(), "abc");
        assert!(call("starts-with", vec![s("button primary"), s("button")], ctx).to_bool());
        assert_eq!(call("substring-after", vec![s("a:b"), s(":")], ctx).to_string(), "b");
        assert_eq!(
            call("substring", vec![s("12345"), XPathValue::Number(2.0), XPathValue::Number(3.0)], ctx)
                .to_string(),
            "234"
        );
        assert_eq!(
            call("normalize-space", vec![s("  a \n  b ")], ctx).to_string(),
            "a b"
        );
        assert_eq!(call("translate", vec![s("bar"), s("abc"), s("AB")], ctx).to_string(), "BAr");
    }

    #[test]
    fn test_context_defaults() {
        let tree = create_test_tree();
        let para = tree.node(2);
        assert_eq!(call("string-length", vec![], para).to_number(), 5.0);
        assert_eq!(call("local-name", vec![], para).to_string(), "para");
        let lang = XPathValue::NodeSet(vec![tree.node(4)]);
        assert_eq!(call("name", vec![lang.clone()], para).to_string(), "xml:lang");
        assert_eq!(call("local-name", vec![lang], para).to_string(), "lang");
    }

    #[test]
    fn test_number_functions() {
        let tree = create_test_tree();
        let ctx = tree.node(0);
        assert_eq!(call("round", vec![XPathValue::Number(2.5)], ctx).to_number(), 3.0);
        assert_eq!(call("floor", vec![XPathValue::Number(2.7)], ctx).to_number(), 2.0);
        assert!(call("number", vec![s("abc")], ctx).to_number().is_nan());
    }

    #[test]
    fn test_arity_and_unknown_errors() {
        let tree = create_test_tree();
        let e_ctx = EvaluationContext::new(tree.node(0), tree.node(0));
        let err = evaluate_function("not", vec![], &e_ctx).unwrap_err();
        assert!(matches!(err, XPathError::FunctionError { .. }));
        let err = evaluate_function("unknown-fn", vec![], &e_ctx).unwrap_err();
        assert!(err.to_string().contains("unknown-fn"));
    }
}
