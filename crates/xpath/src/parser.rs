//! Parses XPath expressions with `nom`.
//!
//! Binary operators are read by precedence climbing over [`BinaryOp::precedence`]. Paths, steps
//! and primary expressions are plain combinators. Every token skips the whitespace before it.

use crate::ast::{Axis, BinaryOp, Expr, NodeTest, Path, PathStart, Step};
use crate::error::XPathError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit0, digit1, multispace0, satisfy},
    combinator::{map, map_opt, map_res, not, opt, peek, recognize, value},
    error::{ErrorKind, ParseError},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated},
};

type Error<'a> = nom::error::Error<&'a str>;
type Res<'a, T> = IResult<&'a str, T>;

pub fn parse_expression(input: &str) -> Result<Expr, XPathError> {
    let failed = |reason: String| XPathError::Parse(input.to_string(), reason);
    match expr(input) {
        Ok((rest, parsed)) if rest.trim().is_empty() => Ok(parsed),
        Ok((rest, _)) => Err(failed(format!("unexpected '{}'", rest.trim()))),
        Err(e) => Err(failed(e.to_string())),
    }
}

fn token<'a, O>(
    inner: impl Parser<&'a str, Output = O, Error = Error<'a>>,
) -> impl Parser<&'a str, Output = O, Error = Error<'a>> {
    preceded(multispace0, inner)
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// An operator spelled as a word. `andover` is a name, not `and` followed by `over`.
fn word<'a>(w: &'static str) -> impl Parser<&'a str, Output = &'a str, Error = Error<'a>> {
    terminated(tag(w), not(peek(satisfy(is_name_char))))
}

fn expr(input: &str) -> Res<'_, Expr> {
    binary(input, 1)
}

fn binary_op(input: &str) -> Res<'_, BinaryOp> {
    token(alt((
        value(BinaryOp::Or, word("or")),
        value(BinaryOp::And, word("and")),
        value(BinaryOp::Ne, tag("!=")),
        value(BinaryOp::Eq, tag("=")),
        value(BinaryOp::Le, tag("<=")),
        value(BinaryOp::Ge, tag(">=")),
        value(BinaryOp::Lt, tag("<")),
        value(BinaryOp::Gt, tag(">")),
        value(BinaryOp::Add, tag("+")),
        value(BinaryOp::Sub, tag("-")),
        value(BinaryOp::Mul, tag("*")),
        value(BinaryOp::Div, word("div")),
        value(BinaryOp::Mod, word("mod")),
    )))
    .parse(input)
}

/// Operands joined by operators binding at least as tightly as `min`.
fn binary(input: &str, min: u8) -> Res<'_, Expr> {
    let (mut rest, mut left) = unary(input)?;
    while let Ok((after_op, op)) = binary_op(rest) {
        let level = op.precedence();
        if level < min {
            break;
        }
        let (after_right, right) = binary(after_op, level + 1)?;
        left = Expr::binary(left, op, right);
        rest = after_right;
    }
    Ok((rest, left))
}

fn unary(input: &str) -> Res<'_, Expr> {
    alt((
        map(preceded(token(char('-')), unary), |e| Expr::Negate(Box::new(e))),
        union,
    ))
    .parse(input)
}

fn union(input: &str) -> Res<'_, Expr> {
    let (mut rest, mut left) = path_expr(input)?;
    while let Ok((after, right)) = preceded(token(char('|')), path_expr).parse(rest) {
        left = Expr::binary(left, BinaryOp::Union, right);
        rest = after;
    }
    Ok((rest, left))
}

/// A location path, or a primary expression that further steps may continue: `(//a)/b`.
fn path_expr(input: &str) -> Res<'_, Expr> {
    if let Ok((rest, filter)) = token(primary).parse(input) {
        let (rest, more) = many0(pair(separator, token(step))).parse(rest)?;
        if more.is_empty() {
            return Ok((rest, filter));
        }
        let mut steps = Vec::new();
        append_steps(&mut steps, more);
        let start = PathStart::Filter(Box::new(filter));
        return Ok((rest, Expr::Path(Path { start, steps })));
    }
    map(token(location_path), Expr::Path).parse(input)
}

/// `/` or `//`. True for `//`.
fn separator(input: &str) -> Res<'_, bool> {
    token(alt((value(true, tag("//")), value(false, tag("/"))))).parse(input)
}

/// `//` stands for an extra `descendant-or-self::node()` step.
fn append_steps(steps: &mut Vec<Step>, more: Vec<(bool, Step)>) {
    for (descendant, step) in more {
        if descendant {
            steps.push(Step::new(Axis::DescendantOrSelf, NodeTest::AnyNode));
        }
        steps.push(step);
    }
}

fn location_path(input: &str) -> Res<'_, Path> {
    let (rest, leading) = opt(separator).parse(input)?;
    let mut steps = Vec::new();
    let rest = match (leading, token(step).parse(rest)) {
        (Some(descendant), Ok((after, first))) => {
            append_steps(&mut steps, vec![(descendant, first)]);
            after
        }
        (None, Ok((after, first))) => {
            steps.push(first);
            after
        }
        // A lone `/` selects the document node.
        (Some(false), Err(_)) => rest,
        (_, Err(e)) => return Err(e),
    };
    let (rest, more) = many0(pair(separator, token(step))).parse(rest)?;
    append_steps(&mut steps, more);
    let start = match leading {
        Some(_) => PathStart::Root,
        None => PathStart::Context,
    };
    Ok((rest, Path { start, steps }))
}

fn step(input: &str) -> Res<'_, Step> {
    let mut abbreviated = alt((
        value(Axis::Parent, tag::<_, _, Error<'_>>("..")),
        value(
            Axis::SelfAxis,
            terminated(char('.'), not(peek(satisfy(|c: char| c.is_ascii_digit())))),
        ),
    ));
    if let Ok((rest, axis)) = abbreviated.parse(input) {
        return Ok((rest, Step::new(axis, NodeTest::AnyNode)));
    }
    let (rest, axis) = axis_specifier(input)?;
    let (rest, test) = node_test(rest)?;
    let (rest, predicates) = many0(delimited(token(char('[')), expr, token(char(']')))).parse(rest)?;
    Ok((
        rest,
        Step {
            axis,
            test,
            predicates,
        },
    ))
}

/// `@`, `axis-name::`, or nothing for the child axis.
fn axis_specifier(input: &str) -> Res<'_, Axis> {
    let named = map_opt(
        terminated(
            take_while1(|c: char| c.is_ascii_lowercase() || c == '-'),
            tag::<_, _, Error<'_>>("::"),
        ),
        Axis::from_name,
    );
    alt((value(Axis::Attribute, char('@')), named))
        .parse(input)
        .or(Ok((input, Axis::Child)))
}

fn node_test(input: &str) -> Res<'_, NodeTest> {
    alt((
        value(NodeTest::AnyName, char('*')),
        map_opt(
            terminated(q_name, pair(token(char('(')), token(char(')')))),
            NodeTest::from_type_name,
        ),
        map(q_name, |name: &str| NodeTest::Name(name.to_string())),
    ))
    .parse(input)
}

fn nc_name(input: &str) -> Res<'_, &str> {
    recognize(pair(satisfy(is_name_start), take_while(is_name_char))).parse(input)
}

fn q_name(input: &str) -> Res<'_, &str> {
    recognize(pair(nc_name, opt(pair(char(':'), nc_name)))).parse(input)
}

fn primary(input: &str) -> Res<'_, Expr> {
    alt((
        map(number, Expr::Number),
        map(literal, Expr::Literal),
        call,
        delimited(char('('), expr, token(char(')'))),
    ))
    .parse(input)
}

fn number(input: &str) -> Res<'_, f64> {
    let digits = alt((
        recognize(pair(digit1, opt(pair(char('.'), digit0)))),
        recognize(pair(char('.'), digit1)),
    ));
    map_res(digits, |s: &str| s.parse::<f64>()).parse(input)
}

fn quoted<'a>(quote: char) -> impl Parser<&'a str, Output = &'a str, Error = Error<'a>> {
    delimited(char(quote), take_while(move |c: char| c != quote), char(quote))
}

fn literal(input: &str) -> Res<'_, String> {
    map(alt((quoted('\''), quoted('"'))), str::to_string).parse(input)
}

fn call(input: &str) -> Res<'_, Expr> {
    let (rest, name) = q_name(input)?;
    // `text()` and friends are node tests, read as steps.
    if NodeTest::from_type_name(name).is_some() {
        return Err(nom::Err::Error(Error::from_error_kind(input, ErrorKind::Verify)));
    }
    let arguments = separated_list0(token(char(',')), expr);
    let (rest, args) = delimited(token(char('(')), arguments, token(char(')'))).parse(rest)?;
    Ok((rest, Expr::Call(name.to_string(), args)))
}
