//! Attribute formatting for inline CSS.

use crate::config::AttributeFormatter;
use crate::error::BoxError;
use crate::predicate::Matcher;

fn declarations(value: &str) -> impl Iterator<Item = &str> {
    value.split(';').map(str::trim).filter(|d| !d.is_empty())
}

/// Number of non-empty `;`-separated declarations in `value`.
pub fn declaration_count(value: &str) -> usize {
    declarations(value).count()
}

/// Matches values with at least `n` declarations.
pub fn declaration_count_at_least(n: usize) -> Matcher {
    Matcher::func(move |value| declaration_count(value) >= n)
}

/// Puts each declaration of a `style` value on its own line.
///
/// Values with no more than `when_more_than` declarations are left as they are.
#[derive(Debug, Clone, Copy)]
pub struct WrapCssDeclarations {
    when_more_than: usize,
}

pub fn wrap_css_declarations(when_more_than: usize) -> WrapCssDeclarations {
    WrapCssDeclarations { when_more_than }
}

impl AttributeFormatter for WrapCssDeclarations {
    fn format_value(&self, value: &str, indent: &str, level: usize) -> Result<String, BoxError> {
        if declaration_count(value) <= self.when_more_than {
            return Ok(value.to_string());
        }
        let inner = indent.repeat(level + 1);
        let mut out = String::with_capacity(value.len() * 2);
        for declaration in declarations(value) {
            out.push('\n');
            out.push_str(&inner);
            out.push_str(declaration);
            out.push(';');
        }
        out.push('\n');
        out.push_str(&indent.repeat(level));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_ignores_empty_declarations() {
        assert_eq!(declaration_count("color: red; ; margin: 0;"), 2);
        assert_eq!(declaration_count(""), 0);
        assert!(declaration_count_at_least(2).matches("a:1;b:2"));
        assert!(!declaration_count_at_least(2).matches("a:1;"));
    }

    #[test]
    fn test_wrap_above_threshold() {
        let wrap = wrap_css_declarations(1);
        assert_eq!(wrap.format_value("color: red", "  ", 1).unwrap(), "color: red");
        assert_eq!(
            wrap.format_value("color: red;margin:0", "  ", 1).unwrap(),
            "\n    color: red;\n    margin:0;\n  "
        );
    }

    #[test]
    fn test_wrapping_is_stable() {
        let wrap = wrap_css_declarations(0);
        let once = wrap.format_value("a: 1; b: 2", "\t", 0).unwrap();
        assert_eq!(wrap.format_value(&once, "\t", 0).unwrap(), once);
    }
}
