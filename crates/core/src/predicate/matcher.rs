use crate::error::ConfigError;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// A test over an attribute name or value.
#[derive(Clone)]
pub enum Matcher {
    Exact(String),
    /// Unanchored; use `^...$` to match the whole string.
    Pattern(Regex),
    Func(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl Matcher {
    pub fn exact(value: impl Into<String>) -> Self {
        Matcher::Exact(value.into())
    }

    pub fn pattern(pattern: &str) -> Result<Self, ConfigError> {
        Ok(Matcher::Pattern(Regex::new(pattern)?))
    }

    pub fn func(f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Matcher::Func(Arc::new(f))
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Matcher::Exact(expected) => expected == candidate,
            Matcher::Pattern(re) => re.is_match(candidate),
            Matcher::Func(f) => f(candidate),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Exact(s) => f.debug_tuple("Exact").field(s).finish(),
            Matcher::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Matcher::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl From<&str> for Matcher {
    fn from(value: &str) -> Self {
        Matcher::exact(value)
    }
}

impl From<String> for Matcher {
    fn from(value: String) -> Self {
        Matcher::Exact(value)
    }
}

impl From<Regex> for Matcher {
    fn from(re: Regex) -> Self {
        Matcher::Pattern(re)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matcher_variants() {
        assert!(Matcher::from("style").matches("style"));
        assert!(!Matcher::from("style").matches("styles"));
        let css = Matcher::pattern(r"\.css$").unwrap();
        assert!(css.matches("theme.css"));
        assert!(!css.matches("theme.js"));
        let long = Matcher::func(|v| v.len() > 3);
        assert!(long.matches("abcd"));
        assert_eq!(format!("{:?}", long), "Func(..)");
    }

    #[test]
    fn test_invalid_pattern_is_a_config_error() {
        assert!(matches!(Matcher::pattern("(unclosed"), Err(ConfigError::Regex(_))));
    }
}
