//! Rules over an element's own name and attributes.

use super::{Matcher, Predicate, PreparedRule, Rule};
use crate::error::{ConfigError, FormatError};
use markfmt_dom::Document;
use markfmt_dom::document::validate_name;

fn check_tag(name: &str) -> Result<(), ConfigError> {
    validate_name(name).map_err(|_| ConfigError::InvalidTagName(name.to_string()))
}

fn check_attribute(name: &str) -> Result<(), ConfigError> {
    validate_name(name).map_err(|_| ConfigError::InvalidAttributeName(name.to_string()))
}

#[derive(Debug)]
pub(super) struct TagIn {
    pub(super) names: Vec<String>,
    pub(super) ignore_case: bool,
}

impl TagIn {
    fn contains(&self, name: &str) -> bool {
        if self.ignore_case {
            self.names.iter().any(|n| n.eq_ignore_ascii_case(name))
        } else {
            self.names.iter().any(|n| n == name)
        }
    }
}

impl Rule for TagIn {
    fn prepare(&self, doc: &Document) -> Result<PreparedRule, FormatError> {
        Ok(PreparedRule::collect_elements(doc, |id| {
            doc.name(id).is_some_and(|name| self.contains(name))
        }))
    }
}

/// Matches elements with exactly this qualified name.
pub fn tag_equals(name: &str) -> Result<Predicate, ConfigError> {
    tag_in([name])
}

/// Matches elements whose qualified name is in `names`.
pub fn tag_in<I, S>(names: I) -> Result<Predicate, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let names: Vec<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();
    if names.is_empty() {
        return Err(ConfigError::EmptyTagList("tag_in"));
    }
    for name in &names {
        check_tag(name)?;
    }
    Ok(Predicate::new(TagIn {
        names,
        ignore_case: false,
    }))
}

#[derive(Debug)]
struct AttributeTest {
    name: Matcher,
    value: Option<Matcher>,
}

impl Rule for AttributeTest {
    fn prepare(&self, doc: &Document) -> Result<PreparedRule, FormatError> {
        Ok(PreparedRule::collect_elements(doc, |id| {
            doc.attributes(id).iter().any(|a| {
                self.name.matches(&a.name) && self.value.as_ref().is_none_or(|v| v.matches(&a.value))
            })
        }))
    }
}

pub(super) fn attribute_test(name: Matcher, value: Option<Matcher>) -> Predicate {
    Predicate::new(AttributeTest { name, value })
}

/// Matches elements carrying the attribute `name`, whatever its value.
pub fn has_attribute(name: &str) -> Result<Predicate, ConfigError> {
    check_attribute(name)?;
    Ok(attribute_test(Matcher::exact(name), None))
}

pub fn attribute_equals(name: &str, value: &str) -> Result<Predicate, ConfigError> {
    check_attribute(name)?;
    Ok(attribute_test(Matcher::exact(name), Some(Matcher::exact(value))))
}

/// Matches elements with an attribute `name` whose value satisfies `value`.
pub fn attribute_matches(name: &str, value: impl Into<Matcher>) -> Result<Predicate, ConfigError> {
    check_attribute(name)?;
    Ok(attribute_test(Matcher::exact(name), Some(value.into())))
}

#[derive(Debug)]
struct HasClass(String);

impl Rule for HasClass {
    fn prepare(&self, doc: &Document) -> Result<PreparedRule, FormatError> {
        Ok(PreparedRule::collect_elements(doc, |id| {
            doc.attribute(id, "class")
                .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == self.0))
        }))
    }
}

/// Matches elements whose whitespace-separated `class` list contains `class`.
pub fn has_class(class: &str) -> Result<Predicate, ConfigError> {
    if class.is_empty() || class.contains(|c: char| c.is_ascii_whitespace()) {
        return Err(ConfigError::InvalidOption(format!(
            "class name {:?} must be a single non-empty token",
            class
        )));
    }
    Ok(Predicate::new(HasClass(class.to_string())))
}

#[derive(Debug)]
struct AttributeCount {
    min: usize,
    max: usize,
}

impl Rule for AttributeCount {
    fn prepare(&self, doc: &Document) -> Result<PreparedRule, FormatError> {
        Ok(PreparedRule::collect_elements(doc, |id| {
            (self.min..=self.max).contains(&doc.attributes(id).len())
        }))
    }
}

pub fn attribute_count_min(min: usize) -> Predicate {
    Predicate::new(AttributeCount {
        min,
        max: usize::MAX,
    })
}

pub fn attribute_count_max(max: usize) -> Predicate {
    Predicate::new(AttributeCount { min: 0, max })
}

/// Matches elements with between `min` and `max` attributes, inclusive.
pub fn attribute_count_between(min: usize, max: usize) -> Result<Predicate, ConfigError> {
    if min > max {
        return Err(ConfigError::InvalidRange { min, max });
    }
    Ok(Predicate::new(AttributeCount { min, max }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::tests::matching;
    use markfmt_dom::parse_xml;

    fn sample() -> Document {
        parse_xml(
            r#"<r><a class="btn primary" id="x"/><b class="btn-lg" href="s.css" rel="x"/><svg:c xmlns:svg="urn:s"/></r>"#,
        )
        .unwrap()
    }

    #[test]
    fn test_tag_rules() {
        let doc = sample();
        assert_eq!(matching(&doc, &tag_in(["a", "svg:c"]).unwrap()), vec!["a", "svg:c"]);
        assert!(matching(&doc, &tag_equals("c").unwrap()).is_empty());
        assert!(matches!(tag_in(Vec::<String>::new()), Err(ConfigError::EmptyTagList(_))));
        assert!(matches!(tag_equals("not valid"), Err(ConfigError::InvalidTagName(_))));
    }

    #[test]
    fn test_class_rules() {
        let doc = sample();
        assert_eq!(matching(&doc, &has_class("btn").unwrap()), vec!["a"]);
        assert_eq!(matching(&doc, &has_class("btn-lg").unwrap()), vec!["b"]);
        assert!(has_class("two words").is_err());
        assert!(has_class("").is_err());
    }

    #[test]
    fn test_attribute_rules() {
        let doc = sample();
        assert_eq!(matching(&doc, &has_attribute("id").unwrap()), vec!["a"]);
        assert_eq!(matching(&doc, &attribute_equals("id", "x").unwrap()), vec!["a"]);
        let css = attribute_matches("href", Matcher::pattern(r"\.css$").unwrap()).unwrap();
        assert_eq!(matching(&doc, &css), vec!["b"]);
        assert!(has_attribute("1bad").is_err());
    }

    #[test]
    fn test_attribute_counts() {
        let doc = sample();
        assert_eq!(matching(&doc, &attribute_count_min(3)), vec!["b"]);
        assert_eq!(matching(&doc, &attribute_count_max(0)), vec!["r"]);
        assert_eq!(matching(&doc, &attribute_count_between(1, 2).unwrap()), vec!["a", "svg:c"]);
        assert!(matches!(
            attribute_count_between(3, 1),
            Err(ConfigError::InvalidRange { min: 3, max: 1 })
        ));
    }
}
