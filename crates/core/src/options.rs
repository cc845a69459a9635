//! Declarative formatter settings, loadable from JSON.

use crate::annotation::Layout;
use crate::config::FormatterBuilder;
use crate::css::{declaration_count_at_least, wrap_css_declarations};
use crate::error::ConfigError;
use crate::flavor::Flavor;
use crate::predicate::{AttributeRule, Predicate, any_of, matches_xpath, tag_in};
use crate::presets;
use serde::{Deserialize, Serialize};

/// Elements a rule applies to: any listed tag name, or any element an expression selects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleOptions {
    pub tags: Vec<String>,
    pub xpath: Vec<String>,
}

impl RuleOptions {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.xpath.is_empty()
    }

    fn to_predicate(&self) -> Result<Predicate, ConfigError> {
        let mut predicates = Vec::with_capacity(self.xpath.len() + 1);
        if !self.tags.is_empty() {
            predicates.push(tag_in(&self.tags)?);
        }
        for expression in &self.xpath {
            predicates.push(matches_xpath(expression)?);
        }
        Ok(any_of(predicates))
    }
}

/// Formatter settings as plain data.
///
/// Starts from the preset for `flavor`; every rule given here replaces the preset's rule for
/// that axis.
///
/// ```json
/// { "flavor": "html5", "indent_size": 4, "preserve_whitespace": { "tags": ["pre"] } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatOptions {
    pub flavor: Flavor,
    pub indent_size: Option<usize>,
    pub default_layout: Option<Layout>,
    pub block: RuleOptions,
    pub inline: RuleOptions,
    pub normalize_whitespace: RuleOptions,
    pub preserve_whitespace: RuleOptions,
    pub wrap_attributes: RuleOptions,
    pub xml_declaration: bool,
    pub doctype: Option<String>,
    /// Wraps `style` values with more declarations than this.
    pub wrap_css_over: Option<usize>,
}

impl FormatOptions {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn into_builder(self) -> Result<FormatterBuilder, ConfigError> {
        let mut builder = match self.flavor {
            Flavor::Xml => presets::xml(),
            Flavor::Html5 => presets::html5(),
            Flavor::Xhtml => presets::xhtml(),
        };
        if let Some(size) = self.indent_size {
            builder = builder.with_indent_size(size);
        }
        if let Some(layout) = self.default_layout {
            builder = builder.with_default_layout(layout);
        }
        if !self.block.is_empty() {
            builder = builder.with_block_rule(self.block.to_predicate()?);
        }
        if !self.inline.is_empty() {
            builder = builder.with_inline_rule(self.inline.to_predicate()?);
        }
        if !self.normalize_whitespace.is_empty() {
            builder = builder.with_normalize_whitespace_rule(self.normalize_whitespace.to_predicate()?);
        }
        if !self.preserve_whitespace.is_empty() {
            builder = builder.with_preserve_whitespace_rule(self.preserve_whitespace.to_predicate()?);
        }
        if !self.wrap_attributes.is_empty() {
            builder = builder.with_wrap_attributes_rule(self.wrap_attributes.to_predicate()?);
        }
        builder = builder.with_xml_declaration(self.xml_declaration);
        if let Some(doctype) = &self.doctype {
            builder = builder.with_doctype(doctype);
        }
        if let Some(threshold) = self.wrap_css_over {
            let limit = threshold
                .checked_add(1)
                .ok_or_else(|| ConfigError::InvalidOption(format!("wrap_css_over {}", threshold)))?;
            builder = builder.with_attribute_formatter(
                AttributeRule::named("style").with_value(declaration_count_at_least(limit)),
                wrap_css_declarations(threshold),
            );
        }
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markfmt_dom::parse_xml;

    #[test]
    fn test_options_from_json() {
        let options = FormatOptions::from_json(
            r#"{
                "indent_size": 4,
                "inline": { "tags": ["em"] },
                "preserve_whitespace": { "xpath": ["//code"] },
                "wrap_css_over": 1
            }"#,
        )
        .unwrap();
        assert_eq!(options.flavor, Flavor::Xml);
        let formatter = options.into_builder().unwrap().build().unwrap();
        let doc = parse_xml(r#"<r><p style="a:1;b:2">x <em>y</em></p><code>  k </code></r>"#).unwrap();
        assert_eq!(
            formatter.format_document(&doc).unwrap(),
            "<r>\n    <p style=\"&#10;        a:1;&#10;        b:2;&#10;    \">x <em>y</em></p>\n    <code>  k </code>\n</r>"
        );
    }

    #[test]
    fn test_unknown_fields_and_bad_rules_are_config_errors() {
        assert!(matches!(
            FormatOptions::from_json(r#"{ "indent": 2 }"#),
            Err(ConfigError::Json(_))
        ));
        let options = FormatOptions::from_json(r#"{ "block": { "tags": ["1bad"] } }"#).unwrap();
        assert!(matches!(options.into_builder(), Err(ConfigError::InvalidTagName(_))));
        let options = FormatOptions::from_json(r#"{ "block": { "xpath": ["//p[@"] } }"#).unwrap();
        assert!(matches!(options.into_builder(), Err(ConfigError::XPath { .. })));
    }

    #[test]
    fn test_json_round_trip_keeps_settings() {
        let options = FormatOptions {
            flavor: Flavor::Html5,
            indent_size: Some(2),
            doctype: Some("<!DOCTYPE html>".to_string()),
            ..Default::default()
        };
        let json = options.to_json().unwrap();
        assert_eq!(FormatOptions::from_json(&json).unwrap(), options);
    }
}
