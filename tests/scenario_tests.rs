mod common;

use common::fixtures::CONFIGURATION;
use common::{TestResult, format_with};
use markfmt::css::{declaration_count_at_least, wrap_css_declarations};
use markfmt::predicate::{tag_equals, tag_in};
use markfmt::{AttributeRule, Flavor, FormatterBuilder, presets};

#[test]
fn test_nested_configuration_is_indented() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let output = format_with(presets::xml(), CONFIGURATION)?;
    assert_eq!(
        output,
        "<configuration>\n  <database>\n    <host>localhost</host>\n    <port>5432</port>\n  </database>\n</configuration>"
    );
    Ok(())
}

#[test]
fn test_empty_xml_element_self_closes() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let output = format_with(
        presets::xml(),
        r#"<feature name="caching" enabled="false"></feature>"#,
    )?;
    assert_eq!(output, r#"<feature name="caching" enabled="false" />"#);
    Ok(())
}

#[test]
fn test_inline_child_stays_on_the_line() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let builder = FormatterBuilder::new()
        .with_block_rule(tag_equals("p")?)
        .with_inline_rule(tag_equals("em")?)
        .with_normalize_whitespace_rule(tag_equals("p")?);
    let output = format_with(builder, "<p>Hello <em>world</em>!</p>")?;
    assert_eq!(output, "<p>Hello <em>world</em>!</p>");
    Ok(())
}

#[test]
fn test_preserved_text_is_byte_identical() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let builder = FormatterBuilder::new().with_preserve_whitespace_rule(tag_equals("pre")?);
    let output = format_with(builder.clone(), "<pre>    line one\n    line two\n</pre>")?;
    assert_eq!(output, "<pre>    line one\n    line two\n</pre>");

    let nested = format_with(builder, "<doc><pre>    line one\n    line two\n</pre></doc>")?;
    assert_eq!(nested, "<doc>\n  <pre>    line one\n    line two\n</pre>\n</doc>");
    Ok(())
}

#[test]
fn test_style_threshold_is_decided_by_the_rule() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let builder = FormatterBuilder::new().with_flavor(Flavor::Html5).with_attribute_formatter(
        AttributeRule::named("style").with_value(declaration_count_at_least(4)),
        wrap_css_declarations(0),
    );
    let input = r#"<div style="color: red; margin: 0; padding: 1px; border: none"><span style="color: blue"/></div>"#;
    let output = format_with(builder, input)?;
    assert_eq!(
        output,
        "<!DOCTYPE html>\n<div style=\"\n  color: red;\n  margin: 0;\n  padding: 1px;\n  border: none;\n\">\n  <span style=\"color: blue\"></span>\n</div>"
    );
    Ok(())
}

#[test]
fn test_xml_flavor_encodes_wrapped_style_newlines() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let builder = FormatterBuilder::new().with_attribute_formatter(
        AttributeRule::named("style").with_value(declaration_count_at_least(2)),
        wrap_css_declarations(1),
    );
    let output = format_with(builder, r#"<r><s style="a: 1; b: 2"/></r>"#)?;
    assert_eq!(
        output,
        "<r>\n  <s style=\"&#10;    a: 1;&#10;    b: 2;&#10;  \" />\n</r>"
    );
    Ok(())
}

#[test]
fn test_block_rule_wins_when_both_rules_match() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let builder = FormatterBuilder::new()
        .with_block_rule(tag_equals("item")?)
        .with_inline_rule(tag_in(["item", "tag"])?);
    let output = format_with(builder, "<list><item>a</item><item>b</item></list>")?;
    assert_eq!(output, "<list>\n  <item>a</item>\n  <item>b</item>\n</list>");
    Ok(())
}
