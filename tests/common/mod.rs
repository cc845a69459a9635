#![allow(dead_code)]

pub mod fixtures;

use markfmt::{Formatter, FormatterBuilder, MarkfmtError, format_str, format_xml_str};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Builds `builder` and formats `input` with it, reading the input as XML whatever the flavor.
pub fn format_with(builder: FormatterBuilder, input: &str) -> Result<String, MarkfmtError> {
    let formatter = builder.build()?;
    format_xml_str(input, &formatter)
}

/// Formats `input`, then formats the result again with the same formatter. Both passes read
/// with the flavor's own reader, so HTML5 output is read back as HTML.
pub fn format_twice(formatter: &Formatter, input: &str) -> Result<(String, String), MarkfmtError> {
    let once = format_str(input, formatter)?;
    let twice = format_str(&once, formatter)?;
    Ok((once, twice))
}

/// The text between the first `open` and the following `close`.
pub fn between<'a>(text: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let start = text.find(open)? + open.len();
    let len = text[start..].find(close)?;
    Some(&text[start..start + len])
}
