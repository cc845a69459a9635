//! Error types for configuration and formatting.

use markfmt_xpath::XPathError;
use thiserror::Error;

/// The error type user callbacks report failures with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Raised while building rules, matchers, or a formatter. Never raised by a format call.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid tag name '{0}'")]
    InvalidTagName(String),
    #[error("Invalid attribute name '{0}'")]
    InvalidAttributeName(String),
    #[error("Tag list for {0} must not be empty")]
    EmptyTagList(&'static str),
    #[error("Invalid range: minimum {min} is greater than maximum {max}")]
    InvalidRange { min: usize, max: usize },
    #[error("Invalid XPath expression '{expression}': {source}")]
    XPath {
        expression: String,
        #[source]
        source: XPathError,
    },
    #[error("Invalid regular expression: {0}")]
    Regex(#[from] regex::Error),
    #[error("Invalid indent unit {0:?}: only spaces and tabs are allowed")]
    InvalidIndent(String),
    #[error("Invalid doctype {0:?}: expected '<!DOCTYPE ...>'")]
    InvalidDoctype(String),
    #[error("Invalid option: {0}")]
    InvalidOption(String),
    #[error("Options could not be read: {0}")]
    Json(#[from] serde_json::Error),
}

/// Raised by a format call. A format call that fails produces no output.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("XPath evaluation failed: {0}")]
    XPath(#[from] XPathError),
    #[error("XPath expression '{expression}' selected {kind}, expected elements")]
    NonElementSelection {
        expression: String,
        kind: &'static str,
    },
    #[error("Void element <{0}> has content")]
    VoidElementWithContent(String),
    #[error("Text formatter failed for <{element}>: {source}")]
    TextFormatter {
        element: String,
        #[source]
        source: BoxError,
    },
    #[error("Attribute formatter failed for '{attribute}' on <{element}>: {source}")]
    AttributeFormatter {
        element: String,
        attribute: String,
        #[source]
        source: BoxError,
    },
    #[error("Document has no root element")]
    MissingRoot,
    #[error("Internal invariant violated: {0}")]
    Invariant(String),
}
