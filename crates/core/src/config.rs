use crate::annotation::Layout;
use crate::classify::{self, PreparedRules};
use crate::error::{BoxError, ConfigError, FormatError};
use crate::flavor::Flavor;
use crate::predicate::{AttributeRule, Predicate, never};
use crate::render;
use log::debug;
use markfmt_dom::Document;
use std::fmt;
use std::sync::Arc;

/// Replaces the leading text of matching elements.
///
/// Called with the raw text, the indent unit, and the element's depth. The result is escaped
/// before it is written. Any closure `Fn(&str, &str, usize) -> Result<String, BoxError>` works.
pub trait TextFormatter: Send + Sync {
    fn format_text(&self, text: &str, indent: &str, depth: usize) -> Result<String, BoxError>;
}

impl<F> TextFormatter for F
where
    F: Fn(&str, &str, usize) -> Result<String, BoxError> + Send + Sync,
{
    fn format_text(&self, text: &str, indent: &str, depth: usize) -> Result<String, BoxError> {
        self(text, indent, depth)
    }
}

/// Rewrites matching attribute values.
///
/// `level` is the element's depth, plus one when its attributes are wrapped onto their own lines.
pub trait AttributeFormatter: Send + Sync {
    fn format_value(&self, value: &str, indent: &str, level: usize) -> Result<String, BoxError>;
}

impl<F> AttributeFormatter for F
where
    F: Fn(&str, &str, usize) -> Result<String, BoxError> + Send + Sync,
{
    fn format_value(&self, value: &str, indent: &str, level: usize) -> Result<String, BoxError> {
        self(value, indent, level)
    }
}

/// The immutable settings a [`Formatter`] applies. Shared by every format call.
#[derive(Clone)]
pub struct FormatterConfig {
    pub(crate) block: Predicate,
    pub(crate) inline: Predicate,
    pub(crate) normalize_whitespace: Predicate,
    pub(crate) preserve_whitespace: Predicate,
    pub(crate) wrap_attributes: Predicate,
    pub(crate) default_layout: Layout,
    pub(crate) indent: String,
    pub(crate) flavor: Flavor,
    pub(crate) text_formatters: Vec<(Predicate, Arc<dyn TextFormatter>)>,
    pub(crate) attribute_formatters: Vec<(AttributeRule, Arc<dyn AttributeFormatter>)>,
    pub(crate) xml_declaration: bool,
    /// Body of the doctype that replaces the document's own.
    pub(crate) doctype: Option<String>,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            block: never(),
            inline: never(),
            normalize_whitespace: never(),
            preserve_whitespace: never(),
            wrap_attributes: never(),
            default_layout: Layout::Block,
            indent: "  ".to_string(),
            flavor: Flavor::Xml,
            text_formatters: Vec::new(),
            attribute_formatters: Vec::new(),
            xml_declaration: false,
            doctype: None,
        }
    }
}

impl FormatterConfig {
    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    pub fn indent_unit(&self) -> &str {
        &self.indent
    }

    pub fn default_layout(&self) -> Layout {
        self.default_layout
    }
}

impl fmt::Debug for FormatterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatterConfig")
            .field("block", &self.block)
            .field("inline", &self.inline)
            .field("normalize_whitespace", &self.normalize_whitespace)
            .field("preserve_whitespace", &self.preserve_whitespace)
            .field("wrap_attributes", &self.wrap_attributes)
            .field("default_layout", &self.default_layout)
            .field("indent", &self.indent)
            .field("flavor", &self.flavor)
            .field("text_formatters", &self.text_formatters.len())
            .field("attribute_formatters", &self.attribute_formatters.len())
            .field("xml_declaration", &self.xml_declaration)
            .field("doctype", &self.doctype)
            .finish()
    }
}

/// A builder for creating a [`Formatter`].
#[derive(Debug, Clone, Default)]
pub struct FormatterBuilder {
    config: FormatterConfig,
}

impl FormatterBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Elements matching this rule are laid out as blocks. Takes precedence over the inline rule.
    pub fn with_block_rule(mut self, rule: Predicate) -> Self {
        self.config.block = rule;
        self
    }

    pub fn with_inline_rule(mut self, rule: Predicate) -> Self {
        self.config.inline = rule;
        self
    }

    pub fn with_normalize_whitespace_rule(mut self, rule: Predicate) -> Self {
        self.config.normalize_whitespace = rule;
        self
    }

    /// Matching elements and their whole subtree keep their text verbatim.
    pub fn with_preserve_whitespace_rule(mut self, rule: Predicate) -> Self {
        self.config.preserve_whitespace = rule;
        self
    }

    pub fn with_wrap_attributes_rule(mut self, rule: Predicate) -> Self {
        self.config.wrap_attributes = rule;
        self
    }

    /// Layout for elements no rule or context decides.
    pub fn with_default_layout(mut self, layout: Layout) -> Self {
        self.config.default_layout = layout;
        self
    }

    pub fn with_indent_size(mut self, spaces: usize) -> Self {
        self.config.indent = " ".repeat(spaces);
        self
    }

    /// Sets the string written once per indentation level. Checked by `build`.
    pub fn with_indent_unit(mut self, unit: &str) -> Self {
        self.config.indent = unit.to_string();
        self
    }

    /// Adds a text formatter. Rules are tried in the order they were added.
    pub fn with_text_formatter(mut self, rule: Predicate, formatter: impl TextFormatter + 'static) -> Self {
        self.config.text_formatters.push((rule, Arc::new(formatter)));
        self
    }

    /// Adds an attribute formatter. Rules are tried in the order they were added.
    pub fn with_attribute_formatter(
        mut self,
        rule: AttributeRule,
        formatter: impl AttributeFormatter + 'static,
    ) -> Self {
        self.config.attribute_formatters.push((rule, Arc::new(formatter)));
        self
    }

    pub fn with_flavor(mut self, flavor: Flavor) -> Self {
        self.config.flavor = flavor;
        self
    }

    pub fn with_xml_declaration(mut self, enabled: bool) -> Self {
        self.config.xml_declaration = enabled;
        self
    }

    /// Replaces the document's doctype with `doctype`, a full `<!DOCTYPE ...>` declaration.
    /// Checked by `build`.
    pub fn with_doctype(mut self, doctype: &str) -> Self {
        self.config.doctype = Some(doctype.to_string());
        self
    }

    pub fn build(mut self) -> Result<Formatter, ConfigError> {
        if !self.config.indent.chars().all(|c| c == ' ' || c == '\t') {
            return Err(ConfigError::InvalidIndent(self.config.indent));
        }
        if let Some(doctype) = self.config.doctype.take() {
            self.config.doctype = Some(doctype_body(&doctype)?);
        }
        debug!(
            "Built {:?} formatter with indent {:?}",
            self.config.flavor, self.config.indent
        );
        Ok(Formatter {
            config: Arc::new(self.config),
        })
    }
}

/// Accepts `<!DOCTYPE body>`, or an already extracted body, and returns the body.
fn doctype_body(doctype: &str) -> Result<String, ConfigError> {
    let invalid = || ConfigError::InvalidDoctype(doctype.to_string());
    let trimmed = doctype.trim();
    let body = match trimmed.get(..9) {
        Some(keyword) if keyword.eq_ignore_ascii_case("<!DOCTYPE") => {
            trimmed[9..].strip_suffix('>').ok_or_else(invalid)?.trim()
        }
        _ if !trimmed.starts_with('<') => trimmed,
        _ => return Err(invalid()),
    };
    if body.is_empty() || (body.contains(['<', '>']) && !body.contains('[')) {
        return Err(invalid());
    }
    Ok(body.to_string())
}

/// Formats documents with one immutable configuration.
///
/// Cloning is cheap and a formatter may be used from several threads at once: all per-document
/// state is built inside [`Formatter::format_document`] and dropped when it returns.
#[derive(Debug, Clone)]
pub struct Formatter {
    config: Arc<FormatterConfig>,
}

impl Formatter {
    pub fn builder() -> FormatterBuilder {
        FormatterBuilder::new()
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    /// A builder holding this formatter's configuration, for making a modified copy.
    pub fn derive(&self) -> FormatterBuilder {
        FormatterBuilder {
            config: (*self.config).clone(),
        }
    }

    /// Renders `doc`. Either the whole document is returned or nothing is.
    pub fn format_document(&self, doc: &Document) -> Result<String, FormatError> {
        let rules = PreparedRules::prepare(&self.config, doc)?;
        let store = classify::annotate(doc, &self.config, &rules)?;
        render::render_document(doc, &self.config, &store)
    }
}
