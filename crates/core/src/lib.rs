//! # markfmt-core
//!
//! The formatting engine. A format call runs in three phases:
//! - **prepare**: every configured rule is prepared against the document once
//! - **classify**: each node gets an [`Annotation`] (layout, whitespace mode, depth, tag style)
//! - **render**: the annotated tree is written into a single string
//!
//! Nothing is written until classification succeeds, and nothing is returned unless rendering
//! succeeds.
//!
//! ```ignore
//! use markfmt_core::{presets, predicate::tag_equals};
//!
//! let formatter = presets::xml()
//!     .with_inline_rule(tag_equals("em")?)
//!     .build()?;
//! let output = formatter.format_document(&doc)?;
//! ```

pub mod annotation;
mod classify;
pub mod closing;
pub mod config;
pub mod css;
pub mod error;
pub mod escape;
pub mod flavor;
pub mod options;
pub mod predicate;
pub mod presets;
mod render;
pub mod whitespace;

pub use annotation::{Annotation, AnnotationStore, Layout, WhitespaceMode};
pub use closing::{ClosingTable, TagStyle};
pub use config::{AttributeFormatter, Formatter, FormatterBuilder, FormatterConfig, TextFormatter};
pub use error::{BoxError, ConfigError, FormatError};
pub use flavor::Flavor;
pub use options::{FormatOptions, RuleOptions};
pub use predicate::{AttributeRule, Matcher, Predicate};
pub use render::XML_DECLARATION;
