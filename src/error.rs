use markfmt_core::{ConfigError, FormatError};
use markfmt_dom::DomError;
use thiserror::Error;

/// Every failure a caller of this crate can see.
#[derive(Error, Debug)]
pub enum MarkfmtError {
    #[error("Parsing failed: {0}")]
    Parse(#[from] DomError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Formatting failed: {0}")]
    Format(#[from] FormatError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for MarkfmtError {
    fn from(e: serde_json::Error) -> Self {
        MarkfmtError::Config(ConfigError::Json(e))
    }
}
