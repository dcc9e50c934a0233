//! Construction-time failures. Once a viewer exists, nothing it does can fail.

use crate::host::ElementId;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ViewerError {
    /// A required host element could not be found.
    #[error("required element '{element}' not found in host")]
    MissingElement { element: ElementId },

    /// A configuration value is out of range or unrecognized.
    #[error("invalid viewer config: {0}")]
    InvalidConfig(String),
}

impl ViewerError {
    /// Stable machine-readable code for the error.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingElement { .. } => "E_MISSING_ELEMENT",
            Self::InvalidConfig(_) => "E_INVALID_CONFIG",
        }
    }
}
