//! HTML decoding errors.

use thiserror::Error;

/// Errors raised while filling a value from an HTML document.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// A CSS selector failed to parse.
    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector {
        /// The selector text.
        selector: String,
        /// Parser message.
        reason: String,
    },

    /// A required element was not found.
    #[error("no element matches '{0}'")]
    Missing(String),

    /// Element text could not be converted to the target field.
    #[error("cannot convert '{text}' for '{selector}': {reason}")]
    Conversion {
        selector: String,
        text: String,
        reason: String,
    },
}
