//! Errors returned by generated client methods.

use thiserror::Error;

use super::HtmlError;

/// Errors from a generated client call.
///
/// Every fallible step of a generated method maps onto one of these
/// variants; the generated code converts them into the error type declared
/// on the trait method with `?`. Nothing is retried.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Building, sending or reading the HTTP exchange failed.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Reading a stream parameter or opening a local file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON marshalling or unmarshalling failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML marshalling failed.
    #[error("XML encode error: {0}")]
    XmlEncode(#[from] quick_xml::SeError),

    /// XML unmarshalling failed.
    #[error("XML decode error: {0}")]
    XmlDecode(#[from] quick_xml::DeError),

    /// HTML decoding failed.
    #[error("HTML decode error: {0}")]
    Html(#[from] HtmlError),

    /// A header or cookie name/value is not valid in an HTTP header.
    #[error("invalid header '{name}': {reason}")]
    InvalidHeader {
        /// The header name.
        name: String,
        /// Why the name or value was rejected.
        reason: String,
    },
}

impl ClientError {
    /// Returns the HTTP status code carried by a transport error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` for marshalling and decoding failures.
    pub fn is_codec_error(&self) -> bool {
        matches!(
            self,
            Self::Json(_) | Self::XmlEncode(_) | Self::XmlDecode(_) | Self::Html(_)
        )
    }
}
