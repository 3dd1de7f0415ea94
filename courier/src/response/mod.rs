//! Response handling for generated clients.
//!
//! Decoding always reads the whole body first ([`read_body`]), then hands
//! the bytes to one of the format decoders.

mod format;
mod html;

use reqwest::blocking::Response;

pub use format::{HtmlFormat, JsonFormat, ResponseFormat, XmlFormat};
pub use html::{FromHtml, select_all_text, select_attr, select_parse, select_text};

use crate::error::ClientError;

/// Reads a response to its end, returning the status code and the body.
pub fn read_body(response: Response) -> Result<(u16, Vec<u8>), ClientError> {
    let status = response.status().as_u16();
    let body = response.bytes()?;
    tracing::debug!(status, len = body.len(), "read response body");
    Ok((status, body.to_vec()))
}

/// Decodes a JSON body.
pub fn json<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, ClientError> {
    JsonFormat::<T>::parse(body)
}

/// Decodes an XML body.
pub fn xml<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, ClientError> {
    XmlFormat::<T>::parse(body)
}

/// Decodes an HTML body through [`FromHtml`].
pub fn html<T: FromHtml>(body: &[u8]) -> Result<T, ClientError> {
    HtmlFormat::<T>::parse(body)
}
