//! Response format trait and implementations.
//!
//! The [`ResponseFormat`] trait defines how a fully-read response body is
//! decoded into a fresh typed value. Each `@Result` encoding has its own
//! implementation.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use super::html::FromHtml;
use crate::error::ClientError;

/// Trait for response decoding strategies.
///
/// ## Examples
///
/// ```
/// use courier::response::{JsonFormat, ResponseFormat};
///
/// let ids = JsonFormat::<Vec<u32>>::parse(b"[1, 2, 3]").unwrap();
/// assert_eq!(ids, vec![1, 2, 3]);
/// ```
pub trait ResponseFormat {
    /// The decoded value.
    type Output;

    /// Decodes a response body.
    fn parse(body: &[u8]) -> Result<Self::Output, ClientError>;
}

/// JSON response format.
#[derive(Debug, Clone, Copy)]
pub struct JsonFormat<T>(PhantomData<T>);

impl<T: DeserializeOwned> ResponseFormat for JsonFormat<T> {
    type Output = T;

    fn parse(body: &[u8]) -> Result<Self::Output, ClientError> {
        Ok(serde_json::from_slice(body)?)
    }
}

/// XML response format.
#[derive(Debug, Clone, Copy)]
pub struct XmlFormat<T>(PhantomData<T>);

impl<T: DeserializeOwned> ResponseFormat for XmlFormat<T> {
    type Output = T;

    fn parse(body: &[u8]) -> Result<Self::Output, ClientError> {
        Ok(quick_xml::de::from_reader(body)?)
    }
}

/// HTML response format.
///
/// The body is parsed as an HTML document and handed to the target type's
/// [`FromHtml`] implementation.
#[derive(Debug, Clone, Copy)]
pub struct HtmlFormat<T>(PhantomData<T>);

impl<T: FromHtml> ResponseFormat for HtmlFormat<T> {
    type Output = T;

    fn parse(body: &[u8]) -> Result<Self::Output, ClientError> {
        let text = String::from_utf8_lossy(body);
        let document = scraper::Html::parse_document(&text);
        Ok(T::from_html(&document)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HtmlError;

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[derive(Debug, PartialEq)]
    struct Title(String);

    impl FromHtml for Title {
        fn from_html(document: &scraper::Html) -> Result<Self, HtmlError> {
            Ok(Title(crate::response::select_text(document, "title")?))
        }
    }

    #[test]
    fn test_json_format_parse() {
        let body = br#"{"name": "test", "value": 42}"#;
        let result = JsonFormat::<TestData>::parse(body).unwrap();
        assert_eq!(result, TestData { name: "test".into(), value: 42 });
    }

    #[test]
    fn test_json_format_invalid() {
        let result = JsonFormat::<TestData>::parse(b"not json");
        assert!(matches!(result, Err(ClientError::Json(_))));
    }

    #[test]
    fn test_xml_format_parse() {
        let body = b"<data><name>test</name><value>42</value></data>";
        let result = XmlFormat::<TestData>::parse(body).unwrap();
        assert_eq!(result.name, "test");
        assert_eq!(result.value, 42);
    }

    #[test]
    fn test_xml_format_invalid() {
        let result = XmlFormat::<TestData>::parse(b"<data><name>x</name>");
        assert!(matches!(result, Err(ClientError::XmlDecode(_))));
    }

    #[test]
    fn test_html_format_parse() {
        let body = b"<html><head><title> Hello </title></head><body></body></html>";
        let result = HtmlFormat::<Title>::parse(body).unwrap();
        assert_eq!(result, Title("Hello".into()));
    }

    #[test]
    fn test_html_format_missing_element() {
        let result = HtmlFormat::<Title>::parse(b"<p>no title</p>");
        assert!(matches!(result, Err(ClientError::Html(HtmlError::Missing(_)))));
    }
}
