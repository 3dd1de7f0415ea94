//! Core enumerations of the descriptor model.
//!
//! - [`HttpVerb`] - the nine HTTP methods a verb annotation can select
//! - [`BodyKind`] - request body encodings
//! - [`ResultEncoding`] / [`ResultKind`] - how a method produces its result
//! - [`ParamType`] / [`FieldType`] - semantic types of parameters and body fields
//! - [`ReturnCapability`] - capability tags of return slots

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// HTTP methods selectable by verb annotations.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use courier_define::HttpVerb;
///
/// assert_eq!(HttpVerb::from_str("PATCH").unwrap(), HttpVerb::Patch);
/// assert_eq!(HttpVerb::Connect.to_string(), "CONNECT");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Connect,
    Options,
    Trace,
}

impl HttpVerb {
    /// Returns the canonical upper-case method name.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Request body encodings accepted by `@Body`.
///
/// `@SingleBody` accepts only the [`BodyKind::supports_single_body`] subset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BodyKind {
    Json,
    Xml,
    Form,
    Multipart,
}

impl BodyKind {
    /// Whether the whole body may be sourced from a single parameter.
    pub fn supports_single_body(self) -> bool {
        matches!(self, Self::Json | Self::Xml)
    }

    /// The `Content-Type` set on requests of this kind.
    ///
    /// Multipart bodies carry a generated boundary, so their content type is
    /// only known once the form exists.
    pub fn content_type(self) -> Option<&'static str> {
        match self {
            Self::Json => Some("application/json; charset=UTF-8"),
            Self::Xml => Some("application/xml; charset=UTF-8"),
            Self::Form => Some("application/x-www-form-urlencoded"),
            Self::Multipart => None,
        }
    }
}

/// Decoded response encodings accepted by `@Result`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResultEncoding {
    Json,
    Xml,
    Html,
}

/// How a generated method produces its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    /// The built request is returned without being executed.
    RequestPassthrough,
    /// The raw response is returned without decoding.
    ResponsePassthrough,
    /// The response body is buffered and decoded.
    Decode(ResultEncoding),
}

impl From<ResultEncoding> for ResultKind {
    fn from(encoding: ResultEncoding) -> Self {
        Self::Decode(encoding)
    }
}

/// Semantic type of a declared method parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Any primitive integer.
    Int,
    /// `String`, `&str` or `&String`.
    String,
    /// A readable byte stream (`std::io::Read`).
    Stream,
    /// Any other (serializable) value.
    Other,
}

impl ParamType {
    /// Whether values of this type can be substituted into a pattern.
    pub fn is_pattern_compatible(self) -> bool {
        matches!(self, Self::Int | Self::String)
    }
}

/// Semantic type of a request body field.
///
/// Mirrors [`ParamType`] plus [`FieldType::File`], a field whose pattern
/// names a local file that is opened and streamed at request time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Int,
    String,
    Stream,
    Other,
    File,
}

impl From<ParamType> for FieldType {
    fn from(ty: ParamType) -> Self {
        match ty {
            ParamType::Int => Self::Int,
            ParamType::String => Self::String,
            ParamType::Stream => Self::Stream,
            ParamType::Other => Self::Other,
        }
    }
}

/// Capability tag of one return slot, as reported by the source analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum ReturnCapability {
    /// An error type the generated code can convert `courier::ClientError` into.
    Error,
    /// A numeric status code (`u16`).
    StatusCode,
    /// `reqwest::blocking::Request`.
    RequestPassthrough,
    /// `reqwest::blocking::Response`.
    ResponsePassthrough,
    /// Any other type, decoded from the response body.
    Other,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn nine_http_verbs() {
        assert_eq!(HttpVerb::iter().count(), 9);
        assert_eq!(HttpVerb::Options.as_str(), "OPTIONS");
    }

    #[test]
    fn body_kind_parses_lowercase_only() {
        assert_eq!(BodyKind::from_str("multipart").unwrap(), BodyKind::Multipart);
        assert!(BodyKind::from_str("JSON").is_err());
        assert!(BodyKind::from_str("yaml").is_err());
    }

    #[test]
    fn single_body_subset() {
        assert!(BodyKind::Json.supports_single_body());
        assert!(BodyKind::Xml.supports_single_body());
        assert!(!BodyKind::Form.supports_single_body());
        assert!(!BodyKind::Multipart.supports_single_body());
    }

    #[test]
    fn multipart_content_type_is_dynamic() {
        assert_eq!(BodyKind::Multipart.content_type(), None);
        assert_eq!(
            BodyKind::Form.content_type(),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn result_kind_serializes_with_encoding() {
        let json = serde_json::to_string(&ResultKind::Decode(ResultEncoding::Html)).unwrap();
        assert_eq!(json, r#"{"decode":"html"}"#);
    }

    #[test]
    fn field_type_from_param_type() {
        assert_eq!(FieldType::from(ParamType::Stream), FieldType::Stream);
        assert!(ParamType::Int.is_pattern_compatible());
        assert!(!ParamType::Other.is_pattern_compatible());
    }
}
