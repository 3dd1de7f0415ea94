//! Annotation vocabulary.
//!
//! Annotations live in doc comments, one per line:
//!
//! ```text
//! @Name(Key) Value
//! @Name Value
//! ```
//!
//! The scanner turns each matching line into an [`AnnotationTriple`]; the
//! resolvers map the name onto [`MethodAnnotation`] or [`ServiceAnnotation`]
//! and ignore names they do not know.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::types::HttpVerb;

/// One scanned annotation: `(name, key, value)`, name without the `@`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationTriple {
    pub name: String,
    pub key: String,
    pub value: String,
}

impl AnnotationTriple {
    pub fn new(name: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Annotations recognized on trait methods.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use courier_define::{HttpVerb, MethodAnnotation};
///
/// let ann = MethodAnnotation::from_str("SingleBody").unwrap();
/// assert_eq!(ann, MethodAnnotation::SingleBody);
/// assert_eq!(MethodAnnotation::Delete.verb(), Some(HttpVerb::Delete));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
pub enum MethodAnnotation {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Connect,
    Options,
    Trace,
    /// `@Body json|xml|form|multipart`
    Body,
    /// `@SingleBody json|xml`
    SingleBody,
    /// `@Result json|xml|html`
    Result,
    /// `@Param(key) pattern`
    Param,
    /// `@File(key) path-pattern`
    File,
    /// `@Header(name) pattern`
    Header,
    /// `@Cookie(name) pattern`
    Cookie,
}

impl MethodAnnotation {
    /// The HTTP verb selected by a verb annotation.
    pub fn verb(self) -> Option<HttpVerb> {
        match self {
            Self::Get => Some(HttpVerb::Get),
            Self::Head => Some(HttpVerb::Head),
            Self::Post => Some(HttpVerb::Post),
            Self::Put => Some(HttpVerb::Put),
            Self::Patch => Some(HttpVerb::Patch),
            Self::Delete => Some(HttpVerb::Delete),
            Self::Connect => Some(HttpVerb::Connect),
            Self::Options => Some(HttpVerb::Options),
            Self::Trace => Some(HttpVerb::Trace),
            _ => None,
        }
    }
}

/// Annotations recognized on the trait itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
pub enum ServiceAnnotation {
    /// `@Base url-pattern`
    Base,
    /// `@Header(name) pattern`, a default header
    Header,
    /// `@Cookie(name) pattern`, a default cookie
    Cookie,
}
