//! Compiled patterns.
//!
//! A [`PatternValue`] is the compiled form of an annotation value such as
//! `/item/{id}` or `Bearer {token}`: a [`Template`] plus the identifiers it
//! consumes, in the order they appear.

use serde::{Deserialize, Serialize};

/// The shape of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    /// Fixed text without placeholders.
    Literal(String),
    /// The raw value was exactly one placeholder; its identifier is
    /// substituted as-is, without a formatting step.
    Direct,
    /// A `format!` string with one `{}` marker per identifier. Literal braces
    /// are escaped.
    Format(String),
}

/// A compiled pattern bound to a key (header name, field name, `uri`, ...).
///
/// ## Examples
///
/// ```
/// use courier_define::{PatternValue, Template};
///
/// let direct = PatternValue::direct("name", "name");
/// assert_eq!(direct.template, Template::Direct);
/// assert_eq!(direct.identifiers, vec!["name".to_string()]);
///
/// let formatted = PatternValue::formatted("uri", "/item/{}", vec!["id".into()]);
/// assert_eq!(formatted.marker_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatternValue {
    pub key: String,
    pub template: Template,
    pub identifiers: Vec<String>,
}

impl PatternValue {
    /// Creates a pattern with no placeholders.
    pub fn literal(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            template: Template::Literal(text.into()),
            identifiers: Vec::new(),
        }
    }

    /// Creates a direct-substitution pattern over a single identifier.
    pub fn direct(key: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            template: Template::Direct,
            identifiers: vec![identifier.into()],
        }
    }

    /// Creates a formatted pattern.
    pub fn formatted(
        key: impl Into<String>,
        format: impl Into<String>,
        identifiers: Vec<String>,
    ) -> Self {
        let pattern = Self {
            key: key.into(),
            template: Template::Format(format.into()),
            identifiers,
        };
        debug_assert_eq!(pattern.marker_count(), pattern.identifiers.len());
        pattern
    }

    /// Number of substitution markers in the template.
    pub fn marker_count(&self) -> usize {
        match &self.template {
            Template::Literal(_) => 0,
            Template::Direct => 1,
            Template::Format(format) => count_markers(format),
        }
    }

    /// Returns the single identifier of a [`Template::Direct`] pattern.
    pub fn direct_identifier(&self) -> Option<&str> {
        match self.template {
            Template::Direct => self.identifiers.first().map(String::as_str),
            _ => None,
        }
    }
}

/// Counts `{}` markers, skipping `{{` and `}}` escapes.
fn count_markers(format: &str) -> usize {
    let bytes = format.as_bytes();
    let mut count = 0;
    let mut idx = 0;
    while idx < bytes.len() {
        match (bytes[idx], bytes.get(idx + 1)) {
            (b'{', Some(b'{')) | (b'}', Some(b'}')) => idx += 2,
            (b'{', Some(b'}')) => {
                count += 1;
                idx += 2;
            }
            _ => idx += 1,
        }
    }
    count
}
