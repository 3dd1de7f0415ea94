//! Resolved descriptors.
//!
//! A [`ServiceDescriptor`] is the validated model the emitter walks. It is
//! built once by the resolvers and never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::pattern::PatternValue;
use crate::source::{ParameterDescriptor, ReturnSlot};
use crate::types::{BodyKind, FieldType, HttpVerb, ResultKind};

/// One field destined for a request body.
///
/// The field key is the key of its pattern. Leftover parameters become
/// fields with a [`crate::Template::Direct`] pattern over themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyField {
    pub pattern: PatternValue,
    pub ty: FieldType,
}

impl BodyField {
    pub fn new(pattern: PatternValue, ty: FieldType) -> Self {
        Self { pattern, ty }
    }

    pub fn key(&self) -> &str {
        &self.pattern.key
    }
}

/// A fully resolved trait method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    pub verb: HttpVerb,
    pub uri: PatternValue,
    /// `None` when the request carries no body.
    pub request_body: Option<BodyKind>,
    pub single_body: bool,
    pub result: ResultKind,
    /// Method-level header overrides, applied with overwrite semantics.
    pub headers: Vec<PatternValue>,
    pub cookies: Vec<PatternValue>,
    pub body_fields: Vec<BodyField>,
    pub parameters: Vec<ParameterDescriptor>,
    /// Flattened return slots; two or three after validation.
    pub returns: Vec<ReturnSlot>,
    /// Token text of the declared return type.
    pub output: String,
}

impl MethodDescriptor {
    /// Number of flattened return slots.
    pub fn return_arity(&self) -> usize {
        self.returns.len()
    }

    /// Token text of the first return slot (the result value).
    pub fn result_type(&self) -> Option<&str> {
        self.returns.first().map(|slot| slot.rust_type.as_str())
    }

    /// Whether the generated method returns the status code alongside the result.
    pub fn returns_status(&self) -> bool {
        self.return_arity() == 3
    }

    /// Whether the generated request carries a body.
    pub fn has_body(&self) -> bool {
        self.request_body.is_some() && !self.body_fields.is_empty()
    }
}

/// A fully resolved service.
///
/// ## Examples
///
/// ```
/// use courier_define::{PatternValue, ServiceDescriptor};
///
/// let service = ServiceDescriptor {
///     name: "Store".to_string(),
///     base_url: PatternValue::direct("base_url", "base_url"),
///     default_headers: vec![],
///     default_cookies: vec![],
///     free_identifiers: vec!["base_url".to_string()],
///     methods: vec![],
/// };
///
/// assert_eq!(service.client_name(), "StoreClient");
/// assert_eq!(service.impl_file_name(), "store_impl.rs");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub name: String,
    pub base_url: PatternValue,
    pub default_headers: Vec<PatternValue>,
    pub default_cookies: Vec<PatternValue>,
    /// Identifiers referenced by service-level patterns, in first-seen order.
    /// Each becomes a `String` argument of the generated constructor.
    pub free_identifiers: Vec<String>,
    /// Methods in declaration order.
    pub methods: Vec<MethodDescriptor>,
}

impl ServiceDescriptor {
    /// Name of the generated client struct.
    pub fn client_name(&self) -> String {
        format!("{}Client", self.name)
    }

    /// File name of the generated artifact.
    pub fn impl_file_name(&self) -> String {
        format!("{}_impl.rs", self.name.to_lowercase())
    }
}
