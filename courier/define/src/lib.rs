//! Courier Definition Library
//!
//! This crate provides the data model shared by the courier generator: what
//! the source analyzer reports about a service trait, the annotation
//! vocabulary, and the resolved descriptors the emitter walks.
//!
//! ## Core Types
//!
//! ### Input
//!
//! - [`SourceService`] / [`SourceMethod`] - a service trait as seen by the analyzer
//! - [`ParameterDescriptor`] - a declared parameter with its [`ParamType`]
//! - [`ReturnSlot`] - a flattened return slot with its [`ReturnCapability`]
//! - [`AnnotationTriple`] - one scanned `@Name(Key) Value` line
//!
//! ### Resolved model
//!
//! - [`ServiceDescriptor`] - base URL, defaults, constructor arguments, methods
//! - [`MethodDescriptor`] - verb, URI, body plan, overrides, result plan
//! - [`PatternValue`] / [`Template`] - compiled `{identifier}` templates
//! - [`BodyField`] - one request body field with its [`FieldType`]
//!
//! ## Examples
//!
//! ```
//! use courier_define::{HttpVerb, PatternValue, Template};
//!
//! let uri = PatternValue::formatted("uri", "/item/{}", vec!["id".to_string()]);
//! assert!(matches!(uri.template, Template::Format(_)));
//! assert_eq!(HttpVerb::Get.as_str(), "GET");
//! ```

pub mod annotation;
pub mod descriptor;
pub mod pattern;
pub mod prelude;
pub mod source;
pub mod types;

pub use annotation::{AnnotationTriple, MethodAnnotation, ServiceAnnotation};
pub use descriptor::{BodyField, MethodDescriptor, ServiceDescriptor};
pub use pattern::{PatternValue, Template};
pub use source::{ParameterDescriptor, ReturnSlot, SourceMethod, SourceService};
pub use types::{
    BodyKind, FieldType, HttpVerb, ParamType, ResultEncoding, ResultKind, ReturnCapability,
};
