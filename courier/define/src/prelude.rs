//! Convenient re-exports for working with courier descriptors.
//!
//! ```
//! use courier_define::prelude::*;
//!
//! let param = ParameterDescriptor::new("id", ParamType::Int, "i64");
//! assert_eq!(param.ty, ParamType::Int);
//! ```

pub use crate::annotation::{AnnotationTriple, MethodAnnotation, ServiceAnnotation};
pub use crate::descriptor::{BodyField, MethodDescriptor, ServiceDescriptor};
pub use crate::pattern::{PatternValue, Template};
pub use crate::source::{ParameterDescriptor, ReturnSlot, SourceMethod, SourceService};
pub use crate::types::{
    BodyKind, FieldType, HttpVerb, ParamType, ResultEncoding, ResultKind, ReturnCapability,
};
