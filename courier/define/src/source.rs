//! What the source analyzer reports about a service contract.
//!
//! These types are the input of resolution. They carry the raw annotation
//! text and the semantic classification of every parameter and return slot;
//! the declared Rust types are kept as token text for emission.

use serde::{Deserialize, Serialize};

use crate::types::{ParamType, ReturnCapability};

/// A service contract (a trait) as seen by the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceService {
    /// Trait name.
    pub name: String,
    /// Doc comment text of the trait, one line per doc line.
    pub docs: String,
    /// Required methods, in declaration order.
    pub methods: Vec<SourceMethod>,
}

/// One required trait method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMethod {
    pub name: String,
    pub docs: String,
    /// Declared parameters, receiver excluded.
    pub params: Vec<ParameterDescriptor>,
    /// Flattened return slots (`Result<(T, u16), E>` is `[T, u16, E]`).
    pub returns: Vec<ReturnSlot>,
    /// Token text of the declared return type, or empty for `()`.
    pub output: String,
}

/// A declared method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub ty: ParamType,
    pub rust_type: String,
}

/// One flattened return slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnSlot {
    pub capability: ReturnCapability,
    pub rust_type: String,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, ty: ParamType, rust_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty,
            rust_type: rust_type.into(),
        }
    }
}

impl ReturnSlot {
    pub fn new(capability: ReturnCapability, rust_type: impl Into<String>) -> Self {
        Self {
            capability,
            rust_type: rust_type.into(),
        }
    }
}
