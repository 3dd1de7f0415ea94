//! Error types for the courier generator.

use courier_define::{BodyKind, FieldType, ParamType};
use thiserror::Error;

/// Errors raised while resolving annotations into descriptors.
///
/// Each variant is a user error in the annotated source. Internal invariant
/// violations are `debug_assert!`s, never one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// An annotation that may appear once appeared again.
    #[error("duplicated annotation: @{0}")]
    DuplicatedAnnotation(String),

    /// More than one HTTP verb annotation on a method.
    #[error("duplicated http method: @{0}")]
    DuplicatedHttpMethod(String),

    /// A placeholder names no declared parameter, or one already consumed.
    #[error("id does not exist: {0}")]
    UnknownIdentifier(String),

    /// A placeholder names a parameter that is neither an integer nor a string.
    #[error("id in pattern must be int or string: {identifier} is {ty}")]
    IdentifierTypeUnsupported { identifier: String, ty: ParamType },

    /// A pattern was given an empty key, as in `@Header() value`.
    #[error("empty key for pattern '{0}'")]
    EmptyPatternKey(String),

    /// An enumerated annotation carried a value outside its set.
    #[error("unsupported value '{value}' for @{annotation}")]
    UnsupportedAnnotationValue { annotation: String, value: String },

    /// The declared return shape contradicts the annotations.
    #[error("conflicting annotation: {0}")]
    ConflictAnnotation(String),

    /// `@SingleBody` without exactly one stream or composite body field.
    #[error("@SingleBody needs exactly one stream or composite body field, found {found}")]
    SingleBodyConflict { found: usize },

    /// No HTTP verb annotation on a method.
    #[error("missing http method: annotate the method with @Get, @Post, ...")]
    MissingHttpMethod,

    /// A verb annotation's URI is not a valid URL path.
    #[error("invalid uri '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    /// An identifier uses the prefix reserved for generated locals.
    #[error("identifier '{0}' uses the reserved prefix __courier_")]
    ReservedIdentifier(String),

    /// A body field cannot be encoded in the method's request body kind.
    #[error("body field '{field}' of type {ty} cannot be encoded as {kind}")]
    UnsupportedBodyField {
        field: String,
        ty: FieldType,
        kind: BodyKind,
    },
}

/// Errors raised while reading the service trait from a source file.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The source file is not valid Rust.
    #[error("failed to parse source: {0}")]
    Parse(#[from] syn::Error),

    /// No trait with the requested name exists in the file.
    #[error("trait '{0}' not found")]
    TraitNotFound(String),

    /// A method shape the generator cannot implement.
    #[error("method '{method}': {reason}")]
    UnsupportedMethod { method: String, reason: String },
}

/// Errors that can occur during code generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Annotation resolution failed on a method.
    #[error("{service}.{method}: {source}")]
    Method {
        service: String,
        method: String,
        #[source]
        source: ResolveError,
    },

    /// Annotation resolution failed on the service itself.
    #[error("{service}: {source}")]
    Service {
        service: String,
        #[source]
        source: ResolveError,
    },

    /// Reading the service trait failed.
    #[error(transparent)]
    Analyze(#[from] AnalyzeError),

    /// Failed to read the input file
    #[error("Failed to read input file '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to generate code
    #[error("Code generation failed: {0}")]
    CodeGenError(String),

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}
