//! Pattern compilation.
//!
//! Annotation values such as `/item/{id}` or `Bearer {token}` reference
//! identifiers in braces. [`compile_pattern`] checks every reference against
//! an [`IdentifierScope`] and produces a [`PatternValue`]:
//!
//! - no placeholders: [`Template::Literal`]
//! - the whole value is one placeholder: [`Template::Direct`]
//! - anything else: [`Template::Format`], a `format!` string with `{}` markers
//!
//! Method scopes bind placeholders to declared parameters, each at most
//! once. The service scope has no parameters; every identifier it sees
//! becomes a constructor argument.

use std::sync::LazyLock;

use courier_define::{ParameterDescriptor, PatternValue};
use regex::Regex;

use crate::errors::ResolveError;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{[a-zA-Z_][0-9a-zA-Z_]*\}").expect("Invalid placeholder regex")
});

/// Prefix of every local the generated code introduces. Identifiers starting
/// with it are rejected in both scopes.
pub const RESERVED_PREFIX: &str = "__courier_";

/// Fails when `identifier` could collide with a generated local.
pub fn check_reserved(identifier: &str) -> Result<(), ResolveError> {
    if identifier.starts_with(RESERVED_PREFIX) {
        return Err(ResolveError::ReservedIdentifier(identifier.to_string()));
    }
    Ok(())
}

/// Where pattern identifiers come from.
pub trait IdentifierScope {
    /// Binds one placeholder occurrence to this scope.
    fn claim(&mut self, identifier: &str) -> Result<(), ResolveError>;
}

/// Identifiers of a trait method: its declared parameters.
///
/// Starts with every parameter in the pool. Claiming removes it, so a
/// parameter is consumed by at most one placeholder; whatever is left at the
/// end becomes a request body field.
#[derive(Debug)]
pub struct MethodScope<'a> {
    params: &'a [ParameterDescriptor],
    pool: Vec<String>,
}

impl<'a> MethodScope<'a> {
    pub fn new(params: &'a [ParameterDescriptor]) -> Self {
        Self {
            params,
            pool: params.iter().map(|p| p.name.clone()).collect(),
        }
    }

    /// Parameters not yet bound to a pattern, in declaration order.
    pub fn remaining(&self) -> &[String] {
        &self.pool
    }

    /// Consumes the scope, yielding the unbound parameters in declaration order.
    pub fn into_remaining(self) -> impl Iterator<Item = &'a ParameterDescriptor> {
        let pool = self.pool;
        self.params
            .iter()
            .filter(move |param| pool.contains(&param.name))
    }
}

impl IdentifierScope for MethodScope<'_> {
    fn claim(&mut self, identifier: &str) -> Result<(), ResolveError> {
        let param = self
            .params
            .iter()
            .find(|p| p.name == identifier)
            .ok_or_else(|| ResolveError::UnknownIdentifier(identifier.to_string()))?;

        if !param.ty.is_pattern_compatible() {
            return Err(ResolveError::IdentifierTypeUnsupported {
                identifier: identifier.to_string(),
                ty: param.ty,
            });
        }

        let idx = self
            .pool
            .iter()
            .position(|name| name == identifier)
            .ok_or_else(|| ResolveError::UnknownIdentifier(identifier.to_string()))?;
        self.pool.remove(idx);
        Ok(())
    }
}

/// Identifiers of service-level patterns.
///
/// Any identifier is accepted and recorded once, in first-seen order; all of
/// them are strings supplied to the generated constructor.
#[derive(Debug, Default)]
pub struct ServiceScope {
    free: Vec<String>,
}

impl ServiceScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn free_identifiers(&self) -> &[String] {
        &self.free
    }

    pub fn into_free_identifiers(self) -> Vec<String> {
        self.free
    }
}

impl IdentifierScope for ServiceScope {
    fn claim(&mut self, identifier: &str) -> Result<(), ResolveError> {
        check_reserved(identifier)?;
        if !self.free.iter().any(|id| id == identifier) {
            self.free.push(identifier.to_string());
        }
        Ok(())
    }
}

/// Compiles `raw` into a pattern keyed `key`.
///
/// ## Examples
///
/// ```
/// use courier_define::{ParamType, ParameterDescriptor, Template};
/// use courier_gen::pattern::{MethodScope, compile_pattern};
///
/// let params = vec![ParameterDescriptor::new("id", ParamType::Int, "i64")];
/// let mut scope = MethodScope::new(&params);
///
/// let uri = compile_pattern(&mut scope, "uri", "/item/{id}").unwrap();
/// assert_eq!(uri.template, Template::Format("/item/{}".to_string()));
/// assert_eq!(uri.identifiers, vec!["id".to_string()]);
/// assert!(scope.remaining().is_empty());
/// ```
pub fn compile_pattern<S>(scope: &mut S, key: &str, raw: &str) -> Result<PatternValue, ResolveError>
where
    S: IdentifierScope + ?Sized,
{
    if key.is_empty() {
        return Err(ResolveError::EmptyPatternKey(raw.to_string()));
    }

    let mut format = String::with_capacity(raw.len());
    let mut identifiers = Vec::new();
    let mut last = 0;

    for found in PLACEHOLDER_RE.find_iter(raw) {
        let identifier = &raw[found.start() + 1..found.end() - 1];
        scope.claim(identifier)?;
        identifiers.push(identifier.to_string());

        push_escaped(&mut format, &raw[last..found.start()]);
        format.push_str("{}");
        last = found.end();
    }

    if identifiers.is_empty() {
        return Ok(PatternValue::literal(key, raw));
    }

    if identifiers.len() == 1 && raw.len() == identifiers[0].len() + 2 {
        return Ok(PatternValue::direct(key, identifiers.remove(0)));
    }

    push_escaped(&mut format, &raw[last..]);
    Ok(PatternValue::formatted(key, format, identifiers))
}

/// Appends literal text with `format!` braces escaped.
fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '{' => out.push_str("{{"),
            '}' => out.push_str("}}"),
            other => out.push(other),
        }
    }
}
