//! Method metadata resolution.
//!
//! Folds a method's annotations, left to right, into a [`MethodDescriptor`]
//! and validates the result against the declared parameters and return
//! shape.

use std::str::FromStr;

use courier_define::{
    AnnotationTriple, BodyField, BodyKind, FieldType, HttpVerb, MethodAnnotation, MethodDescriptor,
    PatternValue, ResultEncoding, ResultKind, ReturnCapability, SourceMethod,
};
use tracing::{debug, trace};
use url::Url;

use crate::errors::ResolveError;
use crate::pattern::{MethodScope, check_reserved, compile_pattern};
use crate::scanner::{Scanner, scan};

/// Key of the compiled URI pattern.
pub const URI_KEY: &str = "uri";

/// Resolves one trait method.
///
/// Resolution is a pure function of the method's doc text, parameters and
/// return slots; resolving the same method twice yields equal descriptors.
///
/// ## Examples
///
/// ```
/// use courier_define::{
///     HttpVerb, ParamType, ParameterDescriptor, ResultKind, ReturnCapability, ReturnSlot,
///     SourceMethod, Template,
/// };
/// use courier_gen::resolve::resolve_method;
///
/// let method = SourceMethod {
///     name: "item".to_string(),
///     docs: "@Get /item/{id}".to_string(),
///     params: vec![ParameterDescriptor::new("id", ParamType::Int, "i64")],
///     returns: vec![
///         ReturnSlot::new(ReturnCapability::ResponsePassthrough, "Response"),
///         ReturnSlot::new(ReturnCapability::Error, "ClientError"),
///     ],
///     output: "Result<Response, ClientError>".to_string(),
/// };
///
/// let resolved = resolve_method(&method).unwrap();
/// assert_eq!(resolved.verb, HttpVerb::Get);
/// assert_eq!(resolved.uri.template, Template::Format("/item/{}".to_string()));
/// assert_eq!(resolved.result, ResultKind::ResponsePassthrough);
/// assert!(resolved.body_fields.is_empty());
/// ```
pub fn resolve_method(method: &SourceMethod) -> Result<MethodDescriptor, ResolveError> {
    reject_duplicate_verbs(&method.docs)?;
    for param in &method.params {
        check_reserved(&param.name)?;
    }

    let mut state = MethodState::new(method);
    scan(&method.docs, |triple| state.apply(triple))?;
    state.finish()
}

/// Fails on the second verb annotation before anything else is looked at.
fn reject_duplicate_verbs(docs: &str) -> Result<(), ResolveError> {
    let mut verbs = Scanner::new(docs).filter(|triple| {
        MethodAnnotation::from_str(&triple.name).is_ok_and(|ann| ann.verb().is_some())
    });
    verbs.next();
    match verbs.next() {
        Some(second) => Err(ResolveError::DuplicatedHttpMethod(second.name)),
        None => Ok(()),
    }
}

/// Checks that a verb's URI is a relative URL reference.
fn validate_uri(raw: &str) -> Result<(), ResolveError> {
    let invalid = |reason: &str| ResolveError::InvalidUri {
        uri: raw.to_string(),
        reason: reason.to_string(),
    };

    if raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(invalid("whitespace and control characters are not allowed"));
    }

    let bytes = raw.as_bytes();
    for (idx, _) in raw.match_indices('%') {
        let escape = bytes.get(idx + 1..idx + 3);
        if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
            return Err(invalid("invalid percent escape"));
        }
    }

    if Url::parse(raw).is_ok() {
        return Err(invalid("expected a path, found an absolute URL"));
    }

    let origin = Url::parse("http://localhost/").map_err(|e| invalid(&e.to_string()))?;
    let joined = origin.join(raw).map_err(|e| invalid(&e.to_string()))?;
    if joined.origin() != origin.origin() {
        return Err(invalid("expected a path, found a network location"));
    }
    Ok(())
}

/// Partially resolved method, one field per annotation slot.
struct MethodState<'a> {
    source: &'a SourceMethod,
    scope: MethodScope<'a>,
    route: Option<(HttpVerb, PatternValue)>,
    request_body: Option<BodyKind>,
    single_body: bool,
    result: Option<ResultEncoding>,
    headers: Vec<PatternValue>,
    cookies: Vec<PatternValue>,
    body_fields: Vec<BodyField>,
}

impl<'a> MethodState<'a> {
    fn new(source: &'a SourceMethod) -> Self {
        Self {
            source,
            scope: MethodScope::new(&source.params),
            route: None,
            request_body: None,
            single_body: false,
            result: None,
            headers: Vec::new(),
            cookies: Vec::new(),
            body_fields: Vec::new(),
        }
    }

    fn apply(&mut self, triple: &AnnotationTriple) -> Result<(), ResolveError> {
        let Ok(annotation) = MethodAnnotation::from_str(&triple.name) else {
            trace!(annotation = %triple.name, "ignoring unknown annotation");
            return Ok(());
        };

        if let Some(verb) = annotation.verb() {
            return self.set_route(triple, verb);
        }

        match annotation {
            MethodAnnotation::Body => self.set_body(triple, false),
            MethodAnnotation::SingleBody => self.set_body(triple, true),
            MethodAnnotation::Result => self.set_result(triple),
            MethodAnnotation::Param => self.add_field(triple, FieldType::String),
            MethodAnnotation::File => self.add_field(triple, FieldType::File),
            MethodAnnotation::Header => {
                let pattern = compile_pattern(&mut self.scope, &triple.key, &triple.value)?;
                self.headers.push(pattern);
                Ok(())
            }
            MethodAnnotation::Cookie => {
                let pattern = compile_pattern(&mut self.scope, &triple.key, &triple.value)?;
                self.cookies.push(pattern);
                Ok(())
            }
            verb => unreachable!("verb annotation {verb} handled above"),
        }
    }

    fn set_route(&mut self, triple: &AnnotationTriple, verb: HttpVerb) -> Result<(), ResolveError> {
        if self.route.is_some() {
            return Err(ResolveError::DuplicatedHttpMethod(triple.name.clone()));
        }
        validate_uri(&triple.value)?;
        let uri = compile_pattern(&mut self.scope, URI_KEY, &triple.value)?;
        debug!(method = %self.source.name, %verb, uri = %triple.value, "set http method");
        self.route = Some((verb, uri));
        Ok(())
    }

    fn set_body(&mut self, triple: &AnnotationTriple, single: bool) -> Result<(), ResolveError> {
        if self.request_body.is_some() {
            return Err(ResolveError::DuplicatedAnnotation("Body/@SingleBody".to_string()));
        }
        let kind = BodyKind::from_str(&triple.value)
            .ok()
            .filter(|kind| !single || kind.supports_single_body())
            .ok_or_else(|| ResolveError::UnsupportedAnnotationValue {
                annotation: triple.name.clone(),
                value: triple.value.clone(),
            })?;
        debug!(method = %self.source.name, %kind, single, "set request body");
        self.request_body = Some(kind);
        self.single_body = single;
        Ok(())
    }

    fn set_result(&mut self, triple: &AnnotationTriple) -> Result<(), ResolveError> {
        if self.result.is_some() {
            return Err(ResolveError::DuplicatedAnnotation(triple.name.clone()));
        }
        let encoding = ResultEncoding::from_str(&triple.value).map_err(|_| {
            ResolveError::UnsupportedAnnotationValue {
                annotation: triple.name.clone(),
                value: triple.value.clone(),
            }
        })?;
        self.result = Some(encoding);
        Ok(())
    }

    fn add_field(&mut self, triple: &AnnotationTriple, ty: FieldType) -> Result<(), ResolveError> {
        let pattern = compile_pattern(&mut self.scope, &triple.key, &triple.value)?;
        debug!(method = %self.source.name, key = %pattern.key, %ty, "add body field");
        self.body_fields.push(BodyField::new(pattern, ty));
        Ok(())
    }

    fn finish(self) -> Result<MethodDescriptor, ResolveError> {
        let MethodState {
            source,
            scope,
            route,
            mut request_body,
            single_body,
            result,
            headers,
            cookies,
            mut body_fields,
        } = self;

        for param in scope.into_remaining() {
            trace!(method = %source.name, param = %param.name, "unbound parameter becomes body field");
            body_fields.push(BodyField::new(
                PatternValue::direct(&param.name, &param.name),
                param.ty.into(),
            ));
        }

        if single_body {
            let eligible = body_fields.len() == 1
                && matches!(body_fields[0].ty, FieldType::Stream | FieldType::Other);
            if !eligible {
                return Err(ResolveError::SingleBodyConflict {
                    found: body_fields.len(),
                });
            }
        }

        if request_body.is_none() && !body_fields.is_empty() {
            request_body = Some(BodyKind::Json);
        }

        if let Some(kind) = request_body
            && !single_body
        {
            check_body_fields(kind, &body_fields)?;
        }

        let (verb, uri) = route.ok_or(ResolveError::MissingHttpMethod)?;
        let result = resolve_result(source, result)?;

        debug!(
            method = %source.name,
            %verb,
            uri = ?uri.template,
            request = ?request_body,
            result = ?result,
            "resolved method"
        );

        Ok(MethodDescriptor {
            name: source.name.clone(),
            verb,
            uri,
            request_body,
            single_body,
            result,
            headers,
            cookies,
            body_fields,
            parameters: source.params.clone(),
            returns: source.returns.clone(),
            output: source.output.clone(),
        })
    }
}

/// Rejects fields the request body kind cannot carry.
fn check_body_fields(kind: BodyKind, fields: &[BodyField]) -> Result<(), ResolveError> {
    let accepts = |ty: FieldType| match kind {
        BodyKind::Form => matches!(ty, FieldType::Int | FieldType::String),
        BodyKind::Json | BodyKind::Xml => ty != FieldType::File,
        BodyKind::Multipart => ty != FieldType::Other,
    };
    match fields.iter().find(|field| !accepts(field.ty)) {
        Some(field) => Err(ResolveError::UnsupportedBodyField {
            field: field.key().to_string(),
            ty: field.ty,
            kind,
        }),
        None => Ok(()),
    }
}

/// Cross-checks `@Result` against the flattened return slots.
fn resolve_result(
    source: &SourceMethod,
    annotated: Option<ResultEncoding>,
) -> Result<ResultKind, ResolveError> {
    let conflict = |reason: String| ResolveError::ConflictAnnotation(reason);
    let returns = &source.returns;

    match returns.as_slice() {
        [first, error] => {
            if error.capability != ReturnCapability::Error {
                return Err(conflict(format!(
                    "the error type of {} must be courier::ClientError or a type it converts into, found {}",
                    source.output, error.rust_type
                )));
            }
            let passthrough = match first.capability {
                ReturnCapability::RequestPassthrough => Some(ResultKind::RequestPassthrough),
                ReturnCapability::ResponsePassthrough => Some(ResultKind::ResponsePassthrough),
                _ => None,
            };
            match (passthrough, annotated) {
                (Some(kind), None) => Ok(kind),
                (Some(_), Some(encoding)) => Err(conflict(format!(
                    "@Result {encoding} cannot decode into {}",
                    first.rust_type
                ))),
                (None, Some(encoding)) => Ok(encoding.into()),
                (None, None) => Err(conflict(format!(
                    "returning {} needs @Result json|xml|html",
                    first.rust_type
                ))),
            }
        }
        [first, status, error] => {
            let first_ok = !matches!(
                first.capability,
                ReturnCapability::RequestPassthrough | ReturnCapability::ResponsePassthrough
            );
            if !first_ok
                || status.capability != ReturnCapability::StatusCode
                || error.capability != ReturnCapability::Error
            {
                return Err(conflict(format!(
                    "expected Result<(T, u16), E> with a decodable T, found {}",
                    source.output
                )));
            }
            Ok(annotated.unwrap_or(ResultEncoding::Json).into())
        }
        _ => Err(conflict(format!(
            "expected Result<T, E> or Result<(T, u16), E>, found {}",
            source.output
        ))),
    }
}
