//! Service metadata resolution.

use std::str::FromStr;

use courier_define::{PatternValue, ServiceAnnotation, ServiceDescriptor, SourceService};
use tracing::{debug, info, instrument, trace};

use super::method::resolve_method;
use crate::errors::{GeneratorError, ResolveError};
use crate::pattern::{IdentifierScope, ServiceScope, compile_pattern};
use crate::scanner::scan;

/// Key of the base URL pattern, and the constructor argument used when the
/// service has no `@Base`.
pub const BASE_URL_KEY: &str = "base_url";

/// Resolves a service trait and all of its methods.
///
/// ## Examples
///
/// ```
/// use courier_define::{SourceService, Template};
/// use courier_gen::resolve::resolve_service;
///
/// let source = SourceService {
///     name: "Store".to_string(),
///     docs: "@Header(User-Agent) courier/{version}".to_string(),
///     methods: vec![],
/// };
///
/// let service = resolve_service(&source).unwrap();
/// assert_eq!(service.base_url.template, Template::Direct);
/// assert_eq!(service.free_identifiers, vec!["version", "base_url"]);
/// ```
#[instrument(skip_all, fields(service = %source.name))]
pub fn resolve_service(source: &SourceService) -> Result<ServiceDescriptor, GeneratorError> {
    let mut methods = Vec::with_capacity(source.methods.len());
    for method in &source.methods {
        let resolved = resolve_method(method).map_err(|e| GeneratorError::Method {
            service: source.name.clone(),
            method: method.name.clone(),
            source: e,
        })?;
        methods.push(resolved);
    }

    let service = resolve_annotations(source).map_err(|e| GeneratorError::Service {
        service: source.name.clone(),
        source: e,
    })?;

    info!(methods = methods.len(), "resolved service");
    Ok(ServiceDescriptor { methods, ..service })
}

/// Folds the service-level annotations; the result has no methods yet.
fn resolve_annotations(source: &SourceService) -> Result<ServiceDescriptor, ResolveError> {
    let mut scope = ServiceScope::new();
    let mut base_url = None;
    let mut default_headers = Vec::new();
    let mut default_cookies = Vec::new();

    scan(&source.docs, |triple| {
        let Ok(annotation) = ServiceAnnotation::from_str(&triple.name) else {
            trace!(annotation = %triple.name, "ignoring unknown annotation");
            return Ok(());
        };
        match annotation {
            ServiceAnnotation::Base => {
                if base_url.is_some() {
                    return Err(ResolveError::DuplicatedAnnotation(triple.name.clone()));
                }
                base_url = Some(compile_pattern(&mut scope, BASE_URL_KEY, &triple.value)?);
            }
            ServiceAnnotation::Header => {
                default_headers.push(compile_pattern(&mut scope, &triple.key, &triple.value)?);
            }
            ServiceAnnotation::Cookie => {
                default_cookies.push(compile_pattern(&mut scope, &triple.key, &triple.value)?);
            }
        }
        Ok(())
    })?;

    let base_url = match base_url {
        Some(pattern) => pattern,
        None => {
            scope.claim(BASE_URL_KEY)?;
            PatternValue::direct(BASE_URL_KEY, BASE_URL_KEY)
        }
    };

    debug!(
        base_url = ?base_url.template,
        headers = default_headers.len(),
        cookies = default_cookies.len(),
        "resolved service annotations"
    );

    Ok(ServiceDescriptor {
        name: source.name.clone(),
        base_url,
        default_headers,
        default_cookies,
        free_identifiers: scope.into_free_identifiers(),
        methods: Vec::new(),
    })
}
