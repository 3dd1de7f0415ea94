//! Shared test utilities for courier-gen tests.
//!
//! Fixture builders for resolved descriptors plus helpers that turn
//! generated tokens into formatted source for `contains` assertions.

use courier_define::{
    HttpVerb, MethodDescriptor, ParamType, ParameterDescriptor, PatternValue, ResultEncoding, ResultKind,
    ReturnCapability, ReturnSlot, ServiceDescriptor,
};
use proc_macro2::TokenStream;

/// Creates a service with the default `base_url` constructor argument.
pub fn make_service(name: &str, methods: Vec<MethodDescriptor>) -> ServiceDescriptor {
    ServiceDescriptor {
        name: name.to_string(),
        base_url: PatternValue::direct("base_url", "base_url"),
        default_headers: vec![],
        default_cookies: vec![],
        free_identifiers: vec!["base_url".to_string()],
        methods,
    }
}

/// Creates a `GET` method decoding JSON into `Item`.
///
/// ## Arguments
///
/// * `name` - Method name
/// * `uri` - URI format string; a literal when `ids` is empty
/// * `ids` - Integer parameters substituted into `uri`, in order
pub fn make_method(name: &str, uri: &str, ids: &[&str]) -> MethodDescriptor {
    let uri = if ids.is_empty() {
        PatternValue::literal("uri", uri)
    } else {
        PatternValue::formatted("uri", uri, ids.iter().map(|id| id.to_string()).collect())
    };

    MethodDescriptor {
        name: name.to_string(),
        verb: HttpVerb::Get,
        uri,
        request_body: None,
        single_body: false,
        result: ResultKind::Decode(ResultEncoding::Json),
        headers: vec![],
        cookies: vec![],
        body_fields: vec![],
        parameters: ids
            .iter()
            .map(|id| ParameterDescriptor::new(*id, ParamType::Int, "u64"))
            .collect(),
        returns: vec![
            ReturnSlot::new(ReturnCapability::Other, "Item"),
            ReturnSlot::new(ReturnCapability::Error, "ClientError"),
        ],
        output: "Result<Item, ClientError>".to_string(),
    }
}

/// Validates that generated code parses as a Rust file.
///
/// ## Errors
///
/// Returns an error string if the code fails to parse.
pub fn validate_generated_code(tokens: &TokenStream) -> Result<(), String> {
    syn::parse2::<syn::File>(tokens.clone()).map_err(|e| e.to_string())?;
    Ok(())
}

/// Formats generated code using prettyplease.
///
/// ## Errors
///
/// Returns an error string if the code fails to parse.
pub fn format_generated_code(tokens: &TokenStream) -> Result<String, String> {
    let file = syn::parse2::<syn::File>(tokens.clone()).map_err(|e| e.to_string())?;
    Ok(prettyplease::unparse(&file))
}

#[cfg(test)]
mod tests {
    use quote::quote;

    use super::*;

    #[test]
    fn make_method_with_ids() {
        let method = make_method("item", "/items/{}", &["id"]);
        assert_eq!(method.parameters.len(), 1);
        assert_eq!(method.uri.identifiers, vec!["id"]);
        assert_eq!(method.return_arity(), 2);
    }

    #[test]
    fn make_method_without_ids_is_literal() {
        let method = make_method("all", "/items", &[]);
        assert_eq!(method.uri, PatternValue::literal("uri", "/items"));
    }

    #[test]
    fn validate_generated_code_rejects_fragments() {
        assert!(validate_generated_code(&quote! { struct A; }).is_ok());
        assert!(validate_generated_code(&quote! { let a = }).is_err());
    }
}
