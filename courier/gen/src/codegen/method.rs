//! Trait method implementations.
//!
//! Every generated method follows the same shape:
//!
//! 1. evaluate the URI pattern and build the body, if any
//! 2. build the request against `self.base_url`
//! 3. apply client-wide headers and cookies, then the method's own
//! 4. set `Content-Type` when a body is attached
//! 5. return the request, or execute it and return or decode the response
//!
//! Every fallible step goes through `courier::ClientError`, so `?` converts
//! into whatever error type the trait method declares.

use courier_define::{MethodDescriptor, ParamType, ResultEncoding, ResultKind, ServiceDescriptor};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::body::generate_body;
use super::{parse_type, string_expr, to_ident};
use crate::errors::GeneratorError;

/// Generates `impl <Service> for <Service>Client` with every method.
pub fn generate_trait_impl(service: &ServiceDescriptor) -> Result<TokenStream, GeneratorError> {
    let trait_name = to_ident(&service.name);
    let client_name = format_ident!("{}", service.client_name());
    let methods = service
        .methods
        .iter()
        .map(generate_method)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(quote! {
        impl #trait_name for #client_name {
            #(#methods)*
        }
    })
}

/// Generates one method of the trait implementation.
pub fn generate_method(method: &MethodDescriptor) -> Result<TokenStream, GeneratorError> {
    let name = to_ident(&method.name);
    let params = method
        .parameters
        .iter()
        .map(|param| {
            let id = to_ident(&param.name);
            let ty = parse_type(&param.rust_type)?;
            // streams are read through `&mut`
            let mutability = (param.ty == ParamType::Stream).then(|| quote! { mut });
            Ok(quote! { #mutability #id: #ty })
        })
        .collect::<Result<Vec<_>, GeneratorError>>()?;
    let output = parse_type(&method.output)?;

    let uri = string_expr(&method.uri);
    let verb = format_ident!("{}", method.verb.as_str());

    let body = generate_body(method);
    let setup = body.as_ref().map(|b| &b.setup);
    let attach = body.as_ref().map(|b| &b.attach);
    let content_type = body.as_ref().map(|b| {
        let value = &b.content_type;
        quote! { courier::request::set_content_type(&mut __courier_request, #value)?; }
    });

    let headers = method.headers.iter().map(|header| {
        let key = &header.key;
        let value = string_expr(header);
        quote! { courier::request::set_header(&mut __courier_request, #key, &#value)?; }
    });
    let cookies = method.cookies.iter().map(|cookie| {
        let key = &cookie.key;
        let value = string_expr(cookie);
        quote! { courier::request::add_cookie(&mut __courier_request, #key, &#value)?; }
    });

    let finish = generate_result(method)?;

    Ok(quote! {
        fn #name(&self, #(#params),*) -> #output {
            let __courier_uri = #uri;
            #setup
            let __courier_url = courier::request::join_url(&self.base_url, &__courier_uri);
            let mut __courier_request = self
                .client
                .request(reqwest::Method::#verb, __courier_url)
                #attach
                .build()
                .map_err(courier::ClientError::Transport)?;
            for (__courier_name, __courier_value) in &self.headers {
                courier::request::add_header(&mut __courier_request, __courier_name, __courier_value)?;
            }
            for (__courier_name, __courier_value) in &self.cookies {
                courier::request::add_cookie(&mut __courier_request, __courier_name, __courier_value)?;
            }
            #(#headers)*
            #(#cookies)*
            #content_type
            #finish
        }
    })
}

fn generate_result(method: &MethodDescriptor) -> Result<TokenStream, GeneratorError> {
    let encoding = match method.result {
        ResultKind::RequestPassthrough => return Ok(quote! { Ok(__courier_request) }),
        ResultKind::ResponsePassthrough => {
            return Ok(quote! {
                let __courier_response = courier::request::execute(&self.client, __courier_request)?;
                Ok(__courier_response)
            });
        }
        ResultKind::Decode(encoding) => encoding,
    };

    let result_type = method.result_type().ok_or_else(|| {
        GeneratorError::CodeGenError(format!("method '{}' has no result type", method.name))
    })?;
    let result_type = parse_type(result_type)?;
    let decode = match encoding {
        ResultEncoding::Json => quote! { courier::response::json::<#result_type> },
        ResultEncoding::Xml => quote! { courier::response::xml::<#result_type> },
        ResultEncoding::Html => quote! { courier::response::html::<#result_type> },
    };

    let tail = if method.returns_status() {
        quote! {
            let (__courier_status, __courier_bytes) = courier::response::read_body(__courier_response)?;
            let __courier_result = #decode(&__courier_bytes)?;
            Ok((__courier_result, __courier_status))
        }
    } else {
        quote! {
            let (_, __courier_bytes) = courier::response::read_body(__courier_response)?;
            let __courier_result = #decode(&__courier_bytes)?;
            Ok(__courier_result)
        }
    };

    Ok(quote! {
        let __courier_response = courier::request::execute(&self.client, __courier_request)?;
        #tail
    })
}

#[cfg(test)]
mod tests {
    use courier_define::{
        BodyField, BodyKind, FieldType, HttpVerb, ParameterDescriptor, PatternValue, ReturnCapability,
        ReturnSlot,
    };

    use super::*;
    use crate::test_utils::format_generated_code;

    fn decoded(ty: &str) -> Vec<ReturnSlot> {
        vec![
            ReturnSlot::new(ReturnCapability::Other, ty),
            ReturnSlot::new(ReturnCapability::Error, "ClientError"),
        ]
    }

    fn get_item() -> MethodDescriptor {
        MethodDescriptor {
            name: "item".to_string(),
            verb: HttpVerb::Get,
            uri: PatternValue::formatted("uri", "/items/{}", vec!["id".to_string()]),
            request_body: None,
            single_body: false,
            result: ResultKind::Decode(ResultEncoding::Json),
            headers: vec![PatternValue::literal("Accept", "application/json")],
            cookies: vec![PatternValue::direct("session", "session")],
            body_fields: vec![],
            parameters: vec![
                ParameterDescriptor::new("id", ParamType::Int, "u64"),
                ParameterDescriptor::new("session", ParamType::String, "&str"),
            ],
            returns: decoded("Item"),
            output: "Result<Item, ClientError>".to_string(),
        }
    }

    /// Wraps method tokens in an impl block so they parse as a file.
    fn render(method: &MethodDescriptor) -> String {
        let tokens = generate_method(method).unwrap();
        format_generated_code(&quote! { impl Store for StoreClient { #tokens } })
            .expect("Failed to format code")
    }

    #[test]
    fn get_method_shape() {
        let code = render(&get_item());

        assert!(code.contains("fn item(&self, id: u64, session: &str) -> Result<Item, ClientError>"));
        assert!(code.contains("let __courier_uri = format!(\"/items/{}\", id);"));
        assert!(code.contains("reqwest::Method::GET"));
        assert!(code.contains("courier::request::join_url(&self.base_url, &__courier_uri)"));
        assert!(code.contains("add_header(&mut __courier_request, __courier_name, __courier_value)"));
        assert!(code.contains("add_cookie(&mut __courier_request, __courier_name, __courier_value)"));
        assert!(code.contains("\"Accept\""));
        assert!(code.contains("courier::request::execute(&self.client, __courier_request)?"));
        assert!(code.contains("courier::response::json::<Item>(&__courier_bytes)?"));
        assert!(code.contains("Ok(__courier_result)"));
        assert!(!code.contains("set_content_type"));
        assert!(!code.contains(".body("));
    }

    #[test]
    fn generated_locals_use_reserved_prefix() {
        let code = render(&get_item());
        for line in code.lines().map(str::trim).filter(|l| l.starts_with("let ")) {
            assert!(line.contains("__courier_"), "unprefixed local: {line}");
        }
        assert!(!code.contains("http_"));
    }

    #[test]
    fn method_headers_follow_client_defaults() {
        let code = render(&get_item());
        let defaults = code.find("&self.headers").unwrap();
        let own = code.find("set_header").unwrap();
        let cookie = code.find("\"session\"").unwrap();
        assert!(defaults < own);
        assert!(own < cookie);
    }

    #[test]
    fn status_code_is_returned_alongside() {
        let mut method = get_item();
        method.returns = vec![
            ReturnSlot::new(ReturnCapability::Other, "Vec < Item >"),
            ReturnSlot::new(ReturnCapability::StatusCode, "u16"),
            ReturnSlot::new(ReturnCapability::Error, "ClientError"),
        ];
        method.output = "Result < (Vec < Item >, u16), ClientError >".to_string();
        method.result = ResultKind::Decode(ResultEncoding::Xml);

        let code = render(&method);
        assert!(code.contains("-> Result<(Vec<Item>, u16), ClientError>"));
        assert!(code.contains("let (__courier_status, __courier_bytes)"));
        assert!(code.contains("courier::response::read_body(__courier_response)?"));
        assert!(code.contains("courier::response::xml::<Vec<Item>>(&__courier_bytes)?"));
        assert!(code.contains("Ok((__courier_result, __courier_status))"));
    }

    #[test]
    fn html_decoding() {
        let mut method = get_item();
        method.result = ResultKind::Decode(ResultEncoding::Html);
        method.returns = decoded("String");
        method.output = "Result<String, ClientError>".to_string();
        let code = render(&method);
        assert!(code.contains("courier::response::html::<String>(&__courier_bytes)?"));
    }

    #[test]
    fn request_passthrough_is_not_executed() {
        let mut method = get_item();
        method.result = ResultKind::RequestPassthrough;
        method.output = "Result<reqwest::blocking::Request, ClientError>".to_string();
        let code = render(&method);
        assert!(code.contains("Ok(__courier_request)"));
        assert!(!code.contains("execute"));
    }

    #[test]
    fn response_passthrough_is_not_decoded() {
        let mut method = get_item();
        method.result = ResultKind::ResponsePassthrough;
        method.output = "Result<reqwest::blocking::Response, ClientError>".to_string();
        let code = render(&method);
        assert!(code.contains("Ok(__courier_response)"));
        assert!(!code.contains("read_body"));
    }

    #[test]
    fn stream_parameters_are_mutable() {
        let method = MethodDescriptor {
            name: "upload".to_string(),
            verb: HttpVerb::Put,
            uri: PatternValue::literal("uri", "/upload"),
            request_body: Some(BodyKind::Json),
            single_body: true,
            result: ResultKind::ResponsePassthrough,
            headers: vec![],
            cookies: vec![],
            body_fields: vec![BodyField::new(
                PatternValue::direct("data", "data"),
                FieldType::Stream,
            )],
            parameters: vec![ParameterDescriptor::new("data", ParamType::Stream, "impl std::io::Read")],
            returns: vec![
                ReturnSlot::new(ReturnCapability::ResponsePassthrough, "reqwest::blocking::Response"),
                ReturnSlot::new(ReturnCapability::Error, "ClientError"),
            ],
            output: "Result<reqwest::blocking::Response, ClientError>".to_string(),
        };

        let code = render(&method);
        assert!(code.contains("mut data: impl std::io::Read"));
        assert!(code.contains("courier::body::read_stream(&mut data)?"));
        assert!(code.contains("reqwest::Method::PUT"));
        assert!(code.contains(".body(__courier_body)"));
        assert!(code.contains("courier::request::set_content_type("));
        assert!(code.contains("\"application/json; charset=UTF-8\""));
    }

    #[test]
    fn invalid_parameter_type_is_reported() {
        let mut method = get_item();
        method.parameters[0].rust_type = "Vec<".to_string();
        let err = generate_method(&method).unwrap_err();
        assert!(matches!(err, GeneratorError::CodeGenError(_)));
    }

    #[test]
    fn trait_impl_wraps_every_method() {
        let mut second = get_item();
        second.name = "item_again".to_string();
        let service = ServiceDescriptor {
            name: "Store".to_string(),
            base_url: PatternValue::direct("base_url", "base_url"),
            default_headers: vec![],
            default_cookies: vec![],
            free_identifiers: vec!["base_url".to_string()],
            methods: vec![get_item(), second],
        };

        let tokens = generate_trait_impl(&service).unwrap();
        let code = format_generated_code(&tokens).expect("Failed to format code");
        assert!(code.contains("impl Store for StoreClient"));
        assert!(code.contains("fn item("));
        assert!(code.contains("fn item_again("));
    }
}
