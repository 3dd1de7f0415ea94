//! Request body construction.
//!
//! | kind        | built with                                   | content type            |
//! |-------------|----------------------------------------------|-------------------------|
//! | `json`      | `courier::body::Fields`, then `to_json()`    | fixed                   |
//! | `xml`       | `courier::body::Fields`, then `to_xml()`     | fixed                   |
//! | `form`      | `courier::body::FormFields`                  | fixed                   |
//! | `multipart` | `reqwest::blocking::multipart::Form`         | carries the boundary    |
//!
//! Single-body methods skip the field map and encode their one parameter
//! directly.

use courier_define::{BodyField, BodyKind, FieldType, MethodDescriptor, Template};
use proc_macro2::TokenStream;
use quote::quote;

use super::{string_expr, to_ident};

/// Tokens a generated method needs to send a body.
#[derive(Debug, Clone)]
pub struct RequestBody {
    /// Statements run before the request is built.
    pub setup: TokenStream,
    /// Call chained onto the `RequestBuilder`.
    pub attach: TokenStream,
    /// `&str` expression of the `Content-Type` value.
    pub content_type: TokenStream,
}

/// Body tokens for `method`, or `None` when the request has no body.
pub fn generate_body(method: &MethodDescriptor) -> Option<RequestBody> {
    if !method.has_body() {
        return None;
    }
    let kind = method.request_body?;

    let body = match kind {
        BodyKind::Json | BodyKind::Xml if method.single_body => single_body(kind, &method.body_fields[0]),
        BodyKind::Json | BodyKind::Xml => field_map(kind, &method.body_fields),
        BodyKind::Form => form(&method.body_fields),
        BodyKind::Multipart => multipart(&method.body_fields),
    };
    Some(body)
}

fn fixed_content_type(kind: BodyKind) -> TokenStream {
    let content_type = kind.content_type().unwrap_or_default();
    quote! { #content_type }
}

fn single_body(kind: BodyKind, field: &BodyField) -> RequestBody {
    let id = to_ident(field.pattern.direct_identifier().unwrap_or(field.key()));
    let setup = match (field.ty, kind) {
        (FieldType::Stream, _) => quote! {
            let __courier_body = courier::body::read_stream(&mut #id)?;
        },
        (_, BodyKind::Xml) => quote! {
            let __courier_body = courier::body::xml(&#id)?;
        },
        _ => quote! {
            let __courier_body = courier::body::json(&#id)?;
        },
    };
    RequestBody {
        setup,
        attach: quote! { .body(__courier_body) },
        content_type: fixed_content_type(kind),
    }
}

fn field_map(kind: BodyKind, fields: &[BodyField]) -> RequestBody {
    let inserts = fields.iter().map(|field| {
        let key = field.key();
        match (field.ty, field.pattern.direct_identifier()) {
            (FieldType::Stream, Some(name)) => {
                let id = to_ident(name);
                quote! { __courier_fields.insert_stream(#key, &mut #id)?; }
            }
            // unannotated integers and composites keep their JSON type
            (FieldType::Int | FieldType::Other, Some(name)) => {
                let id = to_ident(name);
                quote! { __courier_fields.insert_value(#key, &#id)?; }
            }
            _ => {
                let value = string_expr(&field.pattern);
                quote! { __courier_fields.insert_text(#key, #value); }
            }
        }
    });
    let encode = match kind {
        BodyKind::Xml => quote! { __courier_fields.to_xml()? },
        _ => quote! { __courier_fields.to_json()? },
    };

    RequestBody {
        setup: quote! {
            let mut __courier_fields = courier::body::Fields::new();
            #(#inserts)*
            let __courier_body = #encode;
        },
        attach: quote! { .body(__courier_body) },
        content_type: fixed_content_type(kind),
    }
}

fn form(fields: &[BodyField]) -> RequestBody {
    let adds = fields.iter().map(|field| {
        let key = field.key();
        let value = string_expr(&field.pattern);
        quote! { __courier_form.add(#key, #value); }
    });

    RequestBody {
        setup: quote! {
            let mut __courier_form = courier::body::FormFields::new();
            #(#adds)*
            let __courier_body = __courier_form.into_bytes();
        },
        attach: quote! { .body(__courier_body) },
        content_type: fixed_content_type(BodyKind::Form),
    }
}

fn multipart(fields: &[BodyField]) -> RequestBody {
    let parts = fields.iter().map(|field| {
        let key = field.key();
        match (field.ty, &field.pattern.template) {
            (FieldType::Stream, Template::Direct) => {
                let id = to_ident(field.pattern.direct_identifier().unwrap_or(key));
                quote! {
                    __courier_form = __courier_form.part(#key, courier::body::stream_part(&mut #id)?);
                }
            }
            (FieldType::File, _) => {
                let path = string_expr(&field.pattern);
                quote! {
                    __courier_form = __courier_form.file(#key, #path).map_err(courier::ClientError::Io)?;
                }
            }
            _ => {
                let value = string_expr(&field.pattern);
                quote! { __courier_form = __courier_form.text(#key, #value); }
            }
        }
    });

    RequestBody {
        setup: quote! {
            let mut __courier_form = reqwest::blocking::multipart::Form::new();
            #(#parts)*
            let __courier_content_type = courier::request::multipart_content_type(&__courier_form);
        },
        attach: quote! { .multipart(__courier_form) },
        content_type: quote! { &__courier_content_type },
    }
}

#[cfg(test)]
mod tests {
    use courier_define::{HttpVerb, PatternValue, ResultEncoding, ResultKind};

    use super::*;

    fn method(kind: Option<BodyKind>, single_body: bool, fields: Vec<BodyField>) -> MethodDescriptor {
        MethodDescriptor {
            name: "send".to_string(),
            verb: HttpVerb::Post,
            uri: PatternValue::literal("uri", "/send"),
            request_body: kind,
            single_body,
            result: ResultKind::Decode(ResultEncoding::Json),
            headers: vec![],
            cookies: vec![],
            body_fields: fields,
            parameters: vec![],
            returns: vec![],
            output: String::new(),
        }
    }

    fn direct(name: &str, ty: FieldType) -> BodyField {
        BodyField::new(PatternValue::direct(name, name), ty)
    }

    fn setup_text(body: &RequestBody) -> String {
        body.setup.to_string()
    }

    #[test]
    fn no_fields_means_no_body() {
        assert!(generate_body(&method(Some(BodyKind::Json), false, vec![])).is_none());
        assert!(generate_body(&method(None, false, vec![])).is_none());
    }

    #[test]
    fn json_field_map() {
        let body = generate_body(&method(
            Some(BodyKind::Json),
            false,
            vec![
                direct("id", FieldType::Int),
                BodyField::new(PatternValue::literal("kind", "book"), FieldType::String),
                direct("cover", FieldType::Stream),
            ],
        ))
        .unwrap();

        let code = setup_text(&body);
        assert!(code.contains(&quote! { __courier_fields.insert_value("id", &id)?; }.to_string()));
        assert!(code.contains(&quote! { __courier_fields.insert_text("kind", String::from("book")); }.to_string()));
        assert!(code.contains(&quote! { __courier_fields.insert_stream("cover", &mut cover)?; }.to_string()));
        assert!(code.contains(&quote! { __courier_fields.to_json()? }.to_string()));
        assert_eq!(body.content_type.to_string(), "\"application/json; charset=UTF-8\"");
    }

    #[test]
    fn annotated_params_are_sent_as_text() {
        let body = generate_body(&method(
            Some(BodyKind::Json),
            false,
            vec![
                BodyField::new(PatternValue::direct("n", "count"), FieldType::String),
                direct("type", FieldType::Int),
            ],
        ))
        .unwrap();

        let code = setup_text(&body);
        assert!(code.contains(&quote! { __courier_fields.insert_text("n", count.to_string()); }.to_string()));
        assert!(code.contains(&quote! { __courier_fields.insert_value("type", &r#type)?; }.to_string()));
    }

    #[test]
    fn xml_field_map() {
        let body = generate_body(&method(
            Some(BodyKind::Xml),
            false,
            vec![direct("name", FieldType::String)],
        ))
        .unwrap();
        assert!(setup_text(&body).contains(&quote! { __courier_fields.to_xml()? }.to_string()));
        assert_eq!(body.content_type.to_string(), "\"application/xml; charset=UTF-8\"");
    }

    #[test]
    fn single_body_encodes_the_parameter() {
        let body = generate_body(&method(
            Some(BodyKind::Xml),
            true,
            vec![direct("item", FieldType::Other)],
        ))
        .unwrap();
        assert_eq!(
            setup_text(&body),
            quote! { let __courier_body = courier::body::xml(&item)?; }.to_string()
        );
    }

    #[test]
    fn single_stream_body_is_read() {
        let body = generate_body(&method(
            Some(BodyKind::Json),
            true,
            vec![direct("reader", FieldType::Stream)],
        ))
        .unwrap();
        assert_eq!(
            setup_text(&body),
            quote! { let __courier_body = courier::body::read_stream(&mut reader)?; }.to_string()
        );
    }

    #[test]
    fn form_adds_string_values() {
        let body = generate_body(&method(
            Some(BodyKind::Form),
            false,
            vec![
                direct("page", FieldType::Int),
                BodyField::new(
                    PatternValue::formatted("q", "name:{}", vec!["name".to_string()]),
                    FieldType::String,
                ),
            ],
        ))
        .unwrap();

        let code = setup_text(&body);
        assert!(code.contains(&quote! { __courier_form.add("page", page.to_string()); }.to_string()));
        assert!(code.contains(&quote! { __courier_form.add("q", format!("name:{}", name)); }.to_string()));
        assert!(code.contains("into_bytes"));
        assert_eq!(body.attach.to_string(), quote! { .body(__courier_body) }.to_string());
    }

    #[test]
    fn multipart_parts() {
        let body = generate_body(&method(
            Some(BodyKind::Multipart),
            false,
            vec![
                direct("title", FieldType::String),
                direct("photo", FieldType::Stream),
                BodyField::new(PatternValue::direct("avatar", "path"), FieldType::File),
            ],
        ))
        .unwrap();

        let code = setup_text(&body);
        assert!(code.contains(&quote! { __courier_form = __courier_form.text("title", title.to_string()); }.to_string()));
        assert!(code.contains(&quote! { courier::body::stream_part(&mut photo)? }.to_string()));
        assert!(code.contains(
            &quote! { __courier_form = __courier_form.file("avatar", path.to_string()).map_err(courier::ClientError::Io)?; }
                .to_string()
        ));
        assert!(code.contains("multipart_content_type"));
        assert_eq!(body.attach.to_string(), quote! { .multipart(__courier_form) }.to_string());
        assert_eq!(body.content_type.to_string(), quote! { &__courier_content_type }.to_string());
    }
}
