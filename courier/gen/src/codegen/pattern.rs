//! Value expressions for compiled patterns.
//!
//! Every [`PatternValue`] becomes an expression in the generated code. Which
//! expression depends on the template, never on the field or header it
//! feeds:
//!
//! ```text
//! Literal("text")      -> String::from("text")
//! Direct over `id`     -> id.to_string()
//! Format("/a/{}/b")    -> format!("/a/{}/b", id)
//! ```

use courier_define::{PatternValue, Template};
use proc_macro2::TokenStream;
use quote::quote;

use super::to_ident;

/// Expression evaluating to an owned `String`.
pub fn string_expr(pattern: &PatternValue) -> TokenStream {
    match &pattern.template {
        Template::Literal(text) => quote! { String::from(#text) },
        Template::Direct => {
            debug_assert_eq!(pattern.identifiers.len(), 1);
            let id = pattern.direct_identifier().map(to_ident);
            quote! { #id.to_string() }
        }
        Template::Format(format) => {
            let ids = pattern.identifiers.iter().map(|name| to_ident(name));
            quote! { format!(#format, #(#ids),*) }
        }
    }
}
