//! Token emission for generated clients.
//!
//! Each submodule turns one part of a resolved descriptor into a
//! `proc_macro2::TokenStream`:
//!
//! - [`client_struct`] - the `<Service>Client` struct and its constructors
//! - [`method`] - one trait method implementation per [`MethodDescriptor`]
//! - [`body`] - request body construction for each body kind
//! - [`pattern`] - `String` expressions for compiled patterns
//!
//! Names of locals introduced by generated code all start with
//! [`RESERVED_PREFIX`](crate::pattern::RESERVED_PREFIX). The resolvers reject identifiers with that prefix, so
//! they never collide with the parameters a user declared.
//!
//! The streams are validated with `syn` and formatted with `prettyplease`
//! by [`crate::output`].
//!
//! [`MethodDescriptor`]: courier_define::MethodDescriptor

pub mod body;
pub mod client_struct;
pub mod method;
pub mod pattern;

use proc_macro2::{Ident, Span};

use crate::errors::GeneratorError;

pub use client_struct::generate_client_struct;
pub use method::{generate_method, generate_trait_impl};
pub use pattern::string_expr;

/// Builds an identifier, falling back to a raw identifier for keywords.
pub(crate) fn to_ident(name: &str) -> Ident {
    match syn::parse_str::<Ident>(name) {
        Ok(ident) => ident,
        Err(_) if !matches!(name, "self" | "Self" | "super" | "crate" | "_") => {
            Ident::new_raw(name, Span::call_site())
        }
        Err(_) => Ident::new(name, Span::call_site()),
    }
}

/// Parses the token text of a declared type back into a [`syn::Type`].
pub(crate) fn parse_type(text: &str) -> Result<syn::Type, GeneratorError> {
    syn::parse_str(text)
        .map_err(|e| GeneratorError::CodeGenError(format!("Invalid type '{}': {}", text, e)))
}
