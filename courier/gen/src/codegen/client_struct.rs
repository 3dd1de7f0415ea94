//! The generated client struct.

use courier_define::{PatternValue, ServiceDescriptor};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::{string_expr, to_ident};

/// Generates `<Service>Client` with its constructors.
///
/// Every free identifier of the service patterns becomes a `String`
/// argument of `new` and `with_client`, in first-seen order. The base URL,
/// default headers and default cookies are evaluated once, at construction.
pub fn generate_client_struct(service: &ServiceDescriptor) -> TokenStream {
    let client_name = format_ident!("{}", service.client_name());
    let doc = format!("HTTP client implementing [`{}`].", service.name);
    let args: Vec<_> = service.free_identifiers.iter().map(|name| to_ident(name)).collect();

    let base_url = string_expr(&service.base_url);
    let headers = service.default_headers.iter().map(pair);
    let cookies = service.default_cookies.iter().map(pair);

    let allow = service
        .free_identifiers
        .iter()
        .any(|name| name.chars().any(|c| c.is_ascii_uppercase()))
        .then(|| quote! { #[allow(non_snake_case)] });

    quote! {
        #[doc = #doc]
        #[derive(Debug, Clone)]
        pub struct #client_name {
            client: reqwest::blocking::Client,
            base_url: String,
            headers: Vec<(String, String)>,
            cookies: Vec<(String, String)>,
        }

        impl #client_name {
            /// Creates a client backed by a default `reqwest` blocking client.
            #allow
            pub fn new(#(#args: String),*) -> Self {
                Self::with_client(reqwest::blocking::Client::new(), #(#args),*)
            }

            /// Creates a client that sends requests through the given HTTP client.
            ///
            /// Use this to configure timeouts, proxies or TLS.
            #allow
            pub fn with_client(__courier_client: reqwest::blocking::Client, #(#args: String),*) -> Self {
                Self {
                    client: __courier_client,
                    base_url: #base_url,
                    headers: vec![#(#headers),*],
                    cookies: vec![#(#cookies),*],
                }
            }

            /// The base URL every request URI is joined onto.
            pub fn base_url(&self) -> &str {
                &self.base_url
            }
        }
    }
}

fn pair(pattern: &PatternValue) -> TokenStream {
    let key = &pattern.key;
    let value = string_expr(pattern);
    quote! { (String::from(#key), #value) }
}
