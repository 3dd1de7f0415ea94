//! Output assembly and file writing for generated code.
//!
//! This module handles the final phase of code generation: assembling the
//! client struct and trait implementation into one Rust file, validating
//! it, formatting it, and writing it to disk atomically.
//!
//! ## Output Structure
//!
//! One file per service, named after the trait and placed next to it:
//! ```text
//! src/api/
//! ├── store.rs        # the annotated `Store` trait
//! └── store_impl.rs   # generated `StoreClient`
//! ```
//!
//! The generated file starts with `use <module>::*;`, so it is meant to be
//! declared as a child of the module that defines the trait.
//!
//! ## Safety Guarantees
//!
//! - **Validation**: All generated code is validated with `syn` before writing
//! - **Formatting**: Output is formatted with `prettyplease` for consistent style
//! - **Atomic writes**: Uses temp file + rename pattern to prevent partial writes

use std::fs;
use std::path::Path;

use courier_define::ServiceDescriptor;
use proc_macro2::TokenStream;
use quote::quote;
use tracing::{info, instrument};

use crate::codegen::{generate_client_struct, generate_trait_impl};
use crate::errors::GeneratorError;

/// Normalizes the module path the generated `use` imports from.
///
/// Relative roots (`crate`, `super`, `self`) are kept; any other path is
/// taken relative to the crate root. An empty path means the parent module.
///
/// ## Examples
///
/// ```
/// use courier_gen::output::normalize_module_path;
///
/// assert_eq!(normalize_module_path("api::store"), "crate::api::store");
/// assert_eq!(normalize_module_path("super"), "super");
/// assert_eq!(normalize_module_path(""), "super");
/// ```
pub fn normalize_module_path(raw: &str) -> String {
    let raw = raw.trim().trim_start_matches("::");
    let root = raw.split("::").next().unwrap_or_default();
    match root {
        "" => "super".to_string(),
        "crate" | "super" | "self" => raw.to_string(),
        _ => format!("crate::{}", raw),
    }
}

/// Assembles the complete generated file for `service`.
///
/// ## Arguments
///
/// * `service` - The resolved service
/// * `module` - Path of the module defining the trait (`crate::api`, `super`)
///
/// ## Errors
///
/// Returns [`GeneratorError::ConfigError`] when `module` is not a path and
/// [`GeneratorError::CodeGenError`] when a declared type cannot be re-parsed.
pub fn assemble_client_module(
    service: &ServiceDescriptor,
    module: &str,
) -> Result<TokenStream, GeneratorError> {
    let module: syn::Path = syn::parse_str(module)
        .map_err(|e| GeneratorError::ConfigError(format!("Invalid module path '{}': {}", module, e)))?;
    let client_struct = generate_client_struct(service);
    let trait_impl = generate_trait_impl(service)?;

    Ok(quote! {
        use #module::*;

        #client_struct

        #trait_impl
    })
}

/// Validates generated code by parsing it with syn.
///
/// ## Errors
///
/// Returns an error if the code is not syntactically valid Rust.
pub fn validate_code(tokens: &TokenStream) -> Result<syn::File, GeneratorError> {
    syn::parse2(tokens.clone())
        .map_err(|e| GeneratorError::CodeGenError(format!("Generated code is invalid: {}", e)))
}

/// Formats generated code using prettyplease.
///
/// Prepends a notice naming the source trait and the generation time as
/// regular comments.
pub fn format_code(file: &syn::File, service: &str, module: &str) -> String {
    let formatted = prettyplease::unparse(file);
    format!(
        "// This code was automatically generated by courier-gen. Do not edit manually.\n\
         //\n\
         // Generated: {timestamp}\n\
         // Generator: courier-gen v{version}\n\
         // Service: {module}::{service}\n\n\
         {formatted}",
        timestamp = chrono::Utc::now().to_rfc3339(),
        version = env!("CARGO_PKG_VERSION"),
    )
}

/// Writes content to a file atomically using temp file + rename.
///
/// Other processes see either the old or the new content, never a mix.
/// Parent directories are created as needed.
///
/// ## Errors
///
/// Returns an error if directory creation, writing, or renaming fails.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| GeneratorError::WriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// Generates the client for `service` and writes `<lower>_impl.rs`.
///
/// ## Arguments
///
/// * `service` - The resolved service
/// * `module` - Path of the module defining the trait
/// * `output_dir` - Directory the file is written to
/// * `dry_run` - If true, print the code instead of writing it
///
/// ## Returns
///
/// The formatted code.
///
/// ## Errors
///
/// Returns an error if code generation produces invalid Rust or the file
/// cannot be written. Nothing is written on error.
#[instrument(skip_all, fields(service = %service.name, dry_run))]
pub fn generate_and_write(
    service: &ServiceDescriptor,
    module: &str,
    output_dir: &Path,
    dry_run: bool,
) -> Result<String, GeneratorError> {
    let tokens = assemble_client_module(service, module)?;
    let file = validate_code(&tokens)?;
    let formatted = format_code(&file, &service.name, module);
    let filename = service.impl_file_name();

    if dry_run {
        println!("=== {} ===\n{}\n", filename, formatted);
    } else {
        let path = output_dir.join(&filename);
        write_atomic(&path, &formatted)?;
        info!(path = %path.display(), methods = service.methods.len(), "wrote client");
    }

    Ok(formatted)
}
