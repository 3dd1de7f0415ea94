//! Courier code generator library.
//!
//! This crate generates blocking HTTP client implementations from Rust
//! traits whose doc comments carry annotations:
//!
//! ```text
//! /// @Base https://{host}/api
//! /// @Header(Authorization) Bearer {token}
//! pub trait Store {
//!     /// @Get /items/{id}
//!     /// @Result json
//!     fn item(&self, id: u64) -> Result<Item, ClientError>;
//! }
//! ```
//!
//! becomes `StoreClient::new(host, token)` implementing `Store`.
//!
//! ## Pipeline
//!
//! 1. [`analyzer`] - reads the trait from a source file with `syn`
//! 2. [`scanner`] - splits doc comments into `@Name(Key) Value` triples
//! 3. [`pattern`] - compiles `{identifier}` templates against a scope
//! 4. [`resolve`] - folds annotations into validated descriptors
//! 5. [`codegen`] - emits the client struct and trait implementation
//! 6. [`output`] - validation, formatting and atomic file writing
//!
//! Errors of every stage are collected in [`errors`].
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::path::Path;
//! use courier_gen::generate_from_file;
//!
//! let code = generate_from_file(
//!     Path::new("src/api.rs"),
//!     "Store",
//!     "crate::api",
//!     None,
//!     true,
//! )
//! .unwrap();
//! println!("{}", code);
//! ```

use std::path::Path;

pub mod analyzer;
pub mod codegen;
pub mod errors;
pub mod output;
pub mod pattern;
pub mod resolve;
pub mod scanner;
#[cfg(test)]
mod test_utils;

use errors::GeneratorError;

/// Runs the whole pipeline for trait `service` in the file at `path`.
///
/// The generated file is written to `out_dir`, or next to `path` when
/// `out_dir` is `None`. Nothing is written when `dry_run` is set or when
/// any stage fails.
///
/// ## Errors
///
/// Returns the first error of any stage.
pub fn generate_from_file(
    path: &Path,
    service: &str,
    module: &str,
    out_dir: Option<&Path>,
    dry_run: bool,
) -> Result<String, GeneratorError> {
    let source = analyzer::analyze_file(path, service)?;
    let descriptor = resolve::resolve_service(&source)?;
    let out_dir = out_dir
        .or_else(|| path.parent())
        .unwrap_or_else(|| Path::new("."));
    output::generate_and_write(&descriptor, &output::normalize_module_path(module), out_dir, dry_run)
}
