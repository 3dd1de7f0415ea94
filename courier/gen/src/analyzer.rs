//! Source analysis.
//!
//! Reads a Rust source file with `syn`, finds the service trait and reports
//! what the resolvers need: doc text, parameters classified by
//! [`ParamType`], and return slots tagged with a [`ReturnCapability`].
//!
//! Type names are resolved through the file's `use` declarations, so
//! `use std::io::Read as Input;` followed by `impl Input` is still a stream.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use courier_define::{
    ParamType, ParameterDescriptor, ReturnCapability, ReturnSlot, SourceMethod, SourceService,
};
use quote::ToTokens;
use syn::ext::IdentExt;
use syn::{
    Attribute, Expr, FnArg, GenericArgument, ItemTrait, Lit, Meta, Pat, PathArguments,
    ReturnType, Signature, TraitItem, Type, TypeParamBound, UseTree,
};
use tracing::{debug, instrument};

use crate::errors::{AnalyzeError, GeneratorError};

const INT_TYPES: &[&str] = &[
    "i8", "i16", "i32", "i64", "isize", "u8", "u16", "u32", "u64", "usize",
];

const STRING_PATHS: &[&str] = &["String", "std::string::String", "alloc::string::String"];
const READ_PATHS: &[&str] = &["std::io::Read", "std::io::prelude::Read"];
const STD_ERROR_PATHS: &[&str] = &["std::error::Error", "core::error::Error"];
const RESULT_PATHS: &[&str] = &["Result", "std::result::Result", "core::result::Result"];

/// Capability predicates, checked in order against a resolved type path.
const CAPABILITIES: &[(&[&str], ReturnCapability)] = &[
    (
        &["courier::ClientError", "courier::error::ClientError", "anyhow::Error"],
        ReturnCapability::Error,
    ),
    (&["u16"], ReturnCapability::StatusCode),
    (&["reqwest::blocking::Request"], ReturnCapability::RequestPassthrough),
    (&["reqwest::blocking::Response"], ReturnCapability::ResponsePassthrough),
];

/// Names brought into scope by `use` declarations.
#[derive(Debug, Default)]
struct Imports {
    /// Local name to full path.
    names: HashMap<String, String>,
    /// Glob-imported module paths.
    globs: Vec<String>,
}

impl Imports {
    fn from_file(file: &syn::File) -> Self {
        let mut imports = Self::default();
        for item in &file.items {
            if let syn::Item::Use(item) = item {
                imports.collect(&item.tree, String::new());
            }
        }
        imports
    }

    fn collect(&mut self, tree: &UseTree, prefix: String) {
        let join = |ident: &str| {
            if prefix.is_empty() {
                ident.to_string()
            } else {
                format!("{prefix}::{ident}")
            }
        };
        match tree {
            UseTree::Path(path) => self.collect(&path.tree, join(&path.ident.to_string())),
            UseTree::Name(name) if name.ident == "self" => {
                if let Some(last) = prefix.rsplit("::").next() {
                    self.names.insert(last.to_string(), prefix.clone());
                }
            }
            UseTree::Name(name) => {
                let ident = name.ident.to_string();
                self.names.insert(ident.clone(), join(&ident));
            }
            UseTree::Rename(rename) => {
                let target = if rename.ident == "self" {
                    prefix.clone()
                } else {
                    join(&rename.ident.to_string())
                };
                self.names.insert(rename.rename.to_string(), target);
            }
            UseTree::Glob(_) => self.globs.push(prefix.clone()),
            UseTree::Group(group) => {
                for tree in &group.items {
                    self.collect(tree, prefix.clone());
                }
            }
        }
    }

    /// Resolves a path to its fully qualified text, as far as imports allow.
    fn resolve(&self, path: &syn::Path) -> String {
        let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
        let Some((first, rest)) = segments.split_first() else {
            return String::new();
        };
        let head = self.names.get(first).cloned().unwrap_or_else(|| first.clone());
        std::iter::once(head)
            .chain(rest.iter().cloned())
            .collect::<Vec<_>>()
            .join("::")
    }

    /// Whether `path` names one of `candidates`, directly, through an
    /// import, or through a glob import.
    fn names_any(&self, path: &syn::Path, candidates: &[&str]) -> bool {
        let resolved = self.resolve(path);
        if candidates.contains(&resolved.as_str()) {
            return true;
        }
        path.segments.len() == 1
            && !self.names.contains_key(&resolved)
            && self
                .globs
                .iter()
                .any(|glob| candidates.contains(&format!("{glob}::{resolved}").as_str()))
    }
}

/// Joins the `#[doc]` attributes of an item into one text.
///
/// Leading `*` of block doc comment lines is dropped.
fn doc_text(attrs: &[Attribute]) -> String {
    let mut lines = Vec::new();
    for attr in attrs {
        let Meta::NameValue(meta) = &attr.meta else {
            continue;
        };
        if !meta.path.is_ident("doc") {
            continue;
        }
        if let Expr::Lit(expr) = &meta.value
            && let Lit::Str(text) = &expr.lit
        {
            for line in text.value().lines() {
                let trimmed = line.trim_start();
                lines.push(trimmed.strip_prefix('*').unwrap_or(trimmed).to_string());
            }
        }
    }
    lines.join("\n")
}

fn tokens(node: &impl ToTokens) -> String {
    node.to_token_stream().to_string()
}

/// Reads and analyzes the trait `name` in the file at `path`.
#[instrument(skip_all, fields(path = %path.display(), service = name))]
pub fn analyze_file(path: &Path, name: &str) -> Result<SourceService, GeneratorError> {
    let source = fs::read_to_string(path).map_err(|e| GeneratorError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(analyze_source(&source, name)?)
}

/// Analyzes the trait `name` in Rust source text.
///
/// ## Examples
///
/// ```
/// use courier_define::{ParamType, ReturnCapability};
/// use courier_gen::analyzer::analyze_source;
///
/// let source = r#"
///     use courier::ClientError;
///
///     /// @Base https://store.test
///     pub trait Store {
///         /// @Get /items/{id}
///         /// @Result json
///         fn item(&self, id: u64) -> Result<String, ClientError>;
///     }
/// "#;
///
/// let service = analyze_source(source, "Store").unwrap();
/// assert_eq!(service.docs, "@Base https://store.test");
/// let method = &service.methods[0];
/// assert_eq!(method.params[0].ty, ParamType::Int);
/// assert_eq!(method.returns[1].capability, ReturnCapability::Error);
/// ```
pub fn analyze_source(source: &str, name: &str) -> Result<SourceService, AnalyzeError> {
    let file = syn::parse_file(source)?;
    let imports = Imports::from_file(&file);

    let item = file
        .items
        .iter()
        .find_map(|item| match item {
            syn::Item::Trait(item) if item.ident == name => Some(item),
            _ => None,
        })
        .ok_or_else(|| AnalyzeError::TraitNotFound(name.to_string()))?;

    analyze_trait(item, &imports)
}

fn analyze_trait(item: &ItemTrait, imports: &Imports) -> Result<SourceService, AnalyzeError> {
    let mut methods = Vec::new();
    for trait_item in &item.items {
        let TraitItem::Fn(func) = trait_item else {
            continue;
        };
        if func.default.is_some() {
            debug!(method = %func.sig.ident, "skipping method with a default body");
            continue;
        }
        methods.push(analyze_method(&func.sig, &func.attrs, imports)?);
    }

    Ok(SourceService {
        name: item.ident.to_string(),
        docs: doc_text(&item.attrs),
        methods,
    })
}

fn analyze_method(
    sig: &Signature,
    attrs: &[Attribute],
    imports: &Imports,
) -> Result<SourceMethod, AnalyzeError> {
    let name = sig.ident.unraw().to_string();
    let unsupported = |reason: &str| AnalyzeError::UnsupportedMethod {
        method: name.clone(),
        reason: reason.to_string(),
    };

    if sig.asyncness.is_some() {
        return Err(unsupported("async methods are not supported"));
    }
    if !sig.generics.params.is_empty() {
        return Err(unsupported("generic methods are not supported"));
    }

    let mut inputs = sig.inputs.iter();
    match inputs.next() {
        Some(FnArg::Receiver(receiver))
            if receiver.reference.is_some() && receiver.mutability.is_none() => {}
        _ => return Err(unsupported("the first parameter must be &self")),
    }

    let mut params = Vec::new();
    for input in inputs {
        let FnArg::Typed(typed) = input else {
            return Err(unsupported("unexpected receiver"));
        };
        let Pat::Ident(pat) = typed.pat.as_ref() else {
            return Err(unsupported("parameters must be plain identifiers"));
        };
        params.push(ParameterDescriptor::new(
            pat.ident.unraw().to_string(),
            param_type(&typed.ty, imports),
            tokens(&typed.ty),
        ));
    }

    let (returns, output) = match &sig.output {
        ReturnType::Default => (Vec::new(), "()".to_string()),
        ReturnType::Type(_, ty) => (flatten_returns(ty, imports), tokens(ty)),
    };

    debug!(method = %name, params = params.len(), arity = returns.len(), "analyzed method");

    Ok(SourceMethod {
        name,
        docs: doc_text(attrs),
        params,
        returns,
        output,
    })
}

/// Classifies a parameter type.
fn param_type(ty: &Type, imports: &Imports) -> ParamType {
    match ty {
        Type::Path(path) if path.qself.is_none() => {
            if path.path.segments.len() == 1 && path.path.segments[0].arguments.is_empty() {
                let ident = path.path.segments[0].ident.to_string();
                if INT_TYPES.contains(&ident.as_str()) && !imports.names.contains_key(&ident) {
                    return ParamType::Int;
                }
            }
            if imports.names_any(&path.path, STRING_PATHS) {
                return ParamType::String;
            }
            if boxed_read(&path.path, imports) {
                return ParamType::Stream;
            }
            ParamType::Other
        }
        Type::Reference(reference) => match reference.elem.as_ref() {
            Type::Path(path) if path.path.is_ident("str") && reference.mutability.is_none() => {
                ParamType::String
            }
            Type::Path(path)
                if reference.mutability.is_none() && imports.names_any(&path.path, STRING_PATHS) =>
            {
                ParamType::String
            }
            Type::TraitObject(obj) if reference.mutability.is_some() => {
                stream_if_read(obj.bounds.iter(), imports)
            }
            Type::ImplTrait(imp) if reference.mutability.is_some() => {
                stream_if_read(imp.bounds.iter(), imports)
            }
            _ => ParamType::Other,
        },
        Type::ImplTrait(imp) => stream_if_read(imp.bounds.iter(), imports),
        Type::Paren(paren) => param_type(&paren.elem, imports),
        _ => ParamType::Other,
    }
}

fn is_read_bound<'a>(
    mut bounds: impl Iterator<Item = &'a TypeParamBound>,
    imports: &Imports,
) -> bool {
    bounds.any(|bound| match bound {
        TypeParamBound::Trait(bound) => imports.names_any(&bound.path, READ_PATHS),
        _ => false,
    })
}

fn stream_if_read<'a>(
    bounds: impl Iterator<Item = &'a TypeParamBound>,
    imports: &Imports,
) -> ParamType {
    if is_read_bound(bounds, imports) {
        ParamType::Stream
    } else {
        ParamType::Other
    }
}

/// `Box<dyn Read (+ ...)>`.
fn boxed_read(path: &syn::Path, imports: &Imports) -> bool {
    match single_type_arg(path, &["Box", "std::boxed::Box", "alloc::boxed::Box"], imports) {
        Some(Type::TraitObject(obj)) => is_read_bound(obj.bounds.iter(), imports),
        _ => false,
    }
}

/// Generic type arguments of `path` if it names one of `candidates`.
fn type_args<'a>(path: &'a syn::Path, candidates: &[&str], imports: &Imports) -> Option<Vec<&'a Type>> {
    if !imports.names_any(path, candidates) {
        return None;
    }
    let last = path.segments.last()?;
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    Some(
        args.args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
    )
}

fn single_type_arg<'a>(path: &'a syn::Path, candidates: &[&str], imports: &Imports) -> Option<&'a Type> {
    match type_args(path, candidates, imports)?.as_slice() {
        [ty] => Some(*ty),
        _ => None,
    }
}

/// Flattens a declared return type into slots.
///
/// `Result<T, E>` gives `[T, E]`, `Result<(T, S), E>` gives `[T, S, E]`,
/// `anyhow::Result<T>` uses `anyhow::Error` as `E`. Anything else is a
/// single slot.
fn flatten_returns(ty: &Type, imports: &Imports) -> Vec<ReturnSlot> {
    let slot = |ty: &Type| ReturnSlot::new(capability(ty, imports), tokens(ty));

    let Type::Path(path) = ty else {
        return vec![slot(ty)];
    };

    let (ok, err) = if let Some(args) = type_args(&path.path, RESULT_PATHS, imports)
        && let [ok, err] = args.as_slice()
    {
        (*ok, slot(*err))
    } else if let Some(ok) = single_type_arg(&path.path, &["anyhow::Result"], imports) {
        (ok, ReturnSlot::new(ReturnCapability::Error, "anyhow::Error"))
    } else {
        return vec![slot(ty)];
    };

    let mut slots = match ok {
        Type::Tuple(tuple) => tuple.elems.iter().map(slot).collect(),
        other => vec![slot(other)],
    };
    slots.push(err);
    slots
}

/// Tags one return slot.
fn capability(ty: &Type, imports: &Imports) -> ReturnCapability {
    let Type::Path(path) = ty else {
        return ReturnCapability::Other;
    };
    if let Some(Type::TraitObject(obj)) =
        single_type_arg(&path.path, &["Box", "std::boxed::Box"], imports)
    {
        let is_error = obj.bounds.iter().any(|bound| match bound {
            TypeParamBound::Trait(bound) => imports.names_any(&bound.path, STD_ERROR_PATHS),
            _ => false,
        });
        return if is_error {
            ReturnCapability::Error
        } else {
            ReturnCapability::Other
        };
    }
    CAPABILITIES
        .iter()
        .find(|(paths, _)| imports.names_any(&path.path, paths))
        .map_or(ReturnCapability::Other, |(_, capability)| *capability)
}
