//! Type-reference resolution for payload and identifier types.
//!
//! Turning a declared type into a rendered name and a list of module
//! dependencies depends on the language the catalogue is generated for, so
//! it is injected through [`TypeResolver`]. [`PathResolver`] is the default
//! and understands Rust-style paths such as `blog::Post` or
//! `List<blog::Post>`.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::error::ResolverError;
use crate::schema::Payload;
use crate::types::{ContentDescription, ModuleRef, TypeRef};

/// A resolved payload or identifier type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub type_ref: TypeRef,
    pub module_deps: BTreeSet<ModuleRef>,
    pub rendered_name: String,
}

/// Resolves declared type names for the target language.
pub trait TypeResolver {
    /// Resolve a declared type name.
    ///
    /// # Errors
    ///
    /// Returns `ResolverError` if the name cannot be resolved.
    fn resolve(&self, type_name: &str) -> Result<ResolvedType, ResolverError>;
}

/// Resolves `::`-separated type paths, including generic arguments.
///
/// `a::b::C` depends on module `a::b` and renders as `C`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathResolver;

impl TypeResolver for PathResolver {
    fn resolve(&self, type_name: &str) -> Result<ResolvedType, ResolverError> {
        let type_name = type_name.trim();
        if type_name.is_empty() {
            return Err(unresolvable(type_name, "empty type name"));
        }

        let mut scan = Scan {
            type_name,
            module_deps: BTreeSet::new(),
            rendered_name: String::with_capacity(type_name.len()),
            token: String::new(),
            depth: 0,
            last: Last::Start,
        };

        for c in type_name.chars() {
            match c {
                '<' | '>' | ',' | ' ' => {
                    scan.flush_token()?;
                    scan.separator(c)?;
                }
                c if c.is_alphanumeric() || c == '_' || c == ':' => scan.token.push(c),
                other => {
                    return Err(unresolvable(
                        type_name,
                        &format!("unexpected character '{}'", other),
                    ))
                }
            }
        }
        scan.flush_token()?;

        if scan.depth != 0 {
            return Err(unresolvable(type_name, "unbalanced '<'"));
        }
        if matches!(scan.last, Last::Open | Last::Comma) {
            return Err(unresolvable(type_name, "missing type argument"));
        }

        Ok(ResolvedType {
            type_ref: TypeRef(type_name.to_string()),
            module_deps: scan.module_deps,
            rendered_name: scan.rendered_name,
        })
    }
}

/// Last significant element seen while scanning a type name. Spaces are not
/// significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Last {
    Start,
    Path,
    Open,
    Comma,
    Close,
}

struct Scan<'a> {
    type_name: &'a str,
    module_deps: BTreeSet<ModuleRef>,
    rendered_name: String,
    token: String,
    depth: usize,
    last: Last,
}

impl Scan<'_> {
    /// A path may only start the name or follow `<` or `,`.
    fn flush_token(&mut self) -> Result<(), ResolverError> {
        if self.token.is_empty() {
            return Ok(());
        }
        let path = std::mem::take(&mut self.token);
        if !matches!(self.last, Last::Start | Last::Open | Last::Comma) {
            return Err(unresolvable(
                self.type_name,
                &format!("unexpected type \"{}\"", path),
            ));
        }
        if path.split("::").any(str::is_empty) {
            return Err(unresolvable(
                self.type_name,
                &format!("malformed path segment in \"{}\"", path),
            ));
        }
        match path.rsplit_once("::") {
            Some((module, name)) => {
                self.module_deps.insert(ModuleRef(module.to_string()));
                self.rendered_name.push_str(name);
            }
            None => self.rendered_name.push_str(&path),
        }
        self.last = Last::Path;
        Ok(())
    }

    fn separator(&mut self, c: char) -> Result<(), ResolverError> {
        match c {
            '<' => {
                if self.last != Last::Path {
                    return Err(unresolvable(self.type_name, "'<' without a type before it"));
                }
                self.depth += 1;
                self.last = Last::Open;
            }
            '>' => {
                if !matches!(self.last, Last::Path | Last::Close) {
                    return Err(unresolvable(self.type_name, "missing type argument"));
                }
                self.depth = self
                    .depth
                    .checked_sub(1)
                    .ok_or_else(|| unresolvable(self.type_name, "unbalanced '>'"))?;
                self.last = Last::Close;
            }
            ',' => {
                if self.depth == 0 {
                    return Err(unresolvable(self.type_name, "',' outside type arguments"));
                }
                if !matches!(self.last, Last::Path | Last::Close) {
                    return Err(unresolvable(self.type_name, "missing type argument"));
                }
                self.last = Last::Comma;
            }
            _ => {}
        }
        self.rendered_name.push(c);
        Ok(())
    }
}

fn unresolvable(type_name: &str, message: &str) -> ResolverError {
    ResolverError::Unresolvable {
        type_name: type_name.to_string(),
        message: message.to_string(),
    }
}

/// Build the content description of a declared payload.
///
/// Schema and example text are only kept for structured (XML/JSON) kinds.
///
/// # Errors
///
/// Returns `ResolverError` if the payload's type cannot be resolved.
pub fn describe_payload(
    payload: &Payload,
    resolver: &dyn TypeResolver,
) -> Result<ContentDescription, ResolverError> {
    let resolved = payload
        .type_name
        .as_deref()
        .map(|name| resolver.resolve(name))
        .transpose()?;

    let structured = payload.kind.is_structured();
    let (label, type_ref, type_deps) = match resolved {
        Some(resolved) => (
            resolved.rendered_name,
            Some(resolved.type_ref),
            resolved.module_deps,
        ),
        None => (
            payload.kind.default_label().to_string(),
            None,
            BTreeSet::new(),
        ),
    };

    Ok(ContentDescription {
        kind: payload.kind.clone(),
        label,
        schema_text: payload
            .schema
            .as_ref()
            .filter(|_| structured)
            .map(render_text),
        example_text: payload
            .example
            .as_ref()
            .filter(|_| structured)
            .map(render_text),
        type_ref,
        type_deps,
    })
}

/// Strings are taken verbatim (XML schemas are declared that way), anything
/// else is pretty-printed JSON.
fn render_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
