//! Resource document linting - static analysis of resource files.
//!
//! Checks resource documents for:
//! - JSON syntax and document shape errors
//! - Payload examples that don't match their declared schemas
//! - Duplicate path segments and dangling static endpoints
//! - Types that cannot be resolved
//! - Endpoints that yield no actions

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::combinator::{HandlerCombinator, SetCombinator};
use crate::derive::derive_actions;
use crate::identifier::identifier;
use crate::loader::{load_json, parse_resource};
use crate::resolver::PathResolver;
use crate::schema::{Cardinality, Endpoint, Getter, Handlers, IdSpec, ListGetter, Resource, Step};
use crate::types::DeriveOptions;
use crate::validator::validate_examples;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic message from linting.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    pub file: PathBuf,
    /// Location of the issue in the document (e.g., "/schema/step/named/1")
    pub path: String,
    pub message: String,
}

/// Result of linting a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub file: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Status of a linted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Ok,
    Error,
    Warning,
}

/// Result of linting a directory or set of files.
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    pub path: PathBuf,
    pub files_checked: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub results: Vec<FileResult>,
}

impl LintResult {
    /// Returns true if all files passed (no errors).
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }
}

/// Lint a file or directory.
///
/// If path is a directory, recursively finds all .json files.
/// If `strict` is true, files with warnings count as failed.
pub fn lint(path: &Path, strict: bool) -> LintResult {
    let files = collect_resource_files(path);
    let results: Vec<FileResult> = files.iter().map(|file| lint_file(file, path)).collect();

    let count = |severity: Severity| {
        results
            .iter()
            .flat_map(|r| &r.diagnostics)
            .filter(|d| d.severity == severity)
            .count()
    };
    let errors = count(Severity::Error);
    let warnings = count(Severity::Warning);

    let failed = results
        .iter()
        .filter(|r| {
            if strict {
                r.status != FileStatus::Ok
            } else {
                r.status == FileStatus::Error
            }
        })
        .count();

    LintResult {
        path: path.to_path_buf(),
        files_checked: files.len(),
        passed: files.len() - failed,
        failed,
        errors,
        warnings,
        results,
    }
}

/// Lint a single resource file.
pub fn lint_file(file: &Path, base_path: &Path) -> FileResult {
    let mut lint = FileLint {
        file,
        diagnostics: Vec::new(),
    };

    let parsed = load_json(file).and_then(parse_resource);
    match parsed {
        Ok(resource) => lint.resource(&resource, ""),
        Err(e) => lint.error("E001", "/", format!("invalid resource document: {}", e)),
    }

    let FileLint { diagnostics, .. } = lint;
    let status = if diagnostics.iter().any(|d| d.severity == Severity::Error) {
        FileStatus::Error
    } else if diagnostics.is_empty() {
        FileStatus::Ok
    } else {
        FileStatus::Warning
    };

    FileResult {
        file: file.strip_prefix(base_path).unwrap_or(file).to_path_buf(),
        status,
        diagnostics,
    }
}

struct FileLint<'a> {
    file: &'a Path,
    diagnostics: Vec<Diagnostic>,
}

impl FileLint<'_> {
    fn error(&mut self, code: &str, path: &str, message: String) {
        self.push(Severity::Error, code, path, message);
    }

    fn warning(&mut self, code: &str, path: &str, message: String) {
        self.push(Severity::Warning, code, path, message);
    }

    fn push(&mut self, severity: Severity, code: &str, path: &str, message: String) {
        self.diagnostics.push(Diagnostic {
            severity,
            code: code.to_string(),
            file: self.file.to_path_buf(),
            path: if path.is_empty() { "/".to_string() } else { path.to_string() },
            message,
        });
    }

    /// Check one resource; `path` is its location in the document.
    fn resource(&mut self, resource: &Resource, path: &str) {
        if resource.description.is_none() {
            self.warning(
                "W002",
                path,
                format!("resource \"{}\" has no description", resource.name),
            );
        }

        self.step(resource, path);
        self.top_level(resource, path);
        self.handler_lists(&resource.handlers, path);

        if let Err(errors) = validate_examples(&Resource {
            children: Vec::new(),
            ..resource.clone()
        }) {
            for e in errors {
                self.error("E002", path, format!("example does not match schema at {}", e));
            }
        }

        if let Err(e) = derive_actions(resource, &DeriveOptions::new()) {
            self.error("E005", path, format!("cannot derive actions: {}", e));
        }

        for (i, child) in resource.children.iter().enumerate() {
            self.resource(child, &format!("{}/children/{}", path, i));
        }
    }

    fn top_level(&mut self, resource: &Resource, path: &str) {
        if let Some(Cardinality::Many(listing)) = &resource.schema.top_level {
            if resource.handlers.list.is_none() {
                self.warning(
                    "W001",
                    &format!("{}/schema/top_level", path),
                    format!("listing \"{}\" has no list handler and yields no actions", listing),
                );
            }
        }
    }

    fn step(&mut self, resource: &Resource, path: &str) {
        let handlers = &resource.handlers;
        let has_single = handlers.get.is_some() || handlers.update.is_some();

        match &resource.schema.step {
            Step::Named(endpoints) => {
                let mut seen = HashSet::new();
                for (i, named) in endpoints.iter().enumerate() {
                    let endpoint_path = format!("{}/schema/step/named/{}", path, i);
                    if !seen.insert(named.path.as_str()) {
                        self.error(
                            "E003",
                            &endpoint_path,
                            format!("duplicate path segment \"{}\"", named.path),
                        );
                    }
                    match &named.endpoint {
                        Endpoint::Static(label) => {
                            if !handlers.statics.contains_key(label) {
                                self.error(
                                    "E004",
                                    &endpoint_path,
                                    format!("static endpoint \"{}\" has no handler", label),
                                );
                            }
                        }
                        Endpoint::Single(Getter::Singleton(_)) if !has_single => {
                            self.empty_node(&endpoint_path, &named.path);
                        }
                        Endpoint::Single(Getter::By(spec))
                            if !has_single && !delete_many_yields(handlers, spec) =>
                        {
                            self.empty_node(&endpoint_path, &named.path);
                        }
                        Endpoint::Many(ListGetter::Singleton(_) | ListGetter::By { .. })
                            if handlers.list.is_none() =>
                        {
                            self.empty_node(&endpoint_path, &named.path);
                        }
                        _ => {}
                    }
                }
            }
            Step::Unnamed(unnamed) => {
                let step_path = format!("{}/schema/step/unnamed", path);
                let empty = match unnamed.cardinality {
                    Cardinality::Single(_) => {
                        !has_single && !delete_many_yields(handlers, &unnamed.id)
                    }
                    Cardinality::Many(_) => handlers.list.is_none(),
                };
                if empty {
                    self.empty_node(&step_path, "");
                }
            }
        }
    }

    fn empty_node(&mut self, path: &str, segment: &str) {
        self.warning(
            "W001",
            path,
            format!("endpoint \"{}\" has no matching handlers and yields no actions", segment),
        );
    }

    fn handler_lists(&mut self, handlers: &Handlers, path: &str) {
        for (list, named) in [("selects", &handlers.selects), ("actions", &handlers.actions)] {
            let mut seen = HashSet::new();
            for (i, entry) in named.iter().enumerate() {
                if !seen.insert(entry.path.as_str()) {
                    self.error(
                        "E003",
                        &format!("{}/handlers/{}/{}", path, list, i),
                        format!("duplicate path segment \"{}\"", entry.path),
                    );
                }
            }
        }
    }
}

/// Whether the remove handler is adapted into a `DeleteMany` under `spec`.
///
/// An identifier that cannot be resolved counts as yielding; E005 reports it.
fn delete_many_yields(handlers: &Handlers, spec: &IdSpec) -> bool {
    let Some(remove) = &handlers.remove else {
        return false;
    };
    match identifier(spec, &PathResolver) {
        Ok(ident) => SetCombinator.multi(remove, &ident).is_some(),
        Err(_) => true,
    }
}

/// Collect all .json files in a path (file or directory).
fn collect_resource_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            return vec![path.to_path_buf()];
        }
        return vec![];
    }

    let mut files = Vec::new();
    collect_files_recursive(path, &mut files);
    files.sort();
    files
}

fn collect_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files_recursive(&path, files);
        } else if path.extension().map(|e| e == "json").unwrap_or(false) {
            files.push(path);
        }
    }
}
