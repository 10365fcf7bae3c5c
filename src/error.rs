//! Error types for resource loading, derivation and linting.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading a resource document.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid resource document: {source}")]
    InvalidDocument {
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}

/// Failure reported by a [`TypeResolver`](crate::TypeResolver).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    #[error("cannot resolve type \"{type_name}\": {message}")]
    Unresolvable { type_name: String, message: String },
}

/// Errors during action derivation.
#[derive(Debug, Error)]
pub enum DeriveError {
    #[error("{context}: {source}")]
    Resolver {
        /// Where in the resource the failing type was declared.
        context: String,
        #[source]
        source: ResolverError,
    },
}

impl DeriveError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// A deferred value was forced while deriving metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeferredError {
    #[error("identifier value accessed outside handler context")]
    OutsideHandler,
}

/// A declared payload example that does not match its declared schema.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ExampleError {
    /// Location of the payload inside the resource document.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for ExampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}
