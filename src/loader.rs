//! Resource document loading from files, strings, and HTTP URLs.

use std::path::Path;

use serde_json::Value;

use crate::error::LoadError;
use crate::schema::Resource;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a resource document from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// `LoadError::InvalidJson` if the file isn't valid JSON, or
/// `LoadError::InvalidDocument` if it doesn't describe a resource.
pub fn load_resource(path: &Path) -> Result<Resource, LoadError> {
    parse_resource(load_json(path)?)
}

/// Load a resource document from a JSON string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` or `LoadError::InvalidDocument`.
pub fn load_resource_str(content: &str) -> Result<Resource, LoadError> {
    let value = serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })?;
    parse_resource(value)
}

/// Load a resource document from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `LoadError::NetworkError` if the request fails, or
/// `LoadError::InvalidDocument` if the body doesn't describe a resource.
#[cfg(feature = "remote")]
pub fn load_resource_url(url: &str) -> Result<Resource, LoadError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|source| LoadError::NetworkError {
            url: url.to_string(),
            source,
        })?;

    let response = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .map_err(|source| LoadError::NetworkError {
            url: url.to_string(),
            source,
        })?;

    let value: Value = response.json().map_err(|source| LoadError::NetworkError {
        url: url.to_string(),
        source,
    })?;
    parse_resource(value)
}

/// Load a resource document from a URL or a file path.
///
/// # Errors
///
/// Returns `LoadError` from the underlying loader.
pub fn load_resource_auto(source: &str) -> Result<Resource, LoadError> {
    if is_url(source) {
        // Without the remote feature a URL is treated as a (missing) path
        #[cfg(feature = "remote")]
        {
            return load_resource_url(source);
        }
    }
    load_resource(Path::new(source))
}

/// Read a file as JSON without interpreting it.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound`, `LoadError::ReadError`, or
/// `LoadError::InvalidJson`.
pub fn load_json(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| LoadError::InvalidJson { source })
}

/// Interpret a JSON value as a resource document.
///
/// # Errors
///
/// Returns `LoadError::InvalidDocument` if the value doesn't describe a resource.
pub fn parse_resource(value: Value) -> Result<Resource, LoadError> {
    serde_json::from_value(value).map_err(|source| LoadError::InvalidDocument { source })
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}
