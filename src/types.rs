//! Core types of the action catalogue.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque type reference produced by a [`TypeResolver`](crate::TypeResolver).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(pub String);

/// Module a type reference depends on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleRef(pub String);

/// How one path segment identifying an instance is described.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identifier {
    pub description: String,
    pub type_ref: TypeRef,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub type_deps: BTreeSet<ModuleRef>,
}

/// Content kind of a payload.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    PlainText,
    Xml,
    Json,
    File,
    Custom(String),
}

impl ContentKind {
    /// Media-type token used when building accept headers.
    pub fn media_type(&self) -> &'static str {
        match self {
            ContentKind::PlainText => "text/plain",
            ContentKind::Xml => "text/xml",
            ContentKind::Json => "text/json",
            ContentKind::File => "*",
            ContentKind::Custom(_) => "text/plain",
        }
    }

    /// Whether payloads of this kind carry a schema and an example.
    pub fn is_structured(&self) -> bool {
        matches!(self, ContentKind::Xml | ContentKind::Json)
    }

    /// Label used when a payload declares no type.
    pub fn default_label(&self) -> &str {
        match self {
            ContentKind::PlainText => "String",
            ContentKind::Xml => "XML",
            ContentKind::Json => "JSON",
            ContentKind::File => "File",
            ContentKind::Custom(name) => name,
        }
    }
}

/// One declared shape a handler accepts or produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentDescription {
    pub kind: ContentKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<TypeRef>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub type_deps: BTreeSet<ModuleRef>,
}

/// Negotiated content per response channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponseChoice {
    pub error_choice: Option<ContentDescription>,
    pub output_choice: Option<ContentDescription>,
}

/// Classification of a derived action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Retrieve,
    Create,
    Delete,
    DeleteMany,
    List,
    Update,
    UpdateMany,
    Modify,
}

/// Whether an action works on the resource itself or on related information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTarget {
    #[serde(rename = "self")]
    Itself,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One element of an action's URL shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkToken {
    /// Resource name, used for the links of resources in an API tree.
    Resource(String),
    /// Accessor path that postfixed actions render after.
    Access(Vec<LinkToken>),
    /// Literal path segment.
    Action(String),
    /// Identifier placeholder, carrying the identifier's description.
    Param(String),
}

/// One derivable HTTP operation on a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Identifier>,
    pub postfixed: bool,
    pub kind: ActionKind,
    pub target: ActionTarget,
    pub directory: String,
    pub method: HttpMethod,
    pub inputs: Vec<ContentDescription>,
    pub outputs: Vec<ContentDescription>,
    pub errors: Vec<ContentDescription>,
    pub param_names: Vec<String>,
    pub requires_secure_transport: bool,
    pub link: Vec<LinkToken>,
}

impl Action {
    /// True for the plain `GET` of a single instance.
    ///
    /// These serve as an identifier's default retrieval rather than as a
    /// separately exposed feature.
    pub fn is_accessor(&self) -> bool {
        self.kind == ActionKind::Retrieve && self.target == ActionTarget::Itself
    }
}

/// Options for action derivation.
#[derive(Debug, Clone)]
pub struct DeriveOptions {
    /// When true, a payload whose type cannot be resolved is dropped from its
    /// action instead of failing the derivation.
    pub lenient: bool,
    /// When false, private child resources are left out of the API tree.
    pub include_private: bool,
}

impl Default for DeriveOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl DeriveOptions {
    /// Create options with strict type resolution and private resources kept.
    pub fn new() -> Self {
        Self {
            lenient: false,
            include_private: true,
        }
    }

    /// Set lenient type resolution.
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// Set whether private child resources are kept.
    pub fn include_private(mut self, include_private: bool) -> Self {
        self.include_private = include_private;
        self
    }
}
