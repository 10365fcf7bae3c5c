//! Resource schema model.
//!
//! A resource declares how its instances are reached (the [`Schema`]) and the
//! handlers attached to each reachable point (the [`Handlers`]). The model is
//! plain data and deserializes from resource documents:
//!
//! ```json
//! {
//!   "name": "post",
//!   "schema": {
//!     "top_level": { "many": "latest" },
//!     "step": { "named": [
//!       { "path": "id", "endpoint": { "single": { "by": { "read": "blog::PostId" } } } }
//!     ] }
//!   },
//!   "handlers": {
//!     "list": { "outputs": [{ "kind": "json", "type": "blog::Post" }] },
//!     "get": { "outputs": [{ "kind": "json", "type": "blog::Post" }] }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::deferred::Deferred;
use crate::types::ContentKind;

/// Parameters every listing handler accepts for paging.
pub const LISTING_PARAMS: &[&str] = &["offset", "count"];

/// A resource and the resources nested below it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub private: bool,
    pub schema: Schema,
    #[serde(default)]
    pub handlers: Handlers,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Resource>,
}

impl Resource {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            description: None,
            private: false,
            schema,
            handlers: Handlers::default(),
            children: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    pub fn handlers(mut self, handlers: Handlers) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn child(mut self, child: Resource) -> Self {
        self.children.push(child);
        self
    }
}

/// Single instance or collection, each carrying its own selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality<S, M> {
    Single(S),
    Many(M),
}

/// How a resource is addressed: an optional top level plus one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_level: Option<Cardinality<String, String>>,
    pub step: Step,
}

impl Schema {
    pub fn new(top_level: Option<Cardinality<String, String>>, step: Step) -> Self {
        Self { top_level, step }
    }

    /// A schema without a top level and without sub-resources.
    pub fn empty() -> Self {
        Self::new(None, Step::Named(Vec::new()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Sub-resources reached through literal path segments.
    Named(Vec<NamedEndpoint>),
    /// The resource addressed directly by an identifier.
    Unnamed(UnnamedEndpoint),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEndpoint {
    pub path: String,
    pub endpoint: Endpoint,
}

impl NamedEndpoint {
    pub fn new(path: impl Into<String>, endpoint: Endpoint) -> Self {
        Self {
            path: path.into(),
            endpoint,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnnamedEndpoint {
    pub id: IdSpec,
    pub cardinality: Cardinality<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    /// A static action, keyed into [`Handlers::statics`].
    Static(String),
    Single(Getter),
    Many(ListGetter),
}

/// Reaches a single instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Getter {
    Singleton(String),
    By(IdSpec),
}

/// Reaches a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListGetter {
    Singleton(String),
    By { id: IdSpec, listing: String },
}

/// How an identifier segment is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdSpec {
    /// Opaque string.
    String,
    /// A typed value, named by its type path.
    Read(String),
}

/// Selects which collection a listing handler serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSelector {
    pub listing: String,
    /// Identifier the collection hangs off, if any. Only bound while a
    /// request is handled.
    pub id: Option<Deferred<String>>,
}

impl ListSelector {
    pub fn new(listing: impl Into<String>) -> Self {
        Self {
            listing: listing.into(),
            id: None,
        }
    }

    /// A selector under an identifier whose value is not yet known.
    pub fn by_placeholder(listing: impl Into<String>) -> Self {
        Self {
            listing: listing.into(),
            id: Some(Deferred::placeholder()),
        }
    }
}

/// Handlers attached to a resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Handlers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<Handler>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Handler>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<Handler>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove: Option<Handler>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create: Option<Handler>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub statics: BTreeMap<String, Handler>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub selects: Vec<NamedHandler>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<NamedHandler>,
}

impl Handlers {
    /// The listing handler bound to `selector`, with paging parameters added.
    ///
    /// The selector's identifier is never forced.
    pub fn listing(&self, selector: &ListSelector) -> Option<Handler> {
        let list = self.list.as_ref()?;
        tracing::trace!(listing = %selector.listing, "binding listing handler");
        let mut bound = list.clone();
        bound.params = ParamTree::both(
            std::mem::take(&mut bound.params),
            ParamTree::params(LISTING_PARAMS.iter().copied()),
        );
        Some(bound)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedHandler {
    pub path: String,
    pub handler: Handler,
}

impl NamedHandler {
    pub fn new(path: impl Into<String>, handler: Handler) -> Self {
        Self {
            path: path.into(),
            handler,
        }
    }
}

/// Metadata of one handler: what it consumes, produces and accepts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Handler {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<Payload>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<Payload>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Payload>,
    pub params: ParamTree,
    pub secure: bool,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, payload: Payload) -> Self {
        self.inputs.push(payload);
        self
    }

    pub fn output(mut self, payload: Payload) -> Self {
        self.outputs.push(payload);
        self
    }

    pub fn error(mut self, payload: Payload) -> Self {
        self.errors.push(payload);
        self
    }

    pub fn params(mut self, params: ParamTree) -> Self {
        self.params = params;
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }
}

/// A declared payload shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub kind: ContentKind,
    #[serde(
        default,
        rename = "type",
        skip_serializing_if = "Option::is_none"
    )]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
}

impl Payload {
    pub fn new(kind: ContentKind) -> Self {
        Self {
            kind,
            type_name: None,
            schema: None,
            example: None,
        }
    }

    pub fn json(type_name: impl Into<String>) -> Self {
        Self::new(ContentKind::Json).typed(type_name)
    }

    pub fn xml(type_name: impl Into<String>) -> Self {
        Self::new(ContentKind::Xml).typed(type_name)
    }

    pub fn typed(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_example(mut self, example: Value) -> Self {
        self.example = Some(example);
        self
    }
}

/// Query parameters declared by a handler, as composed from its parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamTree {
    #[default]
    None,
    Params(Vec<String>),
    Both(Box<ParamTree>, Box<ParamTree>),
}

impl ParamTree {
    pub fn params<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ParamTree::Params(names.into_iter().map(Into::into).collect())
    }

    pub fn both(left: ParamTree, right: ParamTree) -> Self {
        ParamTree::Both(Box::new(left), Box::new(right))
    }
}
