//! REST Action Catalogue
//!
//! Compiles declarative REST resource schemas into a flat catalogue of HTTP
//! actions, each carrying its method, URL shape, content types, parameters
//! and security flag, ready for documentation and client generators.
//!
//! # Example
//!
//! ```
//! use rest_catalog::{derive_actions, load_resource_str, ActionKind, DeriveOptions};
//!
//! let resource = load_resource_str(r#"{
//!     "name": "post",
//!     "schema": {
//!         "top_level": { "many": "latest" },
//!         "step": { "named": [
//!             { "path": "id", "endpoint": { "single": { "by": { "read": "blog::PostId" } } } }
//!         ] }
//!     },
//!     "handlers": {
//!         "list": { "outputs": [{ "kind": "json", "type": "blog::Post" }] },
//!         "get": { "outputs": [{ "kind": "json", "type": "blog::Post" }] }
//!     }
//! }"#).unwrap();
//!
//! let actions = derive_actions(&resource, &DeriveOptions::new()).unwrap();
//! let kinds: Vec<ActionKind> = actions.iter().map(|a| a.kind).collect();
//! assert_eq!(kinds, vec![ActionKind::List, ActionKind::Retrieve]);
//! assert!(actions[1].is_accessor());
//! ```
//!
//! # Action Classification
//!
//! | Reached by | Kind | Target | Method |
//! |------------|------|--------|--------|
//! | list handler on a collection | `List` | self | `GET` |
//! | get handler on an instance | `Retrieve` | self | `GET` |
//! | update handler on an instance | `Update` | self | `PUT` |
//! | update handler over identified instances | `UpdateMany` | self | `PUT` |
//! | remove handler over identified instances | `DeleteMany` | self | `DELETE` |
//! | create handler | `Create` | self | `POST` |
//! | remove handler | `Delete` | self | `DELETE` |
//! | static endpoint | `Modify` | any | `POST` |
//! | select | `Retrieve` | any | `GET` |
//! | action | `Modify` | any | `POST` |

mod combinator;
mod deferred;
mod derive;
mod describe;
mod error;
mod identifier;
mod link;
mod linter;
mod loader;
mod negotiate;
mod params;
mod resolver;
mod schema;
mod tree;
mod types;
mod validator;

pub use combinator::{HandlerCombinator, NoMulti, SetCombinator};
pub use deferred::Deferred;
pub use derive::{accessors, derive_actions, derive_actions_with, is_accessor};
pub use describe::describe_action;
pub use error::{DeferredError, DeriveError, ExampleError, LoadError, ResolverError};
pub use identifier::{identifier, STRING_IDENTIFIER};
pub use link::{assemble_link, build_access_link, render_path, Accessor};
pub use linter::{lint, lint_file, Diagnostic, FileResult, FileStatus, LintResult, Severity};
pub use loader::{
    is_url, load_json, load_resource, load_resource_auto, load_resource_str, parse_resource,
};
pub use negotiate::{accept_header_tokens, choose_response_type, choose_type, DefaultFormat};
pub use params::extract_param_names;
pub use resolver::{describe_payload, PathResolver, ResolvedType, TypeResolver};
pub use schema::{
    Cardinality, Endpoint, Getter, Handler, Handlers, IdSpec, ListGetter, ListSelector,
    NamedEndpoint, NamedHandler, ParamTree, Payload, Resource, Schema, Step, UnnamedEndpoint,
    LISTING_PARAMS,
};
pub use tree::{build_api_tree, build_api_tree_with, ActionEntry, ApiResource};
pub use types::{
    Action, ActionKind, ActionTarget, ContentDescription, ContentKind, DeriveOptions, HttpMethod,
    Identifier, LinkToken, ModuleRef, ResponseChoice, TypeRef,
};
pub use validator::{validate_example, validate_examples};

#[cfg(feature = "remote")]
pub use loader::load_resource_url;
