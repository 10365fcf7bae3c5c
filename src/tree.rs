//! API trees: a resource, its children, and the catalogue entries of each.
//!
//! A root resource is linked as `[Resource(name)]`. A child is linked under
//! its parent's link followed by the parent's access prefix, so `/post/id/{PostId}/comment`
//! for a `comment` child of a `post` reached by `id`.

use serde::Serialize;

use crate::combinator::{HandlerCombinator, SetCombinator};
use crate::derive::{accessors, derive_actions_with};
use crate::describe::describe_action;
use crate::error::DeriveError;
use crate::link::build_access_link;
use crate::negotiate::{accept_header_tokens, choose_response_type, DefaultFormat};
use crate::resolver::{PathResolver, TypeResolver};
use crate::schema::Resource;
use crate::types::{Action, ContentKind, DeriveOptions, LinkToken, ResponseChoice};

/// One derived action with what downstream generators need alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionEntry {
    pub action: Action,
    pub description: String,
    pub response: ResponseChoice,
    pub accept: Vec<&'static str>,
    pub accessor: bool,
}

impl ActionEntry {
    /// Negotiate and describe an action of the resource named `resource_noun`.
    pub fn new(resource_noun: &str, action: Action) -> Self {
        let response = choose_response_type(&action.outputs, &action.errors);
        let declared: Vec<ContentKind> = action.outputs.iter().map(|o| o.kind.clone()).collect();
        Self {
            description: describe_action(resource_noun, &action),
            accept: accept_header_tokens(DefaultFormat::Json, &declared),
            accessor: action.is_accessor(),
            response,
            action,
        }
    }
}

/// A resource in an API tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResource {
    /// Resource names from the root down to this resource.
    pub id: Vec<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub private: bool,
    pub link: Vec<LinkToken>,
    pub actions: Vec<ActionEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ApiResource>,
}

impl ApiResource {
    /// Number of actions in this resource and all of its descendants.
    pub fn action_count(&self) -> usize {
        self.actions.len()
            + self
                .children
                .iter()
                .map(ApiResource::action_count)
                .sum::<usize>()
    }
}

/// Build the API tree rooted at `resource` with the default collaborators.
///
/// # Errors
///
/// Returns `DeriveError` if deriving any resource of the tree fails.
pub fn build_api_tree(
    resource: &Resource,
    options: &DeriveOptions,
) -> Result<ApiResource, DeriveError> {
    build_api_tree_with(resource, options, &PathResolver, &SetCombinator)
}

/// Build the API tree rooted at `resource`.
///
/// # Errors
///
/// Returns `DeriveError` if deriving any resource of the tree fails.
pub fn build_api_tree_with(
    resource: &Resource,
    options: &DeriveOptions,
    resolver: &dyn TypeResolver,
    combinator: &dyn HandlerCombinator,
) -> Result<ApiResource, DeriveError> {
    let builder = TreeBuilder {
        options,
        resolver,
        combinator,
    };
    builder.build(resource, &[], Vec::new())
}

struct TreeBuilder<'a> {
    options: &'a DeriveOptions,
    resolver: &'a dyn TypeResolver,
    combinator: &'a dyn HandlerCombinator,
}

impl TreeBuilder<'_> {
    fn build(
        &self,
        resource: &Resource,
        parent_id: &[String],
        mut link: Vec<LinkToken>,
    ) -> Result<ApiResource, DeriveError> {
        let mut id = parent_id.to_vec();
        id.push(resource.name.clone());
        link.push(LinkToken::Resource(resource.name.clone()));

        let actions = derive_actions_with(resource, self.options, self.resolver, self.combinator)?
            .into_iter()
            .map(|action| ActionEntry::new(&resource.name, action))
            .collect();

        let mut child_link = link.clone();
        if !resource.children.is_empty() {
            child_link.extend(build_access_link(&accessors(resource, self.resolver)?));
        }

        let mut children = Vec::with_capacity(resource.children.len());
        for child in &resource.children {
            if child.private && !self.options.include_private {
                tracing::debug!(resource = %child.name, "skipping private resource");
                continue;
            }
            children.push(self.build(child, &id, child_link.clone())?);
        }

        Ok(ApiResource {
            id,
            name: resource.name.clone(),
            description: resource.description.clone(),
            private: resource.private,
            link,
            actions,
            children,
        })
    }
}
