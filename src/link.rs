//! URL shapes of derived actions.

use crate::types::{Identifier, LinkToken};

/// One step that reaches a single instance: a path segment (possibly empty)
/// and the identifier it takes, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    pub path: String,
    pub identifier: Option<Identifier>,
}

impl Accessor {
    pub fn new(path: impl Into<String>, identifier: Option<Identifier>) -> Self {
        Self {
            path: path.into(),
            identifier,
        }
    }
}

/// Build the access prefix that postfixed actions render after.
///
/// An empty accessor list gives an empty link; otherwise all accessors are
/// wrapped in a single [`LinkToken::Access`].
pub fn build_access_link(accessors: &[Accessor]) -> Vec<LinkToken> {
    if accessors.is_empty() {
        return Vec::new();
    }

    let tokens = accessors
        .iter()
        .flat_map(|accessor| {
            let segment = (!accessor.path.is_empty())
                .then(|| LinkToken::Action(accessor.path.clone()));
            let param = accessor.identifier.as_ref().map(param_token);
            segment.into_iter().chain(param)
        })
        .collect();

    vec![LinkToken::Access(tokens)]
}

/// Assemble the link of a single action.
///
/// Postfixed actions keep the access prefix; all others drop it.
pub fn assemble_link(
    access_prefix: &[LinkToken],
    directory: &str,
    identifier: Option<&Identifier>,
    postfixed: bool,
) -> Vec<LinkToken> {
    let mut link = if postfixed {
        access_prefix.to_vec()
    } else {
        Vec::new()
    };
    if !directory.is_empty() {
        link.push(LinkToken::Action(directory.to_string()));
    }
    if let Some(identifier) = identifier {
        link.push(param_token(identifier));
    }
    link
}

/// Render a link as a path, e.g. `/post/{PostId}/info`.
pub fn render_path(link: &[LinkToken]) -> String {
    let mut path = String::new();
    render_into(link, &mut path);
    if path.is_empty() {
        path.push('/');
    }
    path
}

fn render_into(link: &[LinkToken], path: &mut String) {
    for token in link {
        match token {
            LinkToken::Resource(segment) | LinkToken::Action(segment) => {
                path.push('/');
                path.push_str(segment);
            }
            LinkToken::Param(description) => {
                path.push_str("/{");
                path.push_str(description);
                path.push('}');
            }
            LinkToken::Access(inner) => render_into(inner, path),
        }
    }
}

fn param_token(identifier: &Identifier) -> LinkToken {
    LinkToken::Param(identifier.description.clone())
}
