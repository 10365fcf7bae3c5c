//! Action derivation: walks a resource schema and classifies every reachable
//! handler into an [`Action`].
//!
//! # Order
//!
//! Actions are emitted in a fixed order:
//!
//! 1. the top level (single-instance actions, or a listing),
//! 2. the step, endpoint by endpoint in declaration order,
//! 3. create,
//! 4. remove,
//! 5. selects, in declaration order,
//! 6. actions, in declaration order.
//!
//! A node without matching handlers yields nothing; it never aborts the
//! derivation of its siblings.

use crate::combinator::{HandlerCombinator, SetCombinator};
use crate::error::DeriveError;
use crate::identifier::identifier;
use crate::link::{assemble_link, build_access_link, Accessor};
use crate::params::extract_param_names;
use crate::resolver::{describe_payload, PathResolver, TypeResolver};
use crate::schema::{
    Cardinality, Endpoint, Getter, Handler, IdSpec, ListGetter, ListSelector, Payload, Resource,
    Step,
};
use crate::types::{
    Action, ActionKind, ActionTarget, ContentDescription, DeriveOptions, HttpMethod, Identifier,
    LinkToken,
};

/// Derive the action catalogue of a resource with the default collaborators.
///
/// # Errors
///
/// Returns `DeriveError` if a declared type cannot be resolved.
pub fn derive_actions(
    resource: &Resource,
    options: &DeriveOptions,
) -> Result<Vec<Action>, DeriveError> {
    derive_actions_with(resource, options, &PathResolver, &SetCombinator)
}

/// Derive the action catalogue of a resource.
///
/// Child resources are not visited; see [`build_api_tree`](crate::build_api_tree).
///
/// # Errors
///
/// Returns `DeriveError` if a declared identifier type cannot be resolved,
/// or a payload type cannot be resolved and `options.lenient` is false.
pub fn derive_actions_with(
    resource: &Resource,
    options: &DeriveOptions,
    resolver: &dyn TypeResolver,
    combinator: &dyn HandlerCombinator,
) -> Result<Vec<Action>, DeriveError> {
    let deriver = Deriver {
        resource,
        options,
        resolver,
        combinator,
    };
    let access_link = build_access_link(&accessors(resource, resolver)?);

    let mut actions = Vec::new();
    if let Some(top_level) = &resource.schema.top_level {
        deriver.top_level(top_level, &mut actions)?;
    }
    deriver.step(&resource.schema.step, &access_link, &mut actions)?;
    deriver.create(&mut actions)?;
    deriver.remove(&access_link, &mut actions)?;
    deriver.selects(&access_link, &mut actions)?;
    deriver.actions(&access_link, &mut actions)?;

    tracing::debug!(
        resource = %resource.name,
        count = actions.len(),
        "derived action catalogue"
    );
    Ok(actions)
}

/// True for the plain `GET` of a single instance.
pub fn is_accessor(action: &Action) -> bool {
    action.is_accessor()
}

/// The steps of a resource that reach a single instance.
///
/// # Errors
///
/// Returns `DeriveError` if an identifier type cannot be resolved.
pub fn accessors(
    resource: &Resource,
    resolver: &dyn TypeResolver,
) -> Result<Vec<Accessor>, DeriveError> {
    let mut accessors = Vec::new();
    match &resource.schema.step {
        Step::Named(endpoints) => {
            for named in endpoints {
                match &named.endpoint {
                    Endpoint::Single(Getter::Singleton(_)) => {
                        accessors.push(Accessor::new(named.path.as_str(), None));
                    }
                    Endpoint::Single(Getter::By(spec)) => {
                        let ident = resolve_identifier(resource, &named.path, spec, resolver)?;
                        accessors.push(Accessor::new(named.path.as_str(), Some(ident)));
                    }
                    Endpoint::Static(_) | Endpoint::Many(_) => {}
                }
            }
        }
        Step::Unnamed(unnamed) => {
            if let Cardinality::Single(_) = unnamed.cardinality {
                let ident = resolve_identifier(resource, "", &unnamed.id, resolver)?;
                accessors.push(Accessor::new("", Some(ident)));
            }
        }
    }
    Ok(accessors)
}

fn resolve_identifier(
    resource: &Resource,
    path: &str,
    spec: &IdSpec,
    resolver: &dyn TypeResolver,
) -> Result<Identifier, DeriveError> {
    identifier(spec, resolver).map_err(|source| DeriveError::Resolver {
        context: format!("{}/schema/{}", resource.name, path),
        source,
    })
}

/// Shape of an action before its handler's metadata is attached.
struct Shape<'s> {
    kind: ActionKind,
    target: ActionTarget,
    method: HttpMethod,
    directory: &'s str,
    identifier: Option<Identifier>,
    postfixed: bool,
}

struct Deriver<'a> {
    resource: &'a Resource,
    options: &'a DeriveOptions,
    resolver: &'a dyn TypeResolver,
    combinator: &'a dyn HandlerCombinator,
}

impl Deriver<'_> {
    fn top_level(
        &self,
        top_level: &Cardinality<String, String>,
        out: &mut Vec<Action>,
    ) -> Result<(), DeriveError> {
        match top_level {
            Cardinality::Single(_) => self.single(None, "", out),
            Cardinality::Many(listing) => {
                self.listing(None, "", &ListSelector::new(listing.as_str()), out)
            }
        }
    }

    fn step(
        &self,
        step: &Step,
        access_link: &[LinkToken],
        out: &mut Vec<Action>,
    ) -> Result<(), DeriveError> {
        match step {
            Step::Named(endpoints) => {
                for named in endpoints {
                    let path = named.path.as_str();
                    match &named.endpoint {
                        Endpoint::Static(label) => {
                            self.static_action(path, label, access_link, out)?;
                        }
                        Endpoint::Single(Getter::Singleton(_)) => self.single(None, path, out)?,
                        Endpoint::Single(Getter::By(spec)) => {
                            let ident = self.identifier(path, spec)?;
                            self.single(Some(ident), path, out)?;
                        }
                        Endpoint::Many(ListGetter::Singleton(listing)) => {
                            self.listing(None, path, &ListSelector::new(listing.as_str()), out)?;
                        }
                        Endpoint::Many(ListGetter::By { id, listing }) => {
                            let ident = self.identifier(path, id)?;
                            let selector = ListSelector::by_placeholder(listing.as_str());
                            self.listing(Some(ident), path, &selector, out)?;
                        }
                    }
                }
                Ok(())
            }
            Step::Unnamed(unnamed) => {
                let ident = self.identifier("", &unnamed.id)?;
                match &unnamed.cardinality {
                    Cardinality::Single(_) => self.single(Some(ident), "", out),
                    Cardinality::Many(listing) => {
                        let selector = ListSelector::by_placeholder(listing.as_str());
                        self.listing(Some(ident), "", &selector, out)
                    }
                }
            }
        }
    }

    /// Retrieve, update, and the set variants of update and remove.
    fn single(
        &self,
        ident: Option<Identifier>,
        directory: &str,
        out: &mut Vec<Action>,
    ) -> Result<(), DeriveError> {
        let handlers = &self.resource.handlers;
        let before = out.len();

        if let Some(get) = &handlers.get {
            let shape = self_shape(ActionKind::Retrieve, HttpMethod::Get, directory, ident.clone());
            out.push(self.action(get, "get", shape, &[])?);
        }
        if let Some(update) = &handlers.update {
            let shape = self_shape(ActionKind::Update, HttpMethod::Put, directory, ident.clone());
            out.push(self.action(update, "update", shape, &[])?);
        }
        if let Some(ident) = &ident {
            if let Some(multi) = handlers
                .update
                .as_ref()
                .and_then(|h| self.combinator.multi(h, ident))
            {
                let shape = self_shape(ActionKind::UpdateMany, HttpMethod::Put, directory, None);
                out.push(self.action(&multi, "update", shape, &[])?);
            }
            if let Some(multi) = handlers
                .remove
                .as_ref()
                .and_then(|h| self.combinator.multi(h, ident))
            {
                let shape = self_shape(ActionKind::DeleteMany, HttpMethod::Delete, directory, None);
                out.push(self.action(&multi, "remove", shape, &[])?);
            }
        }

        if out.len() == before {
            tracing::debug!(
                resource = %self.resource.name,
                directory,
                "single endpoint yields no actions"
            );
        }
        Ok(())
    }

    fn listing(
        &self,
        ident: Option<Identifier>,
        directory: &str,
        selector: &ListSelector,
        out: &mut Vec<Action>,
    ) -> Result<(), DeriveError> {
        let Some(handler) = self.resource.handlers.listing(selector) else {
            tracing::debug!(
                resource = %self.resource.name,
                listing = %selector.listing,
                "no list handler, listing yields no actions"
            );
            return Ok(());
        };
        let shape = self_shape(ActionKind::List, HttpMethod::Get, directory, ident);
        out.push(self.action(&handler, "list", shape, &[])?);
        Ok(())
    }

    fn static_action(
        &self,
        path: &str,
        label: &str,
        access_link: &[LinkToken],
        out: &mut Vec<Action>,
    ) -> Result<(), DeriveError> {
        let Some(handler) = self.resource.handlers.statics.get(label) else {
            tracing::debug!(
                resource = %self.resource.name,
                label,
                "no handler for static endpoint"
            );
            return Ok(());
        };
        let shape = postfixed_shape(ActionKind::Modify, HttpMethod::Post, path);
        let context = format!("statics/{}", label);
        out.push(self.action(handler, &context, shape, access_link)?);
        Ok(())
    }

    fn create(&self, out: &mut Vec<Action>) -> Result<(), DeriveError> {
        if let Some(create) = &self.resource.handlers.create {
            let shape = self_shape(ActionKind::Create, HttpMethod::Post, "", None);
            out.push(self.action(create, "create", shape, &[])?);
        }
        Ok(())
    }

    fn remove(&self, access_link: &[LinkToken], out: &mut Vec<Action>) -> Result<(), DeriveError> {
        if let Some(remove) = &self.resource.handlers.remove {
            let shape = Shape {
                postfixed: true,
                ..self_shape(ActionKind::Delete, HttpMethod::Delete, "", None)
            };
            out.push(self.action(remove, "remove", shape, access_link)?);
        }
        Ok(())
    }

    fn selects(&self, access_link: &[LinkToken], out: &mut Vec<Action>) -> Result<(), DeriveError> {
        for select in &self.resource.handlers.selects {
            let shape = postfixed_shape(ActionKind::Retrieve, HttpMethod::Get, &select.path);
            let context = format!("selects/{}", select.path);
            out.push(self.action(&select.handler, &context, shape, access_link)?);
        }
        Ok(())
    }

    fn actions(&self, access_link: &[LinkToken], out: &mut Vec<Action>) -> Result<(), DeriveError> {
        for action in &self.resource.handlers.actions {
            let shape = postfixed_shape(ActionKind::Modify, HttpMethod::Post, &action.path);
            let context = format!("actions/{}", action.path);
            out.push(self.action(&action.handler, &context, shape, access_link)?);
        }
        Ok(())
    }

    fn identifier(&self, path: &str, spec: &IdSpec) -> Result<Identifier, DeriveError> {
        resolve_identifier(self.resource, path, spec, self.resolver)
    }

    fn action(
        &self,
        handler: &Handler,
        context: &str,
        shape: Shape<'_>,
        access_link: &[LinkToken],
    ) -> Result<Action, DeriveError> {
        let context = format!("{}/{}", self.resource.name, context);
        let link = assemble_link(
            access_link,
            shape.directory,
            shape.identifier.as_ref(),
            shape.postfixed,
        );
        let action = Action {
            inputs: self.describe(&handler.inputs, &context, "inputs")?,
            outputs: self.describe(&handler.outputs, &context, "outputs")?,
            errors: self.describe(&handler.errors, &context, "errors")?,
            param_names: extract_param_names(&handler.params),
            requires_secure_transport: handler.secure,
            identifier: shape.identifier,
            postfixed: shape.postfixed,
            kind: shape.kind,
            target: shape.target,
            directory: shape.directory.to_string(),
            method: shape.method,
            link,
        };
        tracing::debug!(
            context = %context,
            kind = ?action.kind,
            method = %action.method,
            "derived action"
        );
        Ok(action)
    }

    fn describe(
        &self,
        payloads: &[Payload],
        context: &str,
        channel: &str,
    ) -> Result<Vec<ContentDescription>, DeriveError> {
        let mut descriptions = Vec::with_capacity(payloads.len());
        for (i, payload) in payloads.iter().enumerate() {
            match describe_payload(payload, self.resolver) {
                Ok(description) => descriptions.push(description),
                Err(source) if self.options.lenient => {
                    tracing::warn!(
                        context = %context,
                        channel,
                        index = i,
                        error = %source,
                        "dropping payload with unresolvable type"
                    );
                }
                Err(source) => {
                    return Err(DeriveError::Resolver {
                        context: format!("{}/{}/{}", context, channel, i),
                        source,
                    })
                }
            }
        }
        Ok(descriptions)
    }
}

fn self_shape(
    kind: ActionKind,
    method: HttpMethod,
    directory: &str,
    identifier: Option<Identifier>,
) -> Shape<'_> {
    Shape {
        kind,
        target: ActionTarget::Itself,
        method,
        directory,
        identifier,
        postfixed: false,
    }
}

fn postfixed_shape(kind: ActionKind, method: HttpMethod, directory: &str) -> Shape<'_> {
    Shape {
        kind,
        target: ActionTarget::Any,
        method,
        directory,
        identifier: None,
        postfixed: true,
    }
}
