//! Identifier metadata for addressed resource instances.

use std::collections::BTreeSet;

use crate::error::ResolverError;
use crate::resolver::TypeResolver;
use crate::schema::IdSpec;
use crate::types::{Identifier, TypeRef};

/// Description and type reference used for opaque string identifiers.
pub const STRING_IDENTIFIER: &str = "string";

/// Describe how an identifier segment is addressed.
///
/// Typed identifiers take their description, type reference and module
/// dependencies from `resolver`.
///
/// # Errors
///
/// Returns `ResolverError` if a typed identifier cannot be resolved.
pub fn identifier(spec: &IdSpec, resolver: &dyn TypeResolver) -> Result<Identifier, ResolverError> {
    match spec {
        IdSpec::String => Ok(Identifier {
            description: STRING_IDENTIFIER.to_string(),
            type_ref: TypeRef(STRING_IDENTIFIER.to_string()),
            type_deps: BTreeSet::new(),
        }),
        IdSpec::Read(type_name) => {
            let resolved = resolver.resolve(type_name)?;
            Ok(Identifier {
                description: resolved.rendered_name,
                type_ref: resolved.type_ref,
                type_deps: resolved.module_deps,
            })
        }
    }
}
