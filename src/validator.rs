//! Payload example validation against declared JSON schemas.

use serde_json::Value;

use crate::error::ExampleError;
use crate::schema::{Handler, Payload, Resource};
use crate::types::ContentKind;

/// Validate every JSON payload that declares both a schema and an example.
///
/// Walks the resource and its children; locations are reported as
/// `post/get/outputs/0`.
///
/// # Errors
///
/// Returns every mismatch found.
pub fn validate_examples(resource: &Resource) -> Result<(), Vec<ExampleError>> {
    let mut errors = Vec::new();
    collect_resource(resource, "", &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate one example against one schema.
///
/// # Errors
///
/// Returns an error per violation, located under `path`.
pub fn validate_example(
    schema: &Value,
    example: &Value,
    path: &str,
) -> Result<(), Vec<ExampleError>> {
    let validator = jsonschema::validator_for(schema).map_err(|e| {
        vec![ExampleError {
            path: path.to_string(),
            message: format!("invalid schema: {}", e),
        }]
    })?;

    let errors: Vec<ExampleError> = validator
        .iter_errors(example)
        .map(|e| ExampleError {
            path: format!("{}{}", path, e.instance_path),
            message: e.to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn collect_resource(resource: &Resource, parent: &str, errors: &mut Vec<ExampleError>) {
    let base = if parent.is_empty() {
        resource.name.clone()
    } else {
        format!("{}/{}", parent, resource.name)
    };
    let handlers = &resource.handlers;

    let singles = [
        ("list", &handlers.list),
        ("get", &handlers.get),
        ("update", &handlers.update),
        ("remove", &handlers.remove),
        ("create", &handlers.create),
    ];
    for (name, handler) in singles {
        if let Some(handler) = handler {
            collect_handler(handler, &format!("{}/{}", base, name), errors);
        }
    }
    for (label, handler) in &handlers.statics {
        collect_handler(handler, &format!("{}/statics/{}", base, label), errors);
    }
    for select in &handlers.selects {
        collect_handler(&select.handler, &format!("{}/selects/{}", base, select.path), errors);
    }
    for action in &handlers.actions {
        collect_handler(&action.handler, &format!("{}/actions/{}", base, action.path), errors);
    }

    for child in &resource.children {
        collect_resource(child, &base, errors);
    }
}

fn collect_handler(handler: &Handler, path: &str, errors: &mut Vec<ExampleError>) {
    let channels = [
        ("inputs", &handler.inputs),
        ("outputs", &handler.outputs),
        ("errors", &handler.errors),
    ];
    for (channel, payloads) in channels {
        for (i, payload) in payloads.iter().enumerate() {
            collect_payload(payload, &format!("{}/{}/{}", path, channel, i), errors);
        }
    }
}

fn collect_payload(payload: &Payload, path: &str, errors: &mut Vec<ExampleError>) {
    if payload.kind != ContentKind::Json {
        return;
    }
    if let (Some(schema), Some(example)) = (&payload.schema, &payload.example) {
        if let Err(mut found) = validate_example(schema, example, path) {
            errors.append(&mut found);
        }
    }
}
