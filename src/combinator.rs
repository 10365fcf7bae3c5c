//! Adapting single-instance handlers to operate over a set of instances.

use crate::schema::Handler;
use crate::types::Identifier;

/// Adapts a handler written for one instance into one that serves many,
/// each addressed by `identifier`.
pub trait HandlerCombinator {
    /// Returns `None` when the handler cannot be adapted.
    fn multi(&self, handler: &Handler, identifier: &Identifier) -> Option<Handler>;
}

/// Adapts handlers whose payloads can be aggregated per identifier.
///
/// Every input and output must be JSON or XML; the adapted handler keeps the
/// original payloads, parameters and security flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetCombinator;

impl HandlerCombinator for SetCombinator {
    fn multi(&self, handler: &Handler, identifier: &Identifier) -> Option<Handler> {
        let aggregatable = handler
            .inputs
            .iter()
            .chain(&handler.outputs)
            .all(|p| p.kind.is_structured());
        if !aggregatable {
            tracing::debug!(
                identifier = %identifier.description,
                "handler payloads cannot be aggregated per identifier"
            );
            return None;
        }
        Some(handler.clone())
    }
}

/// Refuses every handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMulti;

impl HandlerCombinator for NoMulti {
    fn multi(&self, _handler: &Handler, _identifier: &Identifier) -> Option<Handler> {
        None
    }
}
