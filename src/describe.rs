//! Short human descriptions of actions.

use crate::types::{Action, ActionKind, ActionTarget};

/// Describe an action, e.g. "List posts" or "Retrieve information data".
pub fn describe_action(resource_noun: &str, action: &Action) -> String {
    let object = match action.target {
        ActionTarget::Itself => resource_noun,
        ActionTarget::Any => "information",
    };
    match action.kind {
        ActionKind::Retrieve => format!("Retrieve {} data", object),
        ActionKind::Create => format!("Create {}", object),
        ActionKind::Delete => format!("Delete {}", object),
        ActionKind::DeleteMany => format!("Delete many {}", object),
        ActionKind::List => format!("List {}s", object),
        ActionKind::Update => format!("Update {}", object),
        ActionKind::UpdateMany => format!("Update many {}", object),
        ActionKind::Modify => format!("Modify {}", object),
    }
}
