//! Query parameter extraction.

use std::collections::HashSet;

use crate::schema::ParamTree;

/// Flatten a parameter tree into unique names, in first-seen order.
///
/// The tree is walked in order with an explicit stack, so deeply composed
/// handlers do not grow the call stack.
pub fn extract_param_names(tree: &ParamTree) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    let mut stack = vec![tree];

    while let Some(node) = stack.pop() {
        match node {
            ParamTree::None => {}
            ParamTree::Params(leaf) => {
                for name in leaf {
                    if seen.insert(name.as_str()) {
                        names.push(name.clone());
                    }
                }
            }
            ParamTree::Both(left, right) => {
                // Right is pushed first so left is visited first
                stack.push(right.as_ref());
                stack.push(left.as_ref());
            }
        }
    }

    names
}
