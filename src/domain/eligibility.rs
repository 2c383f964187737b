use generational_arena::Index;
use tracing::{instrument, trace};

use crate::domain::arena::{NodeData, TreeArena};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::rules::CoordinationRules;

/// Decides whether the children of `node` form a coordination.
///
/// Only the labels of the direct children matter: enough phrase children and at least one
/// separator. The node's own label and child count are the caller's business.
/// Tokens among the children carry no label and count towards nothing.
#[instrument(level = "trace", skip(arena, rules))]
pub fn is_eligible(arena: &TreeArena, node: Index, rules: &CoordinationRules) -> DomainResult<bool> {
    let tree_node = arena.get_node(node).ok_or(DomainError::DanglingNode(node))?;
    if let NodeData::Token(token) = &tree_node.data {
        return Err(DomainError::TerminalNode(token.clone()));
    }

    let mut phrases = 0;
    let mut separators = 0;
    for &child in &tree_node.children {
        let Some(label) = arena.get_node(child).and_then(|c| c.label()) else {
            continue;
        };
        if rules.is_phrase(label) {
            phrases += 1;
        } else if rules.is_separator(label) {
            separators += 1;
        }
    }
    trace!(phrases, separators, "coordination counts");

    Ok(phrases >= rules.min_phrases && separators >= rules.min_separators)
}
