use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::TreeArena;
use crate::domain::eligibility::is_eligible;
use crate::domain::error::DomainResult;
use crate::domain::rules::CoordinationRules;
use crate::domain::tree::{ParseTree, TreePosition};

/// An eligible coordination subtree and where it sits in the tree it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSpan {
    pub position: TreePosition,
    pub node: Index,
}

impl CandidateSpan {
    pub fn subtree(&self, arena: &TreeArena) -> DomainResult<ParseTree> {
        arena.to_parse_tree(self.node)
    }
}

/// Collects every coordination span below `root` in pre-order, root included.
///
/// Nested spans are reported independently; see [`outermost`] to drop them.
#[instrument(level = "debug", skip(arena, rules))]
pub fn locate(arena: &TreeArena, root: Index, rules: &CoordinationRules) -> DomainResult<Vec<CandidateSpan>> {
    let mut spans = Vec::new();
    for (position, idx, node) in arena.iter(root) {
        let is_candidate = node.label().map_or(false, |l| rules.is_phrase(l))
            && node.children.len() >= rules.min_children;
        if is_candidate && is_eligible(arena, idx, rules)? {
            spans.push(CandidateSpan { position, node: idx });
        }
    }
    debug!(count = spans.len(), "located coordination spans");
    Ok(spans)
}

/// Keeps only spans that are not nested inside an earlier kept span.
///
/// Input must be in pre-order, as returned by [`locate`]; the result has pairwise
/// disjoint positions.
pub fn outermost(spans: Vec<CandidateSpan>) -> Vec<CandidateSpan> {
    let mut kept: Vec<CandidateSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        if kept.iter().any(|k| k.position.is_ancestor_of(&span.position)) {
            debug!(position = %span.position, "dropping nested span");
            continue;
        }
        kept.push(span);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans_of(text: &str) -> (TreeArena, Vec<CandidateSpan>) {
        let tree: ParseTree = text.parse().unwrap();
        let mut arena = TreeArena::new();
        let root = arena.insert_tree(&tree);
        let spans = locate(&arena, root, &CoordinationRules::default()).unwrap();
        (arena, spans)
    }

    fn positions(spans: &[CandidateSpan]) -> Vec<String> {
        spans.iter().map(|s| s.position.to_string()).collect()
    }

    #[test]
    fn test_locates_spans_in_preorder() {
        let (arena, spans) = spans_of(
            "(S (NP (NP (NNP A)) (CC and) (NP (NNP B))) (VP (VBD met) (NP (NP (NNP C)) (, ,) (NP (NNP D)) (CC and) (NP (NNP E)))))",
        );
        assert_eq!(positions(&spans), vec!["(0)", "(1, 1)"]);
        assert_eq!(
            spans[0].subtree(&arena).unwrap().to_string(),
            "(NP (NP (NNP A)) (CC and) (NP (NNP B)))"
        );
    }

    #[test]
    fn test_root_can_be_a_span() {
        let (_, spans) = spans_of("(NP (NP (NNP A)) (CC and) (NP (NNP B)))");
        assert_eq!(positions(&spans), vec!["()"]);
    }

    #[test]
    fn test_requires_np_label_and_three_children() {
        let (_, spans) = spans_of("(S (VP (NP (NNP A)) (CC and) (NP (NNP B))) (NP (NP (NNP C)) (NP (NNP D))))");
        assert!(spans.is_empty());
    }

    #[test]
    fn test_nested_spans_are_collected_and_outermost_filters_them() {
        let (_, spans) = spans_of(
            "(NP (NP (NP (NNP A)) (CC and) (NP (NNP B))) (, ,) (NP (NNP C)) (CC or) (NP (NNP D)))",
        );
        assert_eq!(positions(&spans), vec!["()", "(0)"]);
        assert_eq!(positions(&outermost(spans)), vec!["()"]);
    }

    #[test]
    fn test_outermost_keeps_disjoint_siblings() {
        let (_, spans) = spans_of(
            "(S (NP (NP (NNP A)) (CC and) (NP (NNP B))) (NP (NP (NNP C)) (CC and) (NP (NNP D))))",
        );
        assert_eq!(positions(&outermost(spans)), vec!["(0)", "(1)"]);
    }
}
