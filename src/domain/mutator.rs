//! Reorders the phrase nodes inside one coordination span.

use generational_arena::Index;
use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, instrument, trace};

use crate::domain::arena::{NodeData, TreeArena};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::rules::CoordinationRules;
use crate::domain::tree::TreePosition;

/// A permutation of target slots: slot `i` receives the content of slot `permutation[i]`.
pub type Permutation = Vec<usize>;

/// `n!`, or `None` when it does not fit in a `u128`.
pub fn factorial(n: usize) -> Option<u128> {
    (1..=n as u128).try_fold(1u128, |acc, k| acc.checked_mul(k))
}

pub fn is_identity(permutation: &[usize]) -> bool {
    permutation.iter().enumerate().all(|(i, &p)| i == p)
}

/// All reorderings of one span, built on demand.
///
/// Targets are the phrase nodes below the span root in pre-order, at any depth. Sources are
/// captured once from the original subtree, so every variant reads the untouched content.
#[derive(Debug, Clone)]
pub struct VariantSet {
    subtree: Index,
    targets: Vec<TreePosition>,
    sources: Vec<Index>,
}

impl VariantSet {
    #[instrument(level = "debug", skip(arena, rules))]
    pub fn new(arena: &TreeArena, subtree: Index, rules: &CoordinationRules) -> DomainResult<Self> {
        let root = arena.get_node(subtree).ok_or(DomainError::DanglingNode(subtree))?;
        if let NodeData::Token(token) = &root.data {
            return Err(DomainError::TerminalNode(token.clone()));
        }

        let (targets, sources): (Vec<_>, Vec<_>) = arena
            .iter(subtree)
            .skip(1)
            .filter(|(_, _, node)| node.label().map_or(false, |l| rules.is_phrase(l)))
            .map(|(position, idx, _)| (position, idx))
            .unzip();
        debug!(targets = targets.len(), "collected reorder targets");

        Ok(Self {
            subtree,
            targets,
            sources,
        })
    }

    /// Number of reorderable phrase nodes.
    pub fn arity(&self) -> usize {
        self.targets.len()
    }

    /// Number of variants (`arity!`), `None` if it overflows.
    pub fn len(&self) -> Option<u128> {
        factorial(self.arity())
    }

    pub fn targets(&self) -> &[TreePosition] {
        &self.targets
    }

    /// All permutations in lexicographic order, identity first.
    pub fn permutations(&self) -> impl Iterator<Item = Permutation> {
        let n = self.arity();
        (0..n).permutations(n)
    }

    /// A uniformly random permutation.
    pub fn random_permutation<R: Rng + ?Sized>(&self, rng: &mut R) -> Permutation {
        let mut permutation: Permutation = (0..self.arity()).collect();
        permutation.shuffle(rng);
        permutation
    }

    /// Builds the variant for `permutation` and returns its root.
    ///
    /// Targets are filled in order, so a later (deeper) target is addressed inside content
    /// already moved into an earlier one. A target whose path no longer exists in the
    /// partially built variant is left alone.
    #[instrument(level = "trace", skip(self, arena))]
    pub fn apply(&self, arena: &mut TreeArena, permutation: &[usize]) -> DomainResult<Index> {
        let mut root = self.subtree;
        for (target, &from) in self.targets.iter().zip(permutation) {
            let source = *self
                .sources
                .get(from)
                .ok_or_else(|| DomainError::StalePosition(target.clone()))?;
            match arena.replace_at(root, target, source) {
                Ok(new_root) => root = new_root,
                Err(DomainError::StalePosition(position)) => {
                    trace!(%position, "target vanished in partial variant, skipping");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(root)
    }
}

/// Every reordering of the phrase nodes in `subtree`, one variant root per permutation.
///
/// The first variant is the identity. A subtree without inner phrases yields itself once.
#[instrument(level = "debug", skip(arena, rules))]
pub fn mutate(arena: &mut TreeArena, subtree: Index, rules: &CoordinationRules) -> DomainResult<Vec<Index>> {
    let variants = VariantSet::new(arena, subtree, rules)?;
    if variants.arity() == 0 {
        return Ok(vec![subtree]);
    }
    variants
        .permutations()
        .map(|permutation| variants.apply(arena, &permutation))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tree::ParseTree;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn variants_of(text: &str) -> Vec<String> {
        let tree: ParseTree = text.parse().unwrap();
        let mut arena = TreeArena::new();
        let root = arena.insert_tree(&tree);
        mutate(&mut arena, root, &CoordinationRules::default())
            .unwrap()
            .into_iter()
            .map(|idx| arena.to_parse_tree(idx).unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_two_phrases_give_two_variants() {
        let variants = variants_of("(NP (NP A) (CC and) (NP B))");
        assert_eq!(
            variants,
            vec!["(NP (NP A) (CC and) (NP B))", "(NP (NP B) (CC and) (NP A))"]
        );
    }

    #[test]
    fn test_three_phrases_in_lexicographic_order() {
        let variants = variants_of("(NP (NP A) (, ,) (NP B) (CC and) (NP C))");
        let orders: Vec<String> = variants
            .iter()
            .map(|v| {
                let tree: ParseTree = v.parse().unwrap();
                tree.leaves().into_iter().filter(|l| l.len() == 1 && *l != ",").collect()
            })
            .collect();
        assert_eq!(orders, vec!["ABC", "ACB", "BAC", "BCA", "CAB", "CBA"]);
    }

    #[test]
    fn test_no_inner_phrases_yields_original() {
        let variants = variants_of("(NP (DT the) (JJ big) (NN dog))");
        assert_eq!(variants, vec!["(NP (DT the) (JJ big) (NN dog))"]);
    }

    #[test]
    fn test_nested_targets_are_reordered_as_units() {
        // targets in pre-order: (0) (0, 0) (2)
        let variants = variants_of("(NP (NP (NP (NNP A)) (POS 's)) (CC and) (NP (NNP B)))");
        assert_eq!(variants.len(), 6);
        assert_eq!(variants[0], "(NP (NP (NP (NNP A)) (POS 's)) (CC and) (NP (NNP B)))");
        // [0, 2, 1]: (0) keeps itself, then (0, 0) receives B, (2) receives (NP (NNP A))
        assert_eq!(variants[1], "(NP (NP (NP (NNP B)) (POS 's)) (CC and) (NP (NNP A)))");
    }

    #[test]
    fn test_vanished_target_is_skipped() {
        // targets in pre-order: (0) (0, 1) (2)
        let variants = variants_of("(NP (NP (DT the) (NP (NNP A))) (CC and) (NP (NNP B)))");
        assert_eq!(variants.len(), 6);
        // [2, 0, 1]: (0) receives (NP (NNP B)), which has no (0, 1); (2) receives (NP (NNP A))
        assert_eq!(variants[4], "(NP (NP (NNP B)) (CC and) (NP (NNP A)))");
        // [2, 1, 0]: same skip, (2) receives the original (0)
        assert_eq!(
            variants[5],
            "(NP (NP (NNP B)) (CC and) (NP (DT the) (NP (NNP A))))"
        );
    }

    #[test]
    fn test_apply_matches_enumeration_for_random_draws() {
        let tree: ParseTree = "(NP (NP A) (, ,) (NP B) (, ,) (NP C) (CC and) (NP D))".parse().unwrap();
        let mut arena = TreeArena::new();
        let root = arena.insert_tree(&tree);
        let set = VariantSet::new(&arena, root, &CoordinationRules::default()).unwrap();
        assert_eq!(set.len(), Some(24));

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let permutation = set.random_permutation(&mut rng);
            let mut sorted = permutation.clone();
            sorted.sort();
            assert_eq!(sorted, vec![0, 1, 2, 3]);
            let variant = set.apply(&mut arena, &permutation).unwrap();
            let mut leaves: Vec<String> = arena
                .to_parse_tree(variant)
                .unwrap()
                .leaves()
                .into_iter()
                .map(String::from)
                .collect();
            leaves.sort();
            assert_eq!(leaves, vec![",", ",", "A", "B", "C", "D", "and"]);
        }
    }

    #[test]
    fn test_factorial_overflow() {
        assert_eq!(factorial(0), Some(1));
        assert_eq!(factorial(8), Some(40320));
        assert_eq!(factorial(34).map(|f| f > 0), Some(true));
        assert_eq!(factorial(35), None);
    }

    #[test]
    fn test_identity_detection() {
        assert!(is_identity(&[0, 1, 2]));
        assert!(is_identity(&[]));
        assert!(!is_identity(&[1, 0]));
    }
}
