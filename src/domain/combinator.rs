//! Cross-product of span variants, bounded by a limit.

use std::collections::HashSet;

use generational_arena::Index;
use itertools::Itertools;
use rand::Rng;
use tracing::{debug, instrument};

use crate::domain::arena::TreeArena;
use crate::domain::error::DomainResult;
use crate::domain::locator::CandidateSpan;
use crate::domain::mutator::{is_identity, Permutation, VariantSet};
use crate::domain::rules::CoordinationRules;

/// One permutation per span, in span order.
pub type Combination = Vec<Permutation>;

/// Upper bound on the up-front reservation when sampling; larger results grow on demand.
const MAX_SAMPLE_RESERVE: usize = 1024;

fn sample_capacity(limit: usize) -> usize {
    limit.min(MAX_SAMPLE_RESERVE)
}

/// Variant choices over a set of disjoint spans of one tree.
#[derive(Debug)]
pub struct Combinator {
    root: Index,
    spans: Vec<CandidateSpan>,
    sets: Vec<VariantSet>,
}

impl Combinator {
    /// `spans` must have pairwise disjoint positions.
    pub fn new(
        arena: &TreeArena,
        root: Index,
        spans: Vec<CandidateSpan>,
        rules: &CoordinationRules,
    ) -> DomainResult<Self> {
        let sets = spans
            .iter()
            .map(|span| VariantSet::new(arena, span.node, rules))
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(Self { root, spans, sets })
    }

    pub fn spans(&self) -> &[CandidateSpan] {
        &self.spans
    }

    /// Size of the cross-product including the baseline, `None` if it overflows a `u128`.
    pub fn size(&self) -> Option<u128> {
        self.sets
            .iter()
            .try_fold(1u128, |acc, set| acc.checked_mul(set.len()?))
    }

    /// Picks at most `limit` non-baseline combinations.
    ///
    /// When everything but the baseline fits under `limit` the result is exhaustive, in
    /// mixed-radix index order with the last span varying fastest. Otherwise it is a
    /// uniform sample without replacement.
    #[instrument(level = "debug", skip(self, rng))]
    pub fn select<R: Rng + ?Sized>(&self, limit: usize, rng: &mut R) -> Vec<Combination> {
        match self.size() {
            Some(size) if size - 1 <= limit as u128 => {
                debug!(size = %size, "enumerating all combinations");
                self.exhaustive()
            }
            size => {
                debug!(?size, limit, "sampling combinations");
                self.sample(limit, rng)
            }
        }
    }

    fn exhaustive(&self) -> Vec<Combination> {
        let per_span: Vec<Vec<Permutation>> =
            self.sets.iter().map(|set| set.permutations().collect()).collect();
        per_span
            .iter()
            .map(|permutations| permutations.iter().cloned())
            .multi_cartesian_product()
            .skip(1)
            .collect()
    }

    // Draws one permutation per span and rejects the baseline and repeats. Only valid when
    // the space holds more than `limit` non-baseline combinations.
    fn sample<R: Rng + ?Sized>(&self, limit: usize, rng: &mut R) -> Vec<Combination> {
        let mut seen = HashSet::with_capacity(sample_capacity(limit));
        let mut picked = Vec::with_capacity(sample_capacity(limit));
        while picked.len() < limit {
            let combination: Combination = self
                .sets
                .iter()
                .map(|set| set.random_permutation(rng))
                .collect();
            if combination.iter().all(|p| is_identity(p)) {
                continue;
            }
            if seen.insert(combination.clone()) {
                picked.push(combination);
            }
        }
        picked
    }

    /// Builds the full tree for `combination` and returns its root.
    pub fn assemble(&self, arena: &mut TreeArena, combination: &[Permutation]) -> DomainResult<Index> {
        let mut root = self.root;
        for ((span, set), permutation) in self.spans.iter().zip(&self.sets).zip(combination) {
            let variant = set.apply(arena, permutation)?;
            root = arena.replace_at(root, &span.position, variant)?;
        }
        Ok(root)
    }
}
