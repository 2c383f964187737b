//! Paraphrase engine: locate, mutate, combine.

use rand::Rng;
use tracing::{debug, info, instrument};

use crate::domain::{
    locate, outermost, Combinator, CoordinationRules, DomainError, DomainResult, ParseTree,
    TreeArena, TreePosition, VariantSet,
};

/// Reorders coordinated noun phrases; the default paraphrase algorithm.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinationShuffle {
    rules: CoordinationRules,
}

/// A located span, materialized for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanReport {
    pub position: TreePosition,
    pub subtree: ParseTree,
    /// Variant count of the span, `None` if it overflows
    pub variants: Option<u128>,
}

impl CoordinationShuffle {
    pub fn new(rules: CoordinationRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &CoordinationRules {
        &self.rules
    }

    /// Up to `limit` paraphrases of `tree`, drawing from the thread-local RNG when sampling.
    pub fn paraphrase(&self, tree: &ParseTree, limit: usize) -> DomainResult<Vec<ParseTree>> {
        self.paraphrase_with(tree, limit, &mut rand::thread_rng())
    }

    /// Up to `limit` paraphrases of `tree`; `rng` is only consumed when the combination
    /// space exceeds the limit. Never returns the unmodified baseline combination.
    #[instrument(level = "debug", skip(self, tree, rng), fields(root = tree.label()))]
    pub fn paraphrase_with<R: Rng + ?Sized>(
        &self,
        tree: &ParseTree,
        limit: usize,
        rng: &mut R,
    ) -> DomainResult<Vec<ParseTree>> {
        if limit == 0 {
            return Err(DomainError::InvalidLimit(limit));
        }

        let mut arena = TreeArena::new();
        let root = arena.insert_tree(tree);
        let spans = locate(&arena, root, &self.rules)?;
        if spans.is_empty() {
            debug!("no coordination spans, nothing to paraphrase");
            return Ok(Vec::new());
        }

        let combinator = Combinator::new(&arena, root, outermost(spans), &self.rules)?;
        let selected = combinator.select(limit, rng);

        let paraphrases = selected
            .iter()
            .map(|combination| {
                let variant = combinator.assemble(&mut arena, combination)?;
                arena.to_parse_tree(variant)
            })
            .collect::<DomainResult<Vec<_>>>()?;
        info!(
            spans = combinator.spans().len(),
            paraphrases = paraphrases.len(),
            nodes = arena.len(),
            "paraphrased tree"
        );
        Ok(paraphrases)
    }

    /// Every coordination span of `tree`, nested ones included.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn spans(&self, tree: &ParseTree) -> DomainResult<Vec<SpanReport>> {
        let mut arena = TreeArena::new();
        let root = arena.insert_tree(tree);
        locate(&arena, root, &self.rules)?
            .into_iter()
            .map(|span| {
                let variants = VariantSet::new(&arena, span.node, &self.rules)?.len();
                Ok(SpanReport {
                    subtree: span.subtree(&arena)?,
                    position: span.position,
                    variants,
                })
            })
            .collect()
    }
}

/// Up to `limit` paraphrases of `tree` with the default rules.
pub fn paraphrase(tree: &ParseTree, limit: usize) -> DomainResult<Vec<ParseTree>> {
    CoordinationShuffle::default().paraphrase(tree, limit)
}
