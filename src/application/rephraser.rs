//! Strategy façade: a chosen algorithm plus a limit and a private RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

use crate::application::engine::CoordinationShuffle;
use crate::domain::{DomainError, DomainResult, ParseTree};

/// Default number of paraphrases per tree.
pub const DEFAULT_LIMIT: usize = 20;

/// Available paraphrase algorithms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Algorithm {
    /// Reorder coordinated noun phrases
    Default(CoordinationShuffle),
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::Default(CoordinationShuffle::default())
    }
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Default(_) => "default",
        }
    }

    pub fn paraphrase<R: Rng + ?Sized>(
        &self,
        tree: &ParseTree,
        limit: usize,
        rng: &mut R,
    ) -> DomainResult<Vec<ParseTree>> {
        match self {
            Algorithm::Default(shuffle) => shuffle.paraphrase_with(tree, limit, rng),
        }
    }
}

/// Builder for [`Rephraser`]; an algorithm must be chosen before `build`.
#[derive(Debug, Clone)]
pub struct RephraserBuilder {
    algorithm: Option<Algorithm>,
    limit: usize,
    seed: Option<u64>,
}

impl Default for RephraserBuilder {
    fn default() -> Self {
        Self {
            algorithm: None,
            limit: DEFAULT_LIMIT,
            seed: None,
        }
    }
}

impl RephraserBuilder {
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Seed for the sampling RNG; entropy is used when unset.
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> DomainResult<Rephraser> {
        let algorithm = self.algorithm.ok_or(DomainError::MissingAlgorithm)?;
        if self.limit == 0 {
            return Err(DomainError::InvalidLimit(self.limit));
        }
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Rephraser {
            algorithm,
            limit: self.limit,
            rng,
        })
    }
}

/// Runs the configured algorithm with the configured limit.
#[derive(Debug)]
pub struct Rephraser {
    algorithm: Algorithm,
    limit: usize,
    rng: StdRng,
}

impl Rephraser {
    pub fn builder() -> RephraserBuilder {
        RephraserBuilder::default()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    #[instrument(level = "debug", skip(self, tree), fields(algorithm = self.algorithm.name(), limit = self.limit))]
    pub fn execute(&mut self, tree: &ParseTree) -> DomainResult<Vec<ParseTree>> {
        let result = self.algorithm.paraphrase(tree, self.limit, &mut self.rng)?;
        debug!(count = result.len(), "rephrased");
        Ok(result)
    }
}
