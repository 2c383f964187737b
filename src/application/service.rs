//! Request handling: tree text in, JSON-ready paraphrase list out.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::application::engine::{CoordinationShuffle, SpanReport};
use crate::application::rephraser::{Algorithm, Rephraser};
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::ParseTree;

/// Shortest accepted tree text.
pub const MIN_TREE_TEXT_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParaphraseRequest {
    /// Bracketed tree text
    pub tree: String,
    /// Maximum number of paraphrases; the configured default when absent
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ParaphraseRequest {
    pub fn new(tree: impl Into<String>, limit: Option<usize>) -> Self {
        Self {
            tree: tree.into(),
            limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub tree: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParaphraseResponse {
    pub paraphrases: Vec<TreeEntry>,
}

/// Validates requests, runs the configured algorithm and prints the results.
#[derive(Debug, Clone)]
pub struct ParaphraseService {
    algorithm: Algorithm,
    limit: usize,
    seed: Option<u64>,
    margin: usize,
}

impl ParaphraseService {
    pub fn new(settings: &Settings) -> Self {
        Self {
            algorithm: Algorithm::Default(CoordinationShuffle::new(settings.rules.clone())),
            limit: settings.limit,
            seed: settings.seed,
            margin: settings.margin,
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Parses tree text; the whole request fails on malformed text.
    pub fn parse(&self, text: &str) -> ApplicationResult<ParseTree> {
        if text.chars().count() < MIN_TREE_TEXT_LEN {
            return Err(ApplicationError::InvalidRequest(format!(
                "tree text must be at least {} characters",
                MIN_TREE_TEXT_LEN
            )));
        }
        Ok(text.parse::<ParseTree>()?)
    }

    pub fn handle(&self, request: &ParaphraseRequest) -> ApplicationResult<ParaphraseResponse> {
        self.handle_with_seed(request, self.seed)
    }

    /// Like [`handle`](Self::handle) with an explicit seed, so parallel callers can give
    /// every request its own reproducible RNG.
    #[instrument(level = "debug", skip(self, request), fields(limit = ?request.limit))]
    pub fn handle_with_seed(
        &self,
        request: &ParaphraseRequest,
        seed: Option<u64>,
    ) -> ApplicationResult<ParaphraseResponse> {
        let limit = match request.limit {
            Some(0) => {
                return Err(ApplicationError::InvalidRequest(
                    "limit must be greater than 0".into(),
                ))
            }
            Some(limit) => limit,
            None => self.limit,
        };
        let tree = self.parse(&request.tree)?;

        let mut rephraser = Rephraser::builder()
            .algorithm(self.algorithm.clone())
            .limit(limit)
            .seed(seed)
            .build()?;
        let paraphrases = rephraser
            .execute(&tree)?
            .iter()
            .map(|t| TreeEntry {
                tree: t.pformat(self.margin),
            })
            .collect::<Vec<_>>();
        info!(count = paraphrases.len(), "handled paraphrase request");

        Ok(ParaphraseResponse { paraphrases })
    }

    /// Coordination spans of the tree text, nested ones included.
    pub fn spans(&self, text: &str) -> ApplicationResult<Vec<SpanReport>> {
        let tree = self.parse(text)?;
        match &self.algorithm {
            Algorithm::Default(shuffle) => Ok(shuffle.spans(&tree)?),
        }
    }
}
