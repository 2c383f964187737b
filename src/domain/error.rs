//! Domain-level errors (no external dependencies)

use generational_arena::Index;
use thiserror::Error;

use crate::domain::tree::TreePosition;

/// Domain errors represent contract violations of the paraphrase algorithm.
/// None of them is transient: retrying with the same input fails the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("expected a phrase node, got terminal token {0:?}")]
    TerminalNode(String),

    #[error("limit must be a positive integer, got {0}")]
    InvalidLimit(usize),

    #[error("no paraphrase algorithm configured")]
    MissingAlgorithm,

    #[error("tree position {0} does not address a node")]
    StalePosition(TreePosition),

    #[error("node {0:?} is not stored in this arena")]
    DanglingNode(Index),

    #[error("malformed tree at byte {offset}: {message}")]
    Parse { offset: usize, message: String },
}

impl DomainError {
    /// True for the caller-facing InvalidInput family: wrong node kind, bad limit,
    /// missing algorithm.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            DomainError::TerminalNode(_)
                | DomainError::InvalidLimit(_)
                | DomainError::MissingAlgorithm
        )
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
