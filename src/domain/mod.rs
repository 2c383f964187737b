//! Domain layer: parse trees and the coordination paraphrase algorithm
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod combinator;
pub mod eligibility;
pub mod error;
pub mod locator;
pub mod mutator;
pub mod parser;
pub mod rules;
pub mod tree;

pub use arena::{NodeData, TreeArena, TreeNode};
pub use combinator::{Combination, Combinator};
pub use eligibility::is_eligible;
pub use error::{DomainError, DomainResult};
pub use locator::{locate, outermost, CandidateSpan};
pub use mutator::{factorial, mutate, Permutation, VariantSet};
pub use parser::parse_tree;
pub use rules::CoordinationRules;
pub use tree::{Child, ParseTree, TreePosition};
