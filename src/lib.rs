//! Syntactic paraphrases of constituency parse trees.
//!
//! Coordinated noun phrases such as `A, B and C` are reordered (`B, A and C`) while the
//! rest of the tree stays fixed:
//!
//! ```
//! use npshuffle::domain::ParseTree;
//!
//! let tree: ParseTree = "(NP (NP (NNP Tom)) (CC and) (NP (NNP Jerry)))".parse().unwrap();
//! let paraphrases = npshuffle::paraphrase(&tree, 20).unwrap();
//! assert_eq!(
//!     paraphrases[0].to_string(),
//!     "(NP (NP (NNP Jerry)) (CC and) (NP (NNP Tom)))"
//! );
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod tree_traits;
pub mod util;

pub use application::paraphrase;
