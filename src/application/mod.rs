//! Application layer: engine, strategy façade and request handling
//!
//! This layer orchestrates domain logic; it performs no terminal I/O.

pub mod engine;
pub mod error;
pub mod error_ext;
pub mod rephraser;
pub mod service;

pub use engine::{paraphrase, CoordinationShuffle, SpanReport};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use rephraser::{Algorithm, Rephraser, RephraserBuilder, DEFAULT_LIMIT};
pub use service::{ParaphraseRequest, ParaphraseResponse, ParaphraseService, TreeEntry};
