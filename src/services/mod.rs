// Service exports
pub mod catalog;
pub mod llm;
pub mod matching;
pub mod postgres;

pub use catalog::{
    aggregate_candidate, merge_candidate, CandidateParts, CandidateSource, InMemoryCatalog,
    StorageError,
};
pub use llm::{ChatCompletionClient, ModelClient, ModelError};
pub use matching::{MatchService, TextMatchResult};
pub use postgres::PostgresCatalog;
