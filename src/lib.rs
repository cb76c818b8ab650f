//! Vendor Match - explainable vendor matching for technology buyers
//!
//! Ranks vendors against structured buyer requirements (hard filters on risk
//! and certifications, additive soft scoring with human-readable reasons) and
//! turns free-text requirements into those criteria, either with rule-based
//! pattern tables or a language model with rule-based fallback.

pub mod config;
pub mod core;
pub mod interpreter;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{MatchError, MatchResult, Matcher, ResultLimits};
pub use interpreter::{build_interpreter, QueryInterpreter, RuleBasedInterpreter};
pub use models::{MatchCriteria, ScoreBreakdown, ScoredResult, SortOrder, VendorCandidate};
pub use services::{CandidateSource, InMemoryCatalog, MatchService};
