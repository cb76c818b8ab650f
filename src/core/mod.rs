// Core algorithm exports
pub mod aliases;
pub mod filters;
pub mod fuzzy;
pub mod matcher;
pub mod ranking;
pub mod scoring;

pub use filters::{holds_required_certifications, passes_hard_filters, within_risk_threshold};
pub use fuzzy::{certification_matches, city_matches, industry_matches, region_matches, service_matches};
pub use matcher::{MatchError, MatchResult, Matcher, ResultLimits};
pub use ranking::{compare_results, rank_results};
pub use scoring::{calculate_match_score, score_candidates};
