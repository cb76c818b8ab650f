// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CertificationRecord, FacilityRecord, MatchCriteria, ScoreBreakdown, ScoredResult,
    ServiceRecord, SortOrder, VendorAttributes, VendorCandidate, VendorRecord,
};
pub use requests::NlMatchRequest;
pub use responses::{ErrorResponse, HealthResponse, MatchResponse};
