use serde::{Deserialize, Serialize};
use crate::models::domain::{MatchCriteria, ScoredResult};

/// Response for both match endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub request_id: String,
    pub vendors: Vec<ScoredResult>,
    pub total_candidates: usize,
    /// Criteria understood from a free-text query
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria: Option<MatchCriteria>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Candidate source backend name
    pub storage: String,
    /// Active query interpretation strategy
    pub interpreter: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
