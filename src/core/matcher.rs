use thiserror::Error;
use validator::Validate;

use crate::core::{ranking::rank_results, scoring::score_candidates};
use crate::models::{MatchCriteria, ScoredResult, VendorCandidate};

/// Caller-facing failures of a match call
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Invalid criteria: {0}")]
    InvalidCriteria(String),

    #[error("Vendor data unavailable: {0}")]
    StorageUnavailable(String),
}

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<ScoredResult>,
    pub total_candidates: usize,
}

/// Bounds on how many results a match call returns
#[derive(Debug, Clone, Copy)]
pub struct ResultLimits {
    /// Used when the criteria carry no `result_limit`
    pub default_limit: usize,
    /// Upper bound on any explicit `result_limit`
    pub max_limit: usize,
}

impl Default for ResultLimits {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Criteria validation
/// 2. Hard filters (risk threshold, required certifications)
/// 3. Soft scoring with match reasons
/// 4. Deterministic ranking and truncation
#[derive(Debug, Clone)]
pub struct Matcher {
    limits: ResultLimits,
}

impl Matcher {
    pub fn new(limits: ResultLimits) -> Self {
        Self { limits }
    }

    pub fn with_default_limits() -> Self {
        Self {
            limits: ResultLimits::default(),
        }
    }

    pub fn limits(&self) -> ResultLimits {
        self.limits
    }

    /// Number of results a call with these criteria may return
    pub fn effective_limit(&self, criteria: &MatchCriteria) -> usize {
        criteria
            .limit()
            .unwrap_or(self.limits.default_limit)
            .min(self.limits.max_limit)
    }

    /// Find the vendors matching the criteria among the candidates
    ///
    /// # Arguments
    /// * `criteria` - The buyer's structured requirements
    /// * `candidates` - Every vendor in scope, already aggregated
    ///
    /// # Returns
    /// MatchResult with ranked, explained matches; an empty list when no
    /// candidate passes the hard filters
    pub fn find_matches(
        &self,
        criteria: &MatchCriteria,
        candidates: Vec<VendorCandidate>,
    ) -> Result<MatchResult, MatchError> {
        criteria
            .validate()
            .map_err(|e| MatchError::InvalidCriteria(e.to_string()))?;

        let total_candidates = candidates.len();
        let scored = score_candidates(criteria, candidates);

        tracing::debug!(
            "{} of {} candidates passed hard filters",
            scored.len(),
            total_candidates
        );

        let matches = rank_results(scored, criteria.sort_order, self.effective_limit(criteria));

        Ok(MatchResult {
            matches,
            total_candidates,
        })
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_limits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortOrder;

    fn create_candidate(id: &str, name: &str, risk: Option<f64>, certs: &[&str]) -> VendorCandidate {
        VendorCandidate {
            vendor_id: id.to_string(),
            name: name.to_string(),
            summary: None,
            hq_region: Some("us-east".to_string()),
            primary_segments: vec!["colocation".to_string()],
            risk_score: risk,
            held_certifications: certs.iter().map(|c| c.to_string()).collect(),
            offered_services: vec![],
            facility_locations: vec!["us-east".to_string()],
        }
    }

    #[test]
    fn test_find_matches_basic() {
        let matcher = Matcher::with_default_limits();
        let criteria = MatchCriteria {
            required_certifications: ["HIPAA".to_string()].into_iter().collect(),
            max_risk_score: Some(0.3),
            ..Default::default()
        };

        let candidates = vec![
            create_candidate("1", "Acme", Some(0.25), &["HIPAA Compliant"]), // Match
            create_candidate("2", "Beta", Some(0.5), &["HIPAA"]),            // Too risky
            create_candidate("3", "Core", Some(0.1), &["SOC 2"]),            // Missing cert
            create_candidate("4", "Dyn", None, &["hipaa"]),                  // Unknown risk passes
        ];

        let result = matcher.find_matches(&criteria, candidates).unwrap();

        assert_eq!(result.total_candidates, 4);
        assert_eq!(result.matches.len(), 2);
        assert_eq!(result.matches[0].vendor.vendor_id, "1");
        assert_eq!(result.matches[1].vendor.vendor_id, "4");
    }

    #[test]
    fn test_rejects_invalid_limit() {
        let matcher = Matcher::with_default_limits();
        let criteria = MatchCriteria {
            result_limit: Some(-1),
            ..Default::default()
        };

        let result = matcher.find_matches(&criteria, vec![]);
        assert!(matches!(result, Err(MatchError::InvalidCriteria(_))));
    }

    #[test]
    fn test_limits() {
        let matcher = Matcher::new(ResultLimits {
            default_limit: 2,
            max_limit: 3,
        });

        let candidates: Vec<VendorCandidate> = (0..6)
            .map(|i| create_candidate(&i.to_string(), &format!("Vendor {}", i), None, &[]))
            .collect();

        let no_limit = MatchCriteria::default();
        let small = MatchCriteria {
            result_limit: Some(1),
            ..Default::default()
        };
        let large = MatchCriteria {
            result_limit: Some(50),
            ..Default::default()
        };

        assert_eq!(matcher.find_matches(&no_limit, candidates.clone()).unwrap().matches.len(), 2);
        assert_eq!(matcher.find_matches(&small, candidates.clone()).unwrap().matches.len(), 1);
        assert_eq!(matcher.find_matches(&large, candidates).unwrap().matches.len(), 3);
    }

    #[test]
    fn test_sort_order_applied() {
        let matcher = Matcher::with_default_limits();
        let criteria = MatchCriteria {
            sort_order: SortOrder::RiskAsc,
            ..Default::default()
        };

        let candidates = vec![
            create_candidate("1", "Acme", Some(0.7), &[]),
            create_candidate("2", "Zeta", Some(0.1), &[]),
        ];

        let result = matcher.find_matches(&criteria, candidates).unwrap();
        assert_eq!(result.matches[0].vendor.name, "Zeta");
    }
}
