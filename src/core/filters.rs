use std::collections::BTreeSet;

use crate::core::fuzzy::certification_matches;
use crate::models::{MatchCriteria, VendorCandidate};

/// Check the candidate's risk score against the effective threshold
///
/// A candidate with no known risk score always passes: unknown risk is
/// acceptable, not disqualifying.
#[inline]
pub fn within_risk_threshold(candidate: &VendorCandidate, threshold: Option<f64>) -> bool {
    match (threshold, candidate.risk_score) {
        (Some(threshold), Some(risk)) => risk <= threshold,
        _ => true,
    }
}

/// Check that every required certification is satisfied by some held one
#[inline]
pub fn holds_required_certifications(
    candidate: &VendorCandidate,
    required: &BTreeSet<String>,
) -> bool {
    required
        .iter()
        .all(|cert| certification_matches(cert, &candidate.held_certifications).is_some())
}

/// Hard filters: a candidate failing any of these is excluded before scoring
#[inline]
pub fn passes_hard_filters(
    candidate: &VendorCandidate,
    criteria: &MatchCriteria,
    risk_threshold: Option<f64>,
) -> bool {
    if !within_risk_threshold(candidate, risk_threshold) {
        return false;
    }

    if !holds_required_certifications(candidate, &criteria.required_certifications) {
        return false;
    }

    true
}
