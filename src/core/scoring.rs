use crate::core::{
    filters::passes_hard_filters,
    fuzzy::{certification_matches, city_matches, industry_matches, region_matches, service_matches},
};
use crate::models::{MatchCriteria, ScoreBreakdown, ScoredResult, VendorCandidate};

/// Score every candidate that passes the hard filters
///
/// Candidates failing the risk or certification filter are dropped without
/// being scored. Survivors are kept even with a zero score.
pub fn score_candidates(
    criteria: &MatchCriteria,
    candidates: Vec<VendorCandidate>,
) -> Vec<ScoredResult> {
    let risk_threshold = criteria.effective_risk_threshold();

    candidates
        .into_iter()
        .filter(|candidate| passes_hard_filters(candidate, criteria, risk_threshold))
        .map(|candidate| {
            let (score_breakdown, matched_reasons) =
                calculate_match_score(&candidate, criteria, risk_threshold);

            ScoredResult {
                total_score: score_breakdown.total(),
                vendor: candidate,
                score_breakdown,
                matched_reasons,
            }
        })
        .collect()
}

/// Calculate the soft score of one candidate
///
/// Each dimension contributes its match count:
/// - industry: 1 if the industry matches a primary segment
/// - region: 1 per requested region covered (plus the legacy `region` if not already requested)
/// - certifications: 1 per required certification held
/// - services: 1 per required service offered
/// - locations: 1 per required city with a facility
///
/// Reasons come out in the order industry, region/city, certifications,
/// services, risk.
pub fn calculate_match_score(
    candidate: &VendorCandidate,
    criteria: &MatchCriteria,
    risk_threshold: Option<f64>,
) -> (ScoreBreakdown, Vec<String>) {
    let mut breakdown = ScoreBreakdown::default();
    let mut reasons = Vec::new();

    // Industry
    if let Some(industry) = criteria.industry.as_deref() {
        if industry_matches(industry, &candidate.primary_segments) {
            breakdown.industry = 1;
            reasons.push(format!("industry match: {}", industry));
        }
    }

    // Regions, then the legacy single region if it was not already requested
    for region in &criteria.regions {
        if let Some(reason) = region_reason(candidate, region) {
            breakdown.region += 1;
            reasons.push(reason);
        }
    }

    if let Some(region) = criteria.region.as_deref() {
        let already_requested = criteria
            .regions
            .iter()
            .any(|r| r.trim().eq_ignore_ascii_case(region.trim()));

        if !already_requested {
            if let Some(reason) = region_reason(candidate, region) {
                breakdown.region += 1;
                reasons.push(reason);
            }
        }
    }

    // Cities
    for city in &criteria.cities {
        if city_matches(city, &candidate.facility_locations) {
            breakdown.locations += 1;
            reasons.push(format!("facility in city: {}", city));
        }
    }

    // Certifications, reported by the name the vendor actually holds
    for cert in &criteria.required_certifications {
        if let Some(held) = certification_matches(cert, &candidate.held_certifications) {
            breakdown.certifications += 1;
            reasons.push(format!("holds certification: {}", held));
        }
    }

    // Services
    for service in &criteria.required_services {
        if let Some(descriptor) = service_matches(service, &candidate.offered_services) {
            breakdown.services += 1;
            reasons.push(format!("offers service: {}", descriptor));
        }
    }

    // Risk is informational only
    if let (Some(threshold), Some(risk)) = (risk_threshold, candidate.risk_score) {
        reasons.push(format!("risk within tolerance: {:.2} <= {:.2}", risk, threshold));
    }

    (breakdown, reasons)
}

/// Reason string if the candidate covers `region`, through a facility, its HQ,
/// or global coverage
fn region_reason(candidate: &VendorCandidate, region: &str) -> Option<String> {
    if region.trim().is_empty() {
        return None;
    }

    if candidate.is_global() {
        return Some(format!("region match: {} (global coverage)", region));
    }

    let via_facility = region_matches(region, &candidate.facility_locations);
    let via_hq = candidate
        .hq_region
        .as_ref()
        .is_some_and(|hq| region_matches(region, std::slice::from_ref(hq)));

    (via_facility || via_hq).then(|| format!("region match: {}", region))
}
