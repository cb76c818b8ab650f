use std::cmp::Ordering;

use crate::models::{ScoredResult, SortOrder};

/// Compare two risk scores ascending, unknown risk last
#[inline]
fn compare_risk(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Total order over scored results for a sort order
///
/// Score descending is always the primary key. `score_desc` and `risk_asc`
/// then order by risk ascending (unknown last) and name; `name_asc` orders
/// by name. Vendor id breaks any remaining tie.
pub fn compare_results(a: &ScoredResult, b: &ScoredResult, sort_order: SortOrder) -> Ordering {
    let by_score = b.total_score.cmp(&a.total_score);
    let by_name = || a.vendor.name.cmp(&b.vendor.name);

    let ordering = match sort_order {
        SortOrder::ScoreDesc | SortOrder::RiskAsc => by_score
            .then_with(|| compare_risk(a.vendor.risk_score, b.vendor.risk_score))
            .then_with(by_name),
        SortOrder::NameAsc => by_score.then_with(by_name),
    };

    ordering.then_with(|| a.vendor.vendor_id.cmp(&b.vendor.vendor_id))
}

/// Sort results and keep at most `limit` of them
pub fn rank_results(
    mut results: Vec<ScoredResult>,
    sort_order: SortOrder,
    limit: usize,
) -> Vec<ScoredResult> {
    results.sort_by(|a, b| compare_results(a, b, sort_order));
    results.truncate(limit);
    results
}
