use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::Validate;

/// Lowest threshold a qualitative risk tolerance can map to.
pub const RISK_THRESHOLD_FLOOR: f64 = 0.20;

/// HQ region value meaning the vendor covers every region.
pub const GLOBAL_REGION: &str = "global";

/// Structured buyer requirements consumed by the scoring engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct MatchCriteria {
    #[serde(default)]
    pub industry: Option<String>,
    /// Legacy single-value HQ region filter
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default, alias = "required_certs")]
    pub required_certifications: BTreeSet<String>,
    #[serde(default)]
    pub required_services: BTreeSet<String>,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default)]
    pub max_risk_score: Option<f64>,
    #[validate(range(min = 1, max = 10))]
    #[serde(default)]
    pub risk_tolerance: Option<i64>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub result_limit: Option<i64>,
    #[serde(default, alias = "sort_by")]
    pub sort_order: SortOrder,
    #[serde(default, alias = "text_query")]
    pub raw_text: Option<String>,
}

impl MatchCriteria {
    /// The single risk threshold active at scoring time.
    ///
    /// An explicit `max_risk_score` wins; otherwise `risk_tolerance` (1-10)
    /// is scaled to 0-1 with a floor of [`RISK_THRESHOLD_FLOOR`].
    pub fn effective_risk_threshold(&self) -> Option<f64> {
        self.max_risk_score.or_else(|| {
            self.risk_tolerance
                .map(|tolerance| (tolerance as f64 / 10.0).max(RISK_THRESHOLD_FLOOR))
        })
    }

    /// The explicit result limit as a count, if one was given and is positive
    pub fn limit(&self) -> Option<usize> {
        self.result_limit
            .filter(|limit| *limit > 0)
            .map(|limit| limit as usize)
    }
}

/// Ordering applied to scored results after the primary score key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    ScoreDesc,
    RiskAsc,
    NameAsc,
}

impl SortOrder {
    /// Parse a wire name (`score_desc`, `risk_asc`, `name_asc`)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "score_desc" => Some(SortOrder::ScoreDesc),
            "risk_asc" => Some(SortOrder::RiskAsc),
            "name_asc" => Some(SortOrder::NameAsc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::ScoreDesc => "score_desc",
            SortOrder::RiskAsc => "risk_asc",
            SortOrder::NameAsc => "name_asc",
        }
    }
}

/// A vendor merged with its certifications, services and facility locations
/// for the duration of one match call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorCandidate {
    pub vendor_id: String,
    pub name: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub hq_region: Option<String>,
    #[serde(default)]
    pub primary_segments: Vec<String>,
    #[serde(default)]
    pub risk_score: Option<f64>,
    #[serde(default)]
    pub held_certifications: Vec<String>,
    #[serde(default)]
    pub offered_services: Vec<String>,
    /// Facility geo regions and cities, merged
    #[serde(default)]
    pub facility_locations: Vec<String>,
}

impl VendorCandidate {
    /// Helper to check for the global-coverage HQ sentinel
    pub fn is_global(&self) -> bool {
        self.hq_region
            .as_deref()
            .is_some_and(|region| region.trim().eq_ignore_ascii_case(GLOBAL_REGION))
    }
}

/// Per-dimension match counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub industry: u32,
    pub region: u32,
    pub certifications: u32,
    pub services: u32,
    pub locations: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.industry + self.region + self.certifications + self.services + self.locations
    }

    /// Dimension name and count pairs, in scoring order
    pub fn dimensions(&self) -> [(&'static str, u32); 5] {
        [
            ("industry", self.industry),
            ("region", self.region),
            ("certifications", self.certifications),
            ("services", self.services),
            ("locations", self.locations),
        ]
    }
}

/// A candidate that passed every hard filter, with its score and reasons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    #[serde(flatten)]
    pub vendor: VendorCandidate,
    pub total_score: u32,
    pub score_breakdown: ScoreBreakdown,
    pub matched_reasons: Vec<String>,
}

/// Vendor attributes as stored by the CRUD layer or written by the research
/// seeder
///
/// The seeder and the CRUD layer name some fields differently and a record may
/// carry both spellings, so each is read on its own and resolved by accessor.
/// A headquarters country is not a region and is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VendorAttributes {
    pub vendor_id: String,
    pub name: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub hq_region: Option<String>,
    #[serde(default)]
    pub primary_segments: Vec<String>,
    #[serde(default)]
    pub risk_score_guess: Option<f64>,
    #[serde(default)]
    pub risk_level_guess: Option<f64>,
    #[serde(default)]
    pub risk_score: Option<f64>,
}

impl VendorAttributes {
    /// Declared region: `region`, then `hq_region`
    pub fn declared_region(&self) -> Option<&str> {
        non_blank(self.region.as_deref()).or_else(|| non_blank(self.hq_region.as_deref()))
    }

    /// Risk estimate: `risk_score_guess`, then `risk_level_guess`, then `risk_score`
    pub fn risk(&self) -> Option<f64> {
        self.risk_score_guess
            .or(self.risk_level_guess)
            .or(self.risk_score)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacilityRecord {
    #[serde(default)]
    pub geo: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl FacilityRecord {
    /// Facility region: `geo`, then `region`
    pub fn geo_region(&self) -> Option<&str> {
        non_blank(self.geo.as_deref()).or_else(|| non_blank(self.region.as_deref()))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ServiceRecord {
    /// Free-text descriptor used by service matching
    pub fn descriptor(&self) -> String {
        match self.description.as_deref().map(str::trim) {
            Some(description) if !description.is_empty() => {
                format!("{} - {}", self.category.trim(), description)
            }
            _ => self.category.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificationRecord {
    pub name: String,
}

/// One vendor with its related records, in the research seed layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorRecord {
    pub vendor: VendorAttributes,
    #[serde(default)]
    pub facilities: Vec<FacilityRecord>,
    #[serde(default)]
    pub services: Vec<ServiceRecord>,
    #[serde(default)]
    pub certifications: Vec<CertificationRecord>,
}
