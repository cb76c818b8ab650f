use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::models::{FacilityRecord, ServiceRecord, VendorCandidate, VendorRecord};

/// Errors that can occur when reading vendor data
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid vendor data: {0}")]
    InvalidData(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        StorageError::InvalidData(error.to_string())
    }
}

/// Read-only source of vendor candidates
///
/// Implementations return every vendor merged with its certifications,
/// services and facility locations. A failed read surfaces as an error,
/// never as an empty catalog.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn fetch_candidates(&self) -> Result<Vec<VendorCandidate>, StorageError>;

    async fn health_check(&self) -> Result<bool, StorageError>;

    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;
}

/// Push `value` unless blank or already present (case-insensitive)
fn push_unique(values: &mut Vec<String>, seen: &mut HashSet<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() && seen.insert(value.to_lowercase()) {
        values.push(value.to_string());
    }
}

/// Collapse values into a deduplicated list, keeping first-seen order
pub fn dedupe_values<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for value in values {
        push_unique(&mut out, &mut seen, value);
    }
    out
}

/// A vendor's attributes with its related values flattened, before merging
#[derive(Debug, Clone, Default)]
pub struct CandidateParts {
    pub vendor_id: String,
    pub name: String,
    pub summary: Option<String>,
    pub hq_region: Option<String>,
    pub primary_segments: Vec<String>,
    pub risk_score: Option<f64>,
    pub certifications: Vec<String>,
    pub service_descriptors: Vec<String>,
    pub locations: Vec<String>,
}

/// Merge step shared by every backend: trim, drop blanks and dedupe each
/// collection case-insensitively in first-seen order
pub fn merge_candidate(parts: CandidateParts) -> VendorCandidate {
    VendorCandidate {
        hq_region: parts
            .hq_region
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty()),
        primary_segments: dedupe_values(parts.primary_segments.iter().map(String::as_str)),
        held_certifications: dedupe_values(parts.certifications.iter().map(String::as_str)),
        offered_services: dedupe_values(parts.service_descriptors.iter().map(String::as_str)),
        facility_locations: dedupe_values(parts.locations.iter().map(String::as_str)),
        vendor_id: parts.vendor_id,
        name: parts.name,
        summary: parts.summary,
        risk_score: parts.risk_score,
    }
}

/// Merge a vendor with its related records into one candidate
///
/// Facility regions and cities share one location list; services are
/// described as "category - description". Without a declared region the
/// first facility's region stands in for the headquarters region.
pub fn aggregate_candidate(record: VendorRecord) -> VendorCandidate {
    let VendorRecord {
        vendor,
        facilities,
        services,
        certifications,
    } = record;

    let hq_region = vendor
        .declared_region()
        .or_else(|| facilities.first().and_then(FacilityRecord::geo_region))
        .map(str::to_string);

    let locations = facilities
        .iter()
        .flat_map(|f| [f.geo_region(), f.city.as_deref()])
        .flatten()
        .map(str::to_string)
        .collect();

    let risk_score = vendor.risk();

    merge_candidate(CandidateParts {
        vendor_id: vendor.vendor_id,
        name: vendor.name,
        summary: vendor.summary,
        hq_region,
        primary_segments: vendor.primary_segments,
        risk_score,
        certifications: certifications.into_iter().map(|c| c.name).collect(),
        service_descriptors: services.iter().map(ServiceRecord::descriptor).collect(),
        locations,
    })
}

/// Research seed file layout
#[derive(Debug, Deserialize)]
struct SeedFile {
    vendors: Vec<VendorRecord>,
}

/// Candidate source held entirely in memory, loaded from seed records
pub struct InMemoryCatalog {
    candidates: Vec<VendorCandidate>,
}

impl InMemoryCatalog {
    pub fn from_records(records: Vec<VendorRecord>) -> Self {
        let candidates = records.into_iter().map(aggregate_candidate).collect();
        Self { candidates }
    }

    pub fn from_candidates(candidates: Vec<VendorCandidate>) -> Self {
        Self { candidates }
    }

    /// Parse a `{"vendors": [...]}` document
    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        let seed: SeedFile = serde_json::from_str(json)?;
        Ok(Self::from_records(seed.vendors))
    }

    /// Load a seed file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&contents)?;

        tracing::info!(
            "Loaded {} vendors from {}",
            catalog.candidates.len(),
            path.display()
        );

        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[async_trait]
impl CandidateSource for InMemoryCatalog {
    async fn fetch_candidates(&self) -> Result<Vec<VendorCandidate>, StorageError> {
        Ok(self.candidates.clone())
    }

    async fn health_check(&self) -> Result<bool, StorageError> {
        Ok(true)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
