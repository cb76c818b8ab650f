//! Static normalization tables.
//!
//! Each table maps a canonical term to keyword fragments that widen substring
//! matching. The tables are built once on first use and shared read-only by
//! every match call.

use once_cell::sync::Lazy;
use std::collections::HashMap;

type AliasTable = HashMap<&'static str, &'static [&'static str]>;

/// Vendor segment -> related keyword fragments
const INDUSTRY_ALIASES: &[(&str, &[&str])] = &[
    ("backup-dr", &["backup", "disaster-recovery", "disaster recovery", "dr", "draas"]),
    ("colocation", &["colocation", "colo", "data center", "datacenter", "data centre"]),
    ("cloud", &["cloud", "iaas", "paas"]),
    ("managed-services", &["managed", "msp", "managed-cloud", "managed hosting"]),
    ("managed-cloud", &["managed cloud", "managed-services", "managed"]),
    ("network", &["network", "carrier", "fiber", "fibre", "wavelength", "transport"]),
    ("security", &["security", "siem", "mdr", "soc"]),
    ("interconnection", &["interconnect", "peering", "ix", "exchange"]),
    ("edge", &["edge", "micro data center"]),
    ("healthcare", &["healthcare", "health care", "medical", "clinical"]),
];

/// Geo region -> city and sub-region keywords
const REGION_ALIASES: &[(&str, &[&str])] = &[
    (
        "us-east",
        &[
            "virginia", "ashburn", "reston", "new york", "new jersey", "secaucus", "boston",
            "atlanta", "miami", "philadelphia", "washington", "east coast",
        ],
    ),
    (
        "us-west",
        &[
            "california", "silicon valley", "san jose", "santa clara", "los angeles",
            "san francisco", "seattle", "oregon", "portland", "phoenix", "las vegas", "west coast",
        ],
    ),
    (
        "us-central",
        &[
            "texas", "dallas", "houston", "austin", "san antonio", "chicago", "denver",
            "kansas city", "minneapolis",
        ],
    ),
    (
        "eu-west",
        &["london", "dublin", "ireland", "amsterdam", "paris", "united kingdom", "manchester", "uk"],
    ),
    (
        "eu-central",
        &["frankfurt", "germany", "munich", "berlin", "zurich", "vienna", "warsaw"],
    ),
    (
        "apac",
        &["asia", "singapore", "tokyo", "hong kong", "sydney", "mumbai", "seoul", "osaka"],
    ),
    (
        "usa",
        &["us-east", "us-west", "us-central", "united states", "america"],
    ),
];

/// Metro name -> cities and campuses that belong to it
const CITY_ALIASES: &[(&str, &[&str])] = &[
    (
        "silicon valley",
        &["san jose", "santa clara", "sunnyvale", "palo alto", "mountain view", "milpitas"],
    ),
    (
        "bay area",
        &["san francisco", "oakland", "san jose", "santa clara", "hayward", "fremont"],
    ),
    ("new york", &["nyc", "manhattan", "secaucus", "newark", "new jersey"]),
    (
        "northern virginia",
        &["ashburn", "reston", "sterling", "manassas", "herndon", "leesburg"],
    ),
    ("washington", &["ashburn", "reston", "sterling", "manassas", "dc"]),
    ("dallas", &["dfw", "fort worth", "richardson", "plano", "irving"]),
    ("los angeles", &["el segundo", "irvine", "la"]),
    ("chicago", &["elk grove", "aurora", "franklin park"]),
    ("london", &["slough", "docklands", "hayes"]),
    ("frankfurt", &["offenbach"]),
    ("amsterdam", &["schiphol", "haarlem"]),
];

/// Service token -> keywords found in service descriptors
const SERVICE_KEYWORDS: &[(&str, &[&str])] = &[
    ("immutable", &["immutable", "worm", "write-once", "write once", "air-gap", "air gap", "object lock"]),
    (
        "disaster-recovery",
        &["disaster recovery", "disaster-recovery", "draas", "failover", "business continuity"],
    ),
    ("draas", &["draas", "disaster recovery as a service", "disaster-recovery", "disaster recovery"]),
    ("backup", &["backup", "data protection", "baas"]),
    ("wavelength", &["wavelength", "waves", "optical", "dwdm", "lambda"]),
    ("dark-fiber", &["dark fiber", "dark-fiber", "dark fibre"]),
    ("colocation", &["colocation", "colo", "cabinet", "cage", "rack"]),
    ("interconnection", &["interconnect", "cross-connect", "cross connect", "peering", "exchange"]),
    ("bare-metal", &["bare metal", "bare-metal", "dedicated server"]),
    ("managed-services", &["managed"]),
    ("hybrid-cloud", &["hybrid cloud", "hybrid-cloud"]),
    ("security", &["security", "siem", "mdr", "soc"]),
];

fn build(entries: &'static [(&'static str, &'static [&'static str])]) -> AliasTable {
    entries.iter().copied().collect()
}

static INDUSTRY: Lazy<AliasTable> = Lazy::new(|| build(INDUSTRY_ALIASES));
static REGION: Lazy<AliasTable> = Lazy::new(|| build(REGION_ALIASES));
static CITY: Lazy<AliasTable> = Lazy::new(|| build(CITY_ALIASES));
static SERVICE: Lazy<AliasTable> = Lazy::new(|| build(SERVICE_KEYWORDS));

/// Keyword fragments for a canonical industry key (lower-case)
pub fn industry_aliases(key: &str) -> Option<&'static [&'static str]> {
    INDUSTRY.get(key).copied()
}

/// City and sub-region keywords for a canonical region key (lower-case)
pub fn region_aliases(key: &str) -> Option<&'static [&'static str]> {
    REGION.get(key).copied()
}

/// Region keys, for reverse lookups
pub fn region_keys() -> impl Iterator<Item = &'static str> {
    REGION_ALIASES.iter().map(|(key, _)| *key)
}

/// Member cities for a metro key (lower-case)
pub fn city_aliases(key: &str) -> Option<&'static [&'static str]> {
    CITY.get(key).copied()
}

/// Metro keys, for reverse lookups
pub fn city_keys() -> impl Iterator<Item = &'static str> {
    CITY_ALIASES.iter().map(|(key, _)| *key)
}

/// Descriptor keywords for a service token (lower-case)
pub fn service_keywords(token: &str) -> Option<&'static [&'static str]> {
    SERVICE.get(token).copied()
}

/// Canonical vocabulary, used to instruct the model-backed interpreter
pub fn vocabulary() -> Vocabulary {
    Vocabulary {
        segments: INDUSTRY_ALIASES.iter().map(|(key, _)| *key).collect(),
        regions: REGION_ALIASES
            .iter()
            .map(|(key, _)| *key)
            .filter(|key| *key != "usa")
            .collect(),
        services: SERVICE_KEYWORDS.iter().map(|(key, _)| *key).collect(),
    }
}

/// Canonical terms known to the alias tables
#[derive(Debug, Clone)]
pub struct Vocabulary {
    pub segments: Vec<&'static str>,
    pub regions: Vec<&'static str>,
    pub services: Vec<&'static str>,
}
