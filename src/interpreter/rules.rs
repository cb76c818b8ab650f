//! Rule-based query interpretation.
//!
//! Each dimension has an ordered pattern table. Certifications, services and
//! cities collect every matching entry; industry, region, risk tolerance and
//! sort order take the first entry that matches, so more specific patterns
//! sit above general ones.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

use crate::models::{MatchCriteria, SortOrder};

type PatternTable<T> = Vec<(Regex, T)>;

fn compile_one(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::error!("Skipping invalid interpreter pattern {}: {}", pattern, e);
            None
        }
    }
}

fn compile<T: Copy>(table: &[(&str, T)]) -> PatternTable<T> {
    table
        .iter()
        .filter_map(|(pattern, value)| compile_one(pattern).map(|regex| (regex, *value)))
        .collect()
}

const CERT_RULES: &[(&str, &str)] = &[
    (r"(?i)\bhipaa\b", "HIPAA"),
    (r"(?i)\bsoc[\s-]*2\b", "SOC 2"),
    (r"(?i)\bsoc[\s-]*2\s*type\s*(i{1,2}|1|2)\b", "SOC 2"),
    (r"(?i)\biso[\s-]*27001\b", "ISO 27001"),
    (r"(?i)\bpci[\s-]*dss\b", "PCI DSS"),
    (r"(?i)\bpci\s+complian", "PCI DSS"),
    (r"(?i)\bhitrust\b", "HITRUST"),
    (r"(?i)\bfedramp\b", "FedRAMP"),
];

static CERT_PATTERNS: Lazy<PatternTable<&'static str>> = Lazy::new(|| compile(CERT_RULES));

const REGION_RULES: &[(&str, &str)] = &[
    (
        r"(?i)\b(us[\s-]?east|east(?:ern)?\s+(?:us|united\s+states)|east\s+coast|virginia|ashburn)\b",
        "us-east",
    ),
    (
        r"(?i)\b(us[\s-]?west|west(?:ern)?\s+(?:us|united\s+states)|west\s+coast|california|silicon\s+valley)\b",
        "us-west",
    ),
    (
        r"(?i)\b(us[\s-]?central|central\s+(?:us|united\s+states)|texas|dallas|chicago)\b",
        "us-central",
    ),
    (r"(?i)\b(eu[\s-]?west|london|uk|ireland|dublin|amsterdam)\b", "eu-west"),
    (r"(?i)\b(eu[\s-]?central|frankfurt|germany|munich)\b", "eu-central"),
    (r"(?i)\b(apac|asia|singapore|tokyo|hong\s+kong|sydney)\b", "apac"),
    (r"(?i)\b(europe|eu)\b", "eu-west"),
    (r"(?i)\b(usa|united\s+states|america)\b", "usa"),
];

static REGION_PATTERNS: Lazy<PatternTable<&'static str>> = Lazy::new(|| compile(REGION_RULES));

const INDUSTRY_RULES: &[(&str, &str)] = &[
    (r"(?i)\b(colo(?:cation)?|data\s+cent(?:er|re))\b", "colocation"),
    (r"(?i)\b(managed[\s-]?(?:service|cloud|hosting)s?)\b", "managed-cloud"),
    (r"(?i)\b(cloud|iaas|paas)\b", "cloud"),
    (r"(?i)\b(backup|disaster[\s-]?recovery|dr|draas)\b", "backup-dr"),
    (r"(?i)\b(security|siem|mdr)\b", "security"),
    (r"(?i)\b(health\s*care|medical|hospital|clinical)\b", "healthcare"),
    (r"(?i)\b(network|carrier|fiber|wavelengths?|dark\s+fiber)\b", "network"),
    (r"(?i)\b(interconnect(?:ion)?|peering|ix)\b", "interconnection"),
    (r"(?i)\b(enterprise)\b", "enterprise"),
    (r"(?i)\b(edge)\b", "edge"),
];

static INDUSTRY_PATTERNS: Lazy<PatternTable<&'static str>> = Lazy::new(|| compile(INDUSTRY_RULES));

const SERVICE_RULES: &[(&str, &str)] = &[
    (r"(?i)\b(colo(?:cation)?)\b", "colocation"),
    (r"(?i)\b(interconnect(?:ion)?|cross[\s-]?connects?)\b", "interconnection"),
    (
        r"(?i)\b(disaster[\s-]?recovery|dr(?:aas)?|business\s+continuity|rto)\b",
        "disaster-recovery",
    ),
    (r"(?i)\b(bare[\s-]?metal)\b", "bare-metal"),
    (r"(?i)\b(managed[\s-]?(?:service|hosting)s?)\b", "managed-services"),
    (r"(?i)\b(backups?)\b", "backup"),
    (r"(?i)\b(hybrid[\s-]?cloud)\b", "hybrid-cloud"),
    (r"(?i)\b(immutable|worm|air[\s-]?gap(?:ped)?)\b", "immutable"),
    (r"(?i)\b(wavelengths?|waves|optical)\b", "wavelength"),
    (r"(?i)\b(dark[\s-]?fib(?:er|re))\b", "dark-fiber"),
];

static SERVICE_PATTERNS: Lazy<PatternTable<&'static str>> = Lazy::new(|| compile(SERVICE_RULES));

const CITY_RULES: &[(&str, &str)] = &[
    (r"(?i)\bashburn\b", "Ashburn"),
    (r"(?i)\bnew\s+york\b", "New York"),
    (r"(?i)\batlanta\b", "Atlanta"),
    (r"(?i)\bmiami\b", "Miami"),
    (r"(?i)\bchicago\b", "Chicago"),
    (r"(?i)\bdallas\b", "Dallas"),
    (r"(?i)\bhouston\b", "Houston"),
    (r"(?i)\bdenver\b", "Denver"),
    (r"(?i)\bphoenix\b", "Phoenix"),
    (r"(?i)\bsilicon\s+valley\b", "Silicon Valley"),
    (r"(?i)\bsanta\s+clara\b", "Santa Clara"),
    (r"(?i)\bsan\s+jose\b", "San Jose"),
    (r"(?i)\blos\s+angeles\b", "Los Angeles"),
    (r"(?i)\bseattle\b", "Seattle"),
    (r"(?i)\blondon\b", "London"),
    (r"(?i)\bamsterdam\b", "Amsterdam"),
    (r"(?i)\bfrankfurt\b", "Frankfurt"),
    (r"(?i)\bsingapore\b", "Singapore"),
    (r"(?i)\btokyo\b", "Tokyo"),
];

static CITY_PATTERNS: Lazy<PatternTable<&'static str>> = Lazy::new(|| compile(CITY_RULES));

/// Risk phrase categories mapped to a 1-10 tolerance
const RISK_RULES: &[(&str, i64)] = &[
    (
        r"(?i)\b(very\s+low\s+risk|extremely\s+conservative|minimal\s+risk|zero\s+risk)\b",
        1,
    ),
    (
        r"(?i)\b(low\s+risk|conservative|risk[\s-]?averse|strict\s+(?:compliance|requirements?))\b",
        3,
    ),
    (r"(?i)\b(medium\s+risk|moderate\s+risk|balanced|flexible)\b", 5),
    (r"(?i)\b(high(?:er)?\s+risk|aggressive|risk[\s-]?tolerant)\b", 7),
    (r"(?i)\b(any\s+risk|doesn'?t?\s+matter|budget|cheap|low[\s-]?cost)\b", 8),
];

static RISK_PATTERNS: Lazy<PatternTable<i64>> = Lazy::new(|| compile(RISK_RULES));

const SORT_RULES: &[(&str, SortOrder)] = &[
    (
        r"(?i)\b(lowest\s+risk\s+first|least\s+risky\s+first|(?:sorted|ranked|ordered|order)\s+by\s+(?:lowest\s+)?risk)\b",
        SortOrder::RiskAsc,
    ),
    (r"(?i)\b(alphabetical(?:ly)?|(?:sorted|ordered|order)\s+by\s+name)\b", SortOrder::NameAsc),
    (r"(?i)\b(best\s+match(?:es)?\s+first|highest\s+score)\b", SortOrder::ScoreDesc),
];

static SORT_PATTERNS: Lazy<PatternTable<SortOrder>> = Lazy::new(|| compile(SORT_RULES));

/// A count only reads as a limit when a result noun or the end of the phrase
/// follows it, so "best 10 Gbps waves" sets nothing
const LIMIT_RULE: &str = r"(?i)\b(?:top|best|first)\s+(\d{1,3}|one|two|three|four|five|six|seven|eight|nine|ten)(?:\s+(?:[a-z-]+\s+)?(?:vendors|providers|suppliers|companies|partners|options|results|matches|candidates|picks)\b|\s*(?:[.,;:!?)]|$))";

static LIMIT_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| compile_one(LIMIT_RULE));

const MAX_RISK_RULE: &str =
    r"(?i)\brisk[^.;,]{0,40}?(?:below|under|less\s+than|at\s+most|no\s+more\s+than|<=|≤|<)\s*(\d*\.\d+|[01])\b";

static MAX_RISK_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| compile_one(MAX_RISK_RULE));

fn first_match<T: Copy>(table: &[(Regex, T)], text: &str) -> Option<T> {
    table
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, value)| *value)
}

fn all_matches(table: &[(Regex, &'static str)], text: &str) -> BTreeSet<String> {
    table
        .iter()
        .filter(|(pattern, _)| pattern.is_match(text))
        .map(|(_, value)| value.to_string())
        .collect()
}

fn number_word(word: &str) -> Option<i64> {
    match word.to_lowercase().as_str() {
        "one" => Some(1),
        "two" => Some(2),
        "three" => Some(3),
        "four" => Some(4),
        "five" => Some(5),
        "six" => Some(6),
        "seven" => Some(7),
        "eight" => Some(8),
        "nine" => Some(9),
        "ten" => Some(10),
        digits => digits.parse().ok(),
    }
}

/// Deterministic keyword/pattern interpreter; needs no external service
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedInterpreter;

impl RuleBasedInterpreter {
    pub fn new() -> Self {
        Self
    }

    /// Parse free text into criteria. Never fails: unmatched dimensions stay
    /// at their defaults.
    pub fn parse(&self, text: &str) -> MatchCriteria {
        let criteria = MatchCriteria {
            industry: self.extract_industry(text),
            region: self.extract_region(text),
            regions: Vec::new(),
            cities: self.extract_cities(text),
            required_certifications: all_matches(&CERT_PATTERNS, text),
            required_services: all_matches(&SERVICE_PATTERNS, text),
            max_risk_score: self.extract_max_risk_score(text),
            risk_tolerance: first_match(&RISK_PATTERNS, text),
            result_limit: self.extract_result_limit(text),
            sort_order: first_match(&SORT_PATTERNS, text).unwrap_or_default(),
            raw_text: Some(text.to_string()),
        };

        tracing::debug!(
            "Rule-based interpretation: industry={:?}, region={:?}, cities={:?}, certs={:?}, services={:?}, risk={:?}, max_risk={:?}, limit={:?}, sort={}",
            criteria.industry,
            criteria.region,
            criteria.cities,
            criteria.required_certifications,
            criteria.required_services,
            criteria.risk_tolerance,
            criteria.max_risk_score,
            criteria.result_limit,
            criteria.sort_order.as_str()
        );

        criteria
    }

    /// First matching industry, most specific patterns first
    fn extract_industry(&self, text: &str) -> Option<String> {
        first_match(&INDUSTRY_PATTERNS, text).map(str::to_string)
    }

    /// First matching region, most specific patterns first
    fn extract_region(&self, text: &str) -> Option<String> {
        first_match(&REGION_PATTERNS, text).map(str::to_string)
    }

    /// Every named city, in table order
    fn extract_cities(&self, text: &str) -> Vec<String> {
        CITY_PATTERNS
            .iter()
            .filter(|(pattern, _)| pattern.is_match(text))
            .map(|(_, city)| city.to_string())
            .collect()
    }

    fn extract_max_risk_score(&self, text: &str) -> Option<f64> {
        MAX_RISK_PATTERN
            .as_ref()
            .and_then(|pattern| pattern.captures(text))
            .and_then(|caps| caps.get(1))
            .and_then(|value| value.as_str().parse::<f64>().ok())
            .filter(|value| (0.0..=1.0).contains(value))
    }

    fn extract_result_limit(&self, text: &str) -> Option<i64> {
        LIMIT_PATTERN
            .as_ref()
            .and_then(|pattern| pattern.captures(text))
            .and_then(|caps| caps.get(1))
            .and_then(|value| number_word(value.as_str()))
            .filter(|limit| *limit > 0)
    }
}
