//! Model-backed query interpretation with rule-based fallback.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::time::Duration;
use validator::Validate;

use crate::core::aliases;
use crate::interpreter::{rules::RuleBasedInterpreter, QueryInterpreter};
use crate::models::{MatchCriteria, SortOrder};
use crate::services::llm::{ModelClient, ModelError};

/// Instruction sent with every interpretation request, built once from the
/// canonical vocabulary
static INSTRUCTION: Lazy<String> = Lazy::new(|| {
    let vocabulary = aliases::vocabulary();

    format!(
        r#"You turn a buyer's free-text request for technology vendors into structured search criteria.

Reply with a single JSON object and nothing else, using these keys:
- "industry": one of [{segments}] or null
- "region": legacy single region, one of [{regions}] or null
- "regions": list of regions from [{regions}]; use "global" only when the buyer asks for worldwide coverage
- "cities": list of city names exactly as the buyer wrote them
- "required_certs": list of certifications, written canonically ("HIPAA", "SOC 2", "ISO 27001", "PCI DSS", "HITRUST", "FedRAMP")
- "required_services": list from [{services}]
- "risk_tolerance": integer 1-10 (1 = very low risk, 3 = low risk, 5 = moderate, 7 = high, 8 = any risk) or null
- "max_risk_score": number between 0 and 1 when the buyer states an explicit risk ceiling, else null
- "result_limit": positive integer when the buyer asks for a number of results, else null
- "sort_by": "score_desc", "risk_asc" or "name_asc"

Rules:
- Only include a certification or service the buyer actually asked for.
- "top two", "best 3" and similar set result_limit.
- "lowest risk first" means sort_by "risk_asc"; "alphabetical" means "name_asc".
- Use null or an empty list for anything not mentioned."#,
        segments = quoted(&vocabulary.segments),
        regions = quoted(&vocabulary.regions),
        services = quoted(&vocabulary.services),
    )
});

fn quoted(terms: &[&str]) -> String {
    terms
        .iter()
        .map(|term| format!("\"{}\"", term))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The instruction text given to the model
pub fn instruction() -> &'static str {
    INSTRUCTION.as_str()
}

/// Shape the model is asked to return
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModelCriteria {
    industry: Option<String>,
    region: Option<String>,
    regions: Vec<String>,
    cities: Vec<String>,
    #[serde(alias = "required_certifications")]
    required_certs: Vec<String>,
    required_services: Vec<String>,
    risk_tolerance: Option<i64>,
    max_risk_score: Option<f64>,
    result_limit: Option<i64>,
    #[serde(alias = "sort_order")]
    sort_by: Option<String>,
}

impl ModelCriteria {
    /// Convert into criteria, rejecting anything outside the criteria contract
    fn into_criteria(self, text: &str) -> Result<MatchCriteria, ModelError> {
        let sort_order = match self.sort_by.as_deref().map(str::trim) {
            None | Some("") => SortOrder::default(),
            Some(value) => SortOrder::parse(value).ok_or_else(|| {
                ModelError::SchemaViolation(format!("unknown sort_by: {}", value))
            })?,
        };

        let criteria = MatchCriteria {
            industry: non_blank(self.industry),
            region: non_blank(self.region),
            regions: dedupe(self.regions),
            cities: dedupe(self.cities),
            required_certifications: collect_set(self.required_certs),
            required_services: collect_set(self.required_services),
            max_risk_score: self.max_risk_score,
            risk_tolerance: self.risk_tolerance,
            result_limit: self.result_limit,
            sort_order,
            raw_text: Some(text.to_string()),
        };

        criteria
            .validate()
            .map_err(|e| ModelError::SchemaViolation(e.to_string()))?;

        Ok(criteria)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn dedupe(values: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values
        .into_iter()
        .filter_map(|v| non_blank(Some(v)))
        .filter(|v| seen.insert(v.to_lowercase()))
        .collect()
}

fn collect_set(values: Vec<String>) -> BTreeSet<String> {
    values.into_iter().filter_map(|v| non_blank(Some(v))).collect()
}

/// Models sometimes wrap JSON in a markdown fence despite instructions
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

/// Interprets queries with a language model, falling back to the rule-based
/// interpreter on any failure
pub struct ModelBackedInterpreter<C> {
    client: C,
    fallback: RuleBasedInterpreter,
    timeout: Duration,
}

impl<C: ModelClient> ModelBackedInterpreter<C> {
    pub fn new(client: C, timeout: Duration) -> Self {
        Self {
            client,
            fallback: RuleBasedInterpreter::new(),
            timeout,
        }
    }

    /// One model round trip, bounded by the configured timeout
    async fn try_interpret(&self, text: &str) -> Result<MatchCriteria, ModelError> {
        let prompt = format!("Parse this vendor search query:\n\n{}", text);

        let raw = tokio::time::timeout(self.timeout, self.client.complete(instruction(), &prompt))
            .await
            .map_err(|_| ModelError::Timeout(self.timeout))??;

        let parsed: ModelCriteria = serde_json::from_str(strip_code_fence(&raw))?;
        parsed.into_criteria(text)
    }
}

#[async_trait]
impl<C: ModelClient> QueryInterpreter for ModelBackedInterpreter<C> {
    async fn interpret(&self, text: &str) -> MatchCriteria {
        match self.try_interpret(text).await {
            Ok(criteria) => {
                tracing::debug!("Model interpretation succeeded");
                criteria
            }
            Err(e) => {
                tracing::warn!("Model interpretation failed, using rule-based fallback: {}", e);
                self.fallback.parse(text)
            }
        }
    }

    fn strategy(&self) -> &'static str {
        "model"
    }
}
