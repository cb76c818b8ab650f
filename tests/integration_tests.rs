// Integration tests for Vendor Match

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use vendor_match::core::{MatchError, Matcher, ResultLimits};
use vendor_match::interpreter::{ModelBackedInterpreter, QueryInterpreter, RuleBasedInterpreter};
use vendor_match::models::{MatchCriteria, ScoredResult, SortOrder};
use vendor_match::services::{
    CandidateSource, InMemoryCatalog, MatchService, ModelClient, ModelError,
};

const SAMPLE_SEED: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/vendors.sample.json");

fn sample_catalog() -> Arc<dyn CandidateSource> {
    Arc::new(InMemoryCatalog::load(SAMPLE_SEED).unwrap())
}

fn rule_based_service() -> MatchService {
    MatchService::new(
        sample_catalog(),
        Arc::new(RuleBasedInterpreter::new()),
        Matcher::with_default_limits(),
    )
}

fn ids(results: &[ScoredResult]) -> Vec<&str> {
    results.iter().map(|r| r.vendor.vendor_id.as_str()).collect()
}

fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Model client that is always down
struct UnreachableModel;

#[async_trait]
impl ModelClient for UnreachableModel {
    async fn complete(&self, _instruction: &str, _prompt: &str) -> Result<String, ModelError> {
        Err(ModelError::ApiError("Completion request failed: 502 Bad Gateway".into()))
    }
}

#[tokio::test]
async fn test_integration_hipaa_colo_query() {
    let outcome = rule_based_service()
        .match_text("I need a HIPAA-compliant colo in the US East with low risk")
        .await
        .unwrap();

    assert_eq!(outcome.criteria.required_certifications, set(&["HIPAA"]));
    assert_eq!(outcome.criteria.industry.as_deref(), Some("colocation"));
    assert_eq!(outcome.criteria.region.as_deref(), Some("us-east"));
    assert_eq!(outcome.criteria.risk_tolerance, Some(3));

    // Harbor Colo holds HIPAA but its risk (0.35) is above the 0.30 threshold
    assert_eq!(outcome.result.total_candidates, 6);
    assert_eq!(ids(&outcome.result.matches), vec!["v-acme"]);

    let acme = &outcome.result.matches[0];
    assert_eq!(acme.total_score, 4);
    assert_eq!(
        acme.matched_reasons,
        vec![
            "industry match: colocation",
            "region match: us-east",
            "holds certification: HIPAA Compliant",
            "offers service: colocation - Retail cages and private suites",
            "risk within tolerance: 0.22 <= 0.30",
        ]
    );
}

#[tokio::test]
async fn test_integration_backup_dr_query() {
    let outcome = rule_based_service()
        .match_text(
            "I need a backup & disaster-recovery vendor that keeps immutable copies in both \
             US-West and EU-Central, carries ISO-27001, and has a risk_level_guess below 0.25. \
             Return only the top two, ranked by lowest risk first.",
        )
        .await
        .unwrap();

    assert_eq!(outcome.criteria.max_risk_score, Some(0.25));
    assert_eq!(outcome.criteria.result_limit, Some(2));
    assert_eq!(outcome.criteria.sort_order, SortOrder::RiskAsc);

    let matches = &outcome.result.matches;
    assert_eq!(ids(matches), vec!["v-summit", "v-acme"]);

    let summit = &matches[0];
    assert_eq!(summit.score_breakdown.industry, 1);
    assert_eq!(summit.score_breakdown.region, 1);
    assert_eq!(summit.score_breakdown.certifications, 1);
    assert_eq!(summit.score_breakdown.services, 3);
    assert!(summit
        .matched_reasons
        .contains(&"region match: us-west (global coverage)".to_string()));
    assert!(summit
        .matched_reasons
        .contains(&"offers service: disaster-recovery - DRaaS with 15-minute RTO".to_string()));
}

#[tokio::test]
async fn test_integration_network_query_with_cities() {
    let outcome = rule_based_service()
        .match_text("Network providers with 10 Gbps waves between Chicago and Dallas, top 5")
        .await
        .unwrap();

    let matches = &outcome.result.matches;
    assert_eq!(matches.len(), 5);
    assert_eq!(
        ids(matches),
        vec!["v-lattice", "v-summit", "v-acme", "v-harbor", "v-bastion"]
    );

    let lattice = &matches[0];
    assert_eq!(lattice.score_breakdown.locations, 2);
    assert_eq!(lattice.total_score, 5);
    assert!(lattice
        .matched_reasons
        .contains(&"facility in city: Chicago".to_string()));
}

#[tokio::test]
async fn test_integration_global_vendor_and_tiebreaks() {
    let criteria = MatchCriteria {
        regions: vec!["eu-central".to_string(), "apac".to_string()],
        ..Default::default()
    };

    let result = rule_based_service().match_criteria(&criteria).await.unwrap();

    // Zero-score vendors stay, ordered by known risk ascending then unknown
    assert_eq!(
        ids(&result.matches),
        vec!["v-summit", "v-acme", "v-lattice", "v-harbor", "v-bastion", "v-nimbus"]
    );
    assert_eq!(result.matches[0].score_breakdown.region, 2);
    assert!(result.matches[1..].iter().all(|r| r.total_score == 0));
}

#[tokio::test]
async fn test_integration_all_certifications_required() {
    let criteria = MatchCriteria {
        required_certifications: set(&["HIPAA", "SOC 2", "ISO 27001"]),
        ..Default::default()
    };

    let result = rule_based_service().match_criteria(&criteria).await.unwrap();

    assert_eq!(ids(&result.matches), vec!["v-acme"]);
    assert_eq!(result.matches[0].score_breakdown.certifications, 3);
}

#[tokio::test]
async fn test_integration_unknown_risk_passes_threshold() {
    let criteria = MatchCriteria {
        max_risk_score: Some(0.2),
        risk_tolerance: Some(9),
        ..Default::default()
    };

    let result = rule_based_service().match_criteria(&criteria).await.unwrap();

    assert_eq!(ids(&result.matches), vec!["v-summit", "v-nimbus"]);
    assert_eq!(
        result.matches[0].matched_reasons,
        vec!["risk within tolerance: 0.18 <= 0.20"]
    );
    assert!(result.matches[1].matched_reasons.is_empty());
}

#[tokio::test]
async fn test_integration_result_limits() {
    let service = rule_based_service();

    let unlimited = service.match_criteria(&MatchCriteria::default()).await.unwrap();
    assert_eq!(unlimited.matches.len(), 6);

    let one = MatchCriteria {
        result_limit: Some(1),
        ..Default::default()
    };
    assert_eq!(service.match_criteria(&one).await.unwrap().matches.len(), 1);

    let zero = MatchCriteria {
        result_limit: Some(0),
        ..Default::default()
    };
    assert!(matches!(
        service.match_criteria(&zero).await,
        Err(MatchError::InvalidCriteria(_))
    ));

    let capped = MatchService::new(
        sample_catalog(),
        Arc::new(RuleBasedInterpreter::new()),
        Matcher::new(ResultLimits {
            default_limit: 2,
            max_limit: 3,
        }),
    );
    assert_eq!(capped.match_criteria(&MatchCriteria::default()).await.unwrap().matches.len(), 2);
}

#[tokio::test]
async fn test_integration_name_sort() {
    let criteria = MatchCriteria {
        sort_order: SortOrder::NameAsc,
        ..Default::default()
    };

    let result = rule_based_service().match_criteria(&criteria).await.unwrap();
    let names: Vec<&str> = result.matches.iter().map(|r| r.vendor.name.as_str()).collect();

    assert_eq!(
        names,
        vec![
            "Acme Data Centers",
            "Bastion Security",
            "Harbor Colo",
            "Lattice Networks",
            "Nimbus Cloud",
            "Summit Backup",
        ]
    );
}

#[tokio::test]
async fn test_integration_model_outage_degrades_to_rules() {
    let text = "SOC 2 managed hosting in London, alphabetical, top 3";

    let model_backed = MatchService::new(
        sample_catalog(),
        Arc::new(ModelBackedInterpreter::new(UnreachableModel, Duration::from_secs(1))),
        Matcher::with_default_limits(),
    );

    let degraded = model_backed.match_text(text).await.unwrap();
    let baseline = rule_based_service().match_text(text).await.unwrap();

    assert_eq!(degraded.criteria, baseline.criteria);
    assert_eq!(degraded.result.matches, baseline.result.matches);
    assert_eq!(model_backed.interpreter().strategy(), "model");
}

#[tokio::test]
async fn test_integration_match_is_idempotent() {
    let service = rule_based_service();
    let text = "HIPAA or SOC 2 colocation near Ashburn, conservative";

    let first = service.match_text(text).await.unwrap();
    let second = service.match_text(text).await.unwrap();

    assert_eq!(first.criteria, second.criteria);
    assert_eq!(first.result.matches, second.result.matches);
}

#[tokio::test]
async fn test_integration_interpreter_is_usable_as_trait_object() {
    let interpreter: Arc<dyn QueryInterpreter> = Arc::new(RuleBasedInterpreter::new());
    let criteria = interpreter.interpret("fedramp cloud in the west coast").await;

    assert_eq!(criteria.required_certifications, set(&["FedRAMP"]));
    assert_eq!(criteria.industry.as_deref(), Some("cloud"));
    assert_eq!(criteria.region.as_deref(), Some("us-west"));
}
