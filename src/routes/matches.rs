use actix_web::{web, HttpResponse, Responder};
use tracing::Instrument;
use uuid::Uuid;
use validator::Validate;

use crate::core::MatchError;
use crate::models::{ErrorResponse, HealthResponse, MatchCriteria, MatchResponse, NlMatchRequest};
use crate::services::MatchService;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: MatchService,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/match/structured", web::post().to(match_structured))
        .route("/match/nl", web::post().to(match_natural_language));
}

/// Map a match failure onto the HTTP error shape
fn error_response(err: &MatchError) -> HttpResponse {
    match err {
        MatchError::InvalidCriteria(message) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid criteria".to_string(),
            message: message.clone(),
            status_code: 400,
        }),
        MatchError::StorageUnavailable(message) => {
            HttpResponse::ServiceUnavailable().json(ErrorResponse {
                error: "Vendor data unavailable".to_string(),
                message: message.clone(),
                status_code: 503,
            })
        }
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let catalog = state.service.catalog();

    let storage_healthy = match catalog.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("Health check against {} failed: {}", catalog.backend(), e);
            false
        }
    };

    let status = if storage_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: catalog.backend().to_string(),
        interpreter: state.service.interpreter().strategy().to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Structured match endpoint
///
/// POST /api/v1/match/structured
///
/// Request body (every field optional):
/// ```json
/// {
///   "industry": "colocation",
///   "regions": ["us-east"],
///   "required_certs": ["HIPAA"],
///   "risk_tolerance": 3,
///   "result_limit": 5,
///   "sort_by": "risk_asc"
/// }
/// ```
async fn match_structured(
    state: web::Data<AppState>,
    req: web::Json<MatchCriteria>,
) -> impl Responder {
    let request_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!("match_structured", request_id = %request_id);
    let criteria = req.into_inner();

    async move {
        tracing::info!("Structured match request");

        match state.service.match_criteria(&criteria).await {
            Ok(result) => HttpResponse::Ok().json(MatchResponse {
                request_id,
                vendors: result.matches,
                total_candidates: result.total_candidates,
                criteria: None,
            }),
            Err(e) => {
                tracing::info!("Structured match rejected: {}", e);
                error_response(&e)
            }
        }
    }
    .instrument(span)
    .await
}

/// Natural-language match endpoint
///
/// POST /api/v1/match/nl
///
/// Request body:
/// ```json
/// { "query": "HIPAA-compliant colo in US East with low risk" }
/// ```
async fn match_natural_language(
    state: web::Data<AppState>,
    req: web::Json<NlMatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for nl match request: {}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let request_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!("match_nl", request_id = %request_id);

    async move {
        tracing::info!("Natural-language match request ({} chars)", req.query.len());

        match state.service.match_text(&req.query).await {
            Ok(outcome) => HttpResponse::Ok().json(MatchResponse {
                request_id,
                vendors: outcome.result.matches,
                total_candidates: outcome.result.total_candidates,
                criteria: Some(outcome.criteria),
            }),
            Err(e) => {
                tracing::info!("Natural-language match rejected: {}", e);
                error_response(&e)
            }
        }
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Matcher;
    use crate::interpreter::RuleBasedInterpreter;
    use crate::models::VendorCandidate;
    use crate::services::{CandidateSource, InMemoryCatalog, StorageError};
    use actix_web::{http::StatusCode, test, App};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Arc;

    struct OfflineCatalog;

    #[async_trait]
    impl CandidateSource for OfflineCatalog {
        async fn fetch_candidates(&self) -> Result<Vec<VendorCandidate>, StorageError> {
            Err(StorageError::InvalidData("pool timed out".into()))
        }

        async fn health_check(&self) -> Result<bool, StorageError> {
            Err(StorageError::InvalidData("pool timed out".into()))
        }

        fn backend(&self) -> &'static str {
            "offline"
        }
    }

    fn candidate(id: &str, name: &str, certs: &[&str]) -> VendorCandidate {
        VendorCandidate {
            vendor_id: id.to_string(),
            name: name.to_string(),
            summary: None,
            hq_region: Some("us-east".to_string()),
            primary_segments: vec!["colocation".to_string()],
            risk_score: Some(0.2),
            held_certifications: certs.iter().map(|c| c.to_string()).collect(),
            offered_services: vec!["colocation".to_string()],
            facility_locations: vec!["us-east".to_string(), "Ashburn".to_string()],
        }
    }

    fn state(catalog: Arc<dyn CandidateSource>) -> web::Data<AppState> {
        web::Data::new(AppState {
            service: MatchService::new(
                catalog,
                Arc::new(RuleBasedInterpreter::new()),
                Matcher::default(),
            ),
        })
    }

    fn seeded() -> web::Data<AppState> {
        state(Arc::new(InMemoryCatalog::from_candidates(vec![
            candidate("1", "Acme Data Centers", &["HIPAA Compliant"]),
            candidate("2", "Beta Hosting", &["SOC 2"]),
        ])))
    }

    #[actix_web::test]
    async fn test_structured_match() {
        let app = test::init_service(App::new().app_data(seeded()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/match/structured")
            .set_json(json!({ "required_certs": ["HIPAA"], "industry": "colocation" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["total_candidates"], 2);
        assert_eq!(body["vendors"].as_array().unwrap().len(), 1);
        assert_eq!(body["vendors"][0]["name"], "Acme Data Centers");
        assert!(body["request_id"].as_str().is_some());
        assert!(body.get("criteria").is_none());
    }

    #[actix_web::test]
    async fn test_invalid_criteria_is_bad_request() {
        let app = test::init_service(App::new().app_data(seeded()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/match/structured")
            .set_json(json!({ "result_limit": 0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_nl_match_echoes_criteria() {
        let app = test::init_service(App::new().app_data(seeded()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/match/nl")
            .set_json(json!({ "query": "I need a HIPAA-compliant colo in the US East with low risk" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["criteria"]["industry"], "colocation");
        assert_eq!(body["criteria"]["risk_tolerance"], 3);
        assert_eq!(body["vendors"][0]["vendor_id"], "1");
    }

    #[actix_web::test]
    async fn test_empty_query_is_rejected() {
        let app = test::init_service(App::new().app_data(seeded()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/match/nl")
            .set_json(json!({ "query": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_storage_outage_is_service_unavailable() {
        let app = test::init_service(
            App::new()
                .app_data(state(Arc::new(OfflineCatalog)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/match/structured")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["interpreter"], "rules");
    }
}
