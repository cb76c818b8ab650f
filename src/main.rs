use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use vendor_match::config::{LoggingSettings, Settings, StorageBackend};
use vendor_match::core::Matcher;
use vendor_match::interpreter::build_interpreter;
use vendor_match::routes::{self, AppState};
use vendor_match::services::{CandidateSource, InMemoryCatalog, MatchService, PostgresCatalog};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over `logging.level`; `LOG_FORMAT` wins over `logging.format`.
fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn startup_error(message: String) -> std::io::Error {
    error!("{}", message);
    std::io::Error::new(std::io::ErrorKind::Other, message)
}

/// Open the configured candidate source
async fn build_catalog(settings: &Settings) -> std::io::Result<Arc<dyn CandidateSource>> {
    match settings.storage.backend {
        StorageBackend::Postgres => {
            let catalog = PostgresCatalog::from_settings(
                &settings.database.url,
                settings.database.max_connections,
                settings.database.min_connections,
                settings.database.acquire_timeout_secs,
            )
            .await
            .map_err(|e| startup_error(format!("Failed to connect to PostgreSQL: {}", e)))?;

            info!("PostgreSQL vendor catalog initialized");
            Ok(Arc::new(catalog))
        }
        StorageBackend::File => {
            let catalog = InMemoryCatalog::load(&settings.storage.path).map_err(|e| {
                startup_error(format!(
                    "Failed to load vendor seed file {}: {}",
                    settings.storage.path, e
                ))
            })?;

            info!("In-memory vendor catalog initialized ({} vendors)", catalog.len());
            Ok(Arc::new(catalog))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load();

    match &settings {
        Ok(settings) => init_tracing(&settings.logging),
        Err(_) => init_tracing(&LoggingSettings::default()),
    }

    info!("Starting vendor matching service...");

    let settings = settings.map_err(|e| startup_error(format!("Failed to load configuration: {}", e)))?;

    info!("Configuration loaded successfully");

    let catalog = build_catalog(&settings).await?;
    let interpreter = build_interpreter(&settings.interpreter);

    let limits = settings.matching.limits();
    let matcher = Matcher::new(limits);

    info!(
        "Matcher initialized (default limit: {}, max limit: {})",
        limits.default_limit, limits.max_limit
    );

    // Build application state
    let app_state = AppState {
        service: MatchService::new(catalog, interpreter, matcher),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
