use crate::error::{InsightError, Result};
use crate::orchestrator::{AnalysisOrchestrator, AnalysisOutcome, AnalysisReport};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

/// Message sent when the analysis ran
pub const COMPLETED_MESSAGE: &str = "Analysis completed successfully";
/// Message sent when no repository had commits inside the window
pub const NO_COMMITS_MESSAGE: &str = "No commits found in the specified time period";
/// Error sent when the body does not name a GitHub URL
pub const MISSING_URL_ERROR: &str = "Missing github_url in request body";

/// Request payload for `POST /analyze`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// GitHub account or repository URL
    pub github_url: String,
    /// Trailing window in days; the server default applies when absent
    pub days: Option<u32>,
}

impl AnalyzeRequest {
    /// Parses and validates a raw request body
    ///
    /// A body that is not a JSON object, or whose `github_url` is missing,
    /// null or blank, is reported as a missing URL. `days` must be a
    /// non-negative integer or null.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|_| InsightError::invalid_input(MISSING_URL_ERROR))?;
        let object = value
            .as_object()
            .ok_or_else(|| InsightError::invalid_input(MISSING_URL_ERROR))?;

        let github_url = object
            .get("github_url")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| InsightError::invalid_input(MISSING_URL_ERROR))?;

        let days = match object.get("days") {
            None | Some(Value::Null) => None,
            Some(days) => Some(
                days.as_u64()
                    .and_then(|d| u32::try_from(d).ok())
                    .ok_or_else(|| {
                        InsightError::invalid_input(format!("days must be a non-negative integer, got {}", days))
                    })?,
            ),
        };

        Ok(Self {
            github_url: github_url.to_string(),
            days,
        })
    }
}

/// Envelope returned by `POST /analyze` on success
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Human-readable status
    pub message: String,
    /// The report, or null when no commits were found
    pub data: Option<AnalysisReport>,
}

impl From<&AnalysisOutcome> for AnalyzeResponse {
    fn from(outcome: &AnalysisOutcome) -> Self {
        match outcome {
            AnalysisOutcome::Completed { report, .. } => Self {
                message: COMPLETED_MESSAGE.to_string(),
                data: Some(report.clone()),
            },
            AnalysisOutcome::NoCommits { .. } => Self {
                message: NO_COMMITS_MESSAGE.to_string(),
                data: None,
            },
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Current status
    pub status: String,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<AnalysisOrchestrator>,
    default_days: u32,
}

impl AppState {
    /// Bundles the orchestrator with the window used when requests omit `days`
    pub fn new(orchestrator: AnalysisOrchestrator, default_days: u32) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            default_days,
        }
    }
}

/// Create the application router with all routes
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/analyze", post(analyze))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> ResponseJson<Value> {
    let health = HealthResponse {
        status: "healthy".to_string(),
    };
    ResponseJson(json!(health))
}

/// Commit analysis endpoint
async fn analyze(State(state): State<AppState>, body: Bytes) -> (StatusCode, ResponseJson<Value>) {
    let request = match AnalyzeRequest::from_body(&body) {
        Ok(request) => request,
        Err(e) => return error_response(e),
    };
    let days = request.days.unwrap_or(state.default_days);
    info!("Analysis requested for {} ({} days)", request.github_url, days);

    match state.orchestrator.analyze(&request.github_url, days).await {
        Ok(outcome) => (StatusCode::OK, ResponseJson(json!(AnalyzeResponse::from(&outcome)))),
        Err(e) => error_response(e),
    }
}

fn error_response(e: InsightError) -> (StatusCode, ResponseJson<Value>) {
    let status = if e.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        error!("Analysis failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    };
    let message = match e {
        InsightError::InvalidInput(message) => message,
        other => other.to_string(),
    };
    (status, ResponseJson(json!({ "error": message })))
}
