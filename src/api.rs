// 🌐 HTTP boundary - REST API with Axum
// Thin plumbing: JSON in, analyzer call, JSON out. Only built with the `server` feature.

use crate::analyzer::{issuer_fingerprint, KeyAnalyzer, PatternResult};
use crate::classifier::KeyBatch;
use crate::error::AnalysisError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Shared application state; the analyzer is immutable so no lock is needed
#[derive(Clone)]
struct AppState {
    analyzer: Arc<KeyAnalyzer>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub keys: Option<Vec<String>>,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
enum ApiError {
    /// Caller-input problem, message returned verbatim
    BadRequest(String),

    /// Anything else; logged server-side, opaque to the caller
    Internal(anyhow::Error),
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(err) => {
                error!(error = ?err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// POST /api/analyze - Classify the random-code pattern of a key batch
async fn analyze_keys(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let span = info_span!("analyze", request_id = %Uuid::new_v4());

    async move {
        match run_analysis(state, payload).await {
            Ok(result) => Json(result).into_response(),
            Err(err) => err.into_response(),
        }
    }
    .instrument(span)
    .await
}

async fn run_analysis(
    state: AppState,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<PatternResult, ApiError> {
    let keys = match payload {
        Ok(Json(AnalyzeRequest { keys: Some(keys) })) => keys,
        Ok(_) => {
            warn!("request without keys");
            return Err(ApiError::BadRequest("No keys provided".to_string()));
        }
        Err(rejection) => {
            warn!(error = %rejection, "unreadable request body");
            return Err(ApiError::BadRequest("No keys provided".to_string()));
        }
    };

    let analyzer = Arc::clone(&state.analyzer);
    let outcome = tokio::task::spawn_blocking(move || {
        let batch = KeyBatch::from_keys(&keys)?;
        let fingerprint = issuer_fingerprint(batch.taxpayer_id());
        Ok::<_, AnalysisError>((analyzer.analyze_batch(&batch), fingerprint, batch.len()))
    })
    .await;

    match outcome {
        Ok(Ok((result, issuer, batch_size))) => {
            // details may hold derived key values and stay out of the log
            info!(
                issuer = %issuer,
                batch_size,
                pattern = %result.pattern,
                vulnerability_level = %result.vulnerability_level,
                vulnerability_score = result.vulnerability_score,
                confidence = result.confidence,
                "analysis complete"
            );
            Ok(result)
        }
        Ok(Err(err)) => {
            warn!(error = %err, "validation error");
            Err(err.into())
        }
        Err(join_err) => Err(ApiError::Internal(
            anyhow::Error::new(join_err).context("analysis task failed"),
        )),
    }
}

// ============================================================================
// Router
// ============================================================================

/// Build the API router around a shared analyzer
pub fn router(analyzer: KeyAnalyzer) -> Router {
    let state = AppState {
        analyzer: Arc::new(analyzer),
    };

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/analyze", post(analyze_keys))
        .with_state(state);

    Router::new().nest("/api", api_routes).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}

// ============================================================================
// TESTS
// ============================================================================
