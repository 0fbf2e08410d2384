//! REST API server implementation using Axum
//!
//! This module provides the REST API server with OpenAPI documentation,
//! routing requests through the query compiler and the search gateway.

use crate::api::{ErrorResponse, HealthResponse, SearchGateway, SearchParams};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use bizsearch_core::{
    compile, config::ServerConfig, BusinessDocument, Error, ReviewRecord, SearchApi,
};
use bizsearch_storage::DocumentEngine;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    gateway: Arc<SearchGateway>,
}

impl AppState {
    /// State sharing one engine client across all requests
    pub fn new(engine: Arc<dyn DocumentEngine>) -> Self {
        Self {
            gateway: Arc::new(SearchGateway::new(engine)),
        }
    }
}

/// Build the Axum router with all endpoints
pub fn build_router(state: AppState, server_config: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/search/{query}", get(search_handler))
        .route("/reviews/{business_id}", get(reviews_handler))
        // Health check
        .route("/health", get(health_handler))
        // OpenAPI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Configure CORS based on allowed_origins
    let cors_layer = if server_config.allowed_origins.is_empty() {
        // CORS disabled
        CorsLayer::new()
    } else if server_config.allowed_origins.contains(&"*".to_string()) {
        // Allow all origins
        CorsLayer::permissive()
    } else {
        // Allow specific origins
        let mut cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([axum::http::header::CONTENT_TYPE]);

        for origin in &server_config.allowed_origins {
            match HeaderValue::from_str(origin) {
                Ok(header_value) => cors = cors.allow_origin(header_value),
                Err(e) => tracing::warn!("Ignoring invalid CORS origin '{origin}': {e}"),
            }
        }
        cors
    };

    router
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /search/{query}
#[utoipa::path(
    get,
    path = "/search/{query}",
    params(
        ("query" = String, Path, description = "Free-text query, matched case-insensitively"),
        SearchParams
    ),
    responses(
        (status = 200, description = "Up to 50 businesses, best match first", body = [BusinessDocument]),
        (status = 502, description = "Search engine returned an unusable answer", body = ErrorResponse),
        (status = 503, description = "Search engine unavailable", body = ErrorResponse),
        (status = 504, description = "Search engine timed out", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "search"
)]
async fn search_handler(
    State(state): State<AppState>,
    Path(query): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<BusinessDocument>>, ApiError> {
    tracing::info!(
        "Search request: query='{}', city={:?}",
        query,
        params.city.as_deref()
    );

    let request = compile(&query, params.city.as_deref());
    let results = state.gateway.search(&request).await?;
    Ok(Json(results))
}

/// GET /reviews/{business_id}
#[utoipa::path(
    get,
    path = "/reviews/{business_id}",
    params(
        ("business_id" = String, Path, description = "Business identifier")
    ),
    responses(
        (status = 200, description = "Reviews of the business, as stored", body = [ReviewRecord]),
        (status = 404, description = "No business with this id (empty body)"),
        (status = 502, description = "Search engine returned an unusable answer", body = ErrorResponse),
        (status = 503, description = "Search engine unavailable", body = ErrorResponse),
        (status = 504, description = "Search engine timed out", body = ErrorResponse)
    ),
    tag = "reviews"
)]
async fn reviews_handler(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
) -> Result<Json<Vec<ReviewRecord>>, ApiError> {
    tracing::info!("Reviews request: business_id='{business_id}'");

    let reviews = state.gateway.get_reviews(&business_id).await?;
    Ok(Json(reviews))
}

/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and search engine are healthy", body = HealthResponse),
        (status = 503, description = "Search engine unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (status, health) = match state.gateway.health_check().await {
        Ok(()) => (StatusCode::OK, ("healthy", "reachable")),
        Err(e) => {
            tracing::warn!("Health check failed: {e}");
            (StatusCode::SERVICE_UNAVAILABLE, ("unhealthy", "unreachable"))
        }
    };

    let body = HealthResponse {
        status: health.0.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        engine: health.1.to_string(),
    };

    (status, Json(body))
}

/// Error handling for API endpoints
#[derive(Debug)]
pub enum ApiError {
    NotFound,
    BadGateway(String),
    ServiceUnavailable(String),
    GatewayTimeout(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            // Unknown businesses answer with a bare 404
            ApiError::NotFound => return StatusCode::NOT_FOUND.into_response(),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::GatewayTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
            ApiError::Internal(err) => {
                // Log the full error details for debugging
                tracing::error!("Internal server error: {err:?}");
                // Return a generic message to the client to avoid information disclosure
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(what) => {
                tracing::debug!("Not found: {what}");
                ApiError::NotFound
            }
            Error::EngineUnavailable(_) => {
                tracing::warn!("{err}");
                ApiError::ServiceUnavailable(err.to_string())
            }
            Error::EngineTimeout(_) => {
                tracing::warn!("{err}");
                ApiError::GatewayTimeout(err.to_string())
            }
            Error::Engine(_) => {
                tracing::error!("{err}");
                ApiError::BadGateway(err.to_string())
            }
            other => ApiError::Internal(other.into()),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(search_handler, reviews_handler, health_handler),
    components(schemas(BusinessDocument, ReviewRecord, ErrorResponse, HealthResponse)),
    tags(
        (name = "search", description = "Business search"),
        (name = "reviews", description = "Business review lookup"),
        (name = "health", description = "Health check endpoints")
    )
)]
struct ApiDoc;
