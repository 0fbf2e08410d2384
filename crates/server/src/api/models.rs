//! Request and response models for API operations

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters of `GET /search/{query}`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Restrict results to this city; only its first word is matched
    #[serde(default, deserialize_with = "empty_as_none")]
    pub city: Option<String>,
}

/// `?city=` with no value behaves like no filter at all
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()))
}

/// Body of every JSON error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of `GET /health`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// "healthy" or "unhealthy"
    pub status: String,
    pub version: String,
    /// "reachable" or "unreachable"
    pub engine: String,
}
