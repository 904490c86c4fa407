use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::location::{builtin_city_list, format_coords, CityInfo, GeoFix, LocationError, Placement};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

impl From<LocationError> for ApiError {
    fn from(e: LocationError) -> Self {
        let status = match &e {
            LocationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            LocationError::UnknownPlace(_) => StatusCode::NOT_FOUND,
            LocationError::Network(_) | LocationError::Parse(_) => StatusCode::BAD_GATEWAY,
            LocationError::ProviderUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            LocationError::CapabilityVeto(_) => StatusCode::UNPROCESSABLE_ENTITY,
            LocationError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        api_error(status, e.to_string())
    }
}

// ─── GET /api/place ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PlaceQuery {
    pub query: Option<String>,
}

pub async fn place(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PlaceQuery>,
) -> Result<Json<Placement>, ApiError> {
    let start = Instant::now();

    let query = params.query.as_deref().unwrap_or("").trim();
    if query.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'query' parameter"));
    }

    let fix = state.resolver.resolve_place(query).await?;
    let placement = state.resolver.place(fix, &state.terrain);

    info!(
        query,
        label = %placement.label,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "GET /api/place"
    );
    Ok(Json(placement))
}

// ─── GET /api/address ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AddressQuery {
    pub address: Option<String>,
}

pub async fn address(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AddressQuery>,
) -> Result<Json<Placement>, ApiError> {
    let address = params.address.as_deref().unwrap_or("").trim();
    if address.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'address' parameter"));
    }

    match state.resolver.resolve_address(address).await? {
        Some(fix) => Ok(Json(state.resolver.place(fix, &state.terrain))),
        None => Err(api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("'{}' is a private address and is not looked up", address),
        )),
    }
}

// ─── GET /api/geo ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct GeoQuery {
    pub x: f64,
    pub z: f64,
}

#[derive(Serialize)]
pub struct GeoResponse {
    pub fix: GeoFix,
    pub label: String,
    pub formatted_coords: String,
}

pub async fn geo(State(state): State<Arc<AppState>>, Query(params): Query<GeoQuery>) -> Json<GeoResponse> {
    let (fix, label) = state.resolver.describe_position(params.x, params.z);
    let formatted_coords = format_coords(fix.lat, fix.lon);
    Json(GeoResponse { fix, label, formatted_coords })
}

// ─── GET /api/cities ─────────────────────────────────────────────

pub async fn city_list() -> Json<Vec<CityInfo>> {
    Json(builtin_city_list())
}
