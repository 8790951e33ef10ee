//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::cluster::{find_cluster, Cluster, ClusterMode, Clusterer, MapItem};
use crate::error::Error;
use crate::format::{available_formats, FormatInfo};
use crate::geo::{get_ip_locator, GeoPoint, ViewerLocation};
use crate::model::{available_vibes, Place, Post, VibeInfo};
use crate::rank::{hot_spots_for_category, places_for_category, rank_places, RankMode, RankedPlace};
use crate::server::state::AppState;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/rank", post(rank_handler))
        .route("/api/cluster", post(cluster_handler))
        .route("/api/places/picker", post(picker_handler))
        .route("/api/vibes", get(vibes_handler))
        .route("/api/formats", get(formats_handler))
        .route("/api/status", get(status_handler))
        .route("/api/location", get(location_handler))
        .nest_service(
            "/",
            ServeDir::new(static_dir()).append_index_html_on_directories(true),
        )
        .with_state(state)
}

/// Static files live in `static/` under the cwd, or next to the executable
fn static_dir() -> PathBuf {
    let local = PathBuf::from("static");
    if local.exists() {
        return local;
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("static")))
        .filter(|path| path.exists())
        .unwrap_or(local)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn new(code: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
        }
    }

    fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "INVALID_REQUEST" | "INVALID_GEO_POINT" | "INVALID_THRESHOLD" | "CONFIG_ERROR" => {
                StatusCode::BAD_REQUEST
            }
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidGeoPoint(_) => "INVALID_GEO_POINT",
            Error::InvalidThreshold(_) => "INVALID_THRESHOLD",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Http(_) | Error::Geo(_) => "LOCATION_ERROR",
            _ => "INTERNAL_ERROR",
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new("INVALID_REQUEST", rejection.body_text())
    }
}

/// Rank request body
#[derive(Debug, Deserialize)]
pub struct RankRequest {
    #[serde(default)]
    pub places: Vec<Place>,
    #[serde(default)]
    pub posts: Vec<Post>,
    /// Viewer location; popularity order when absent
    pub viewer: Option<GeoPoint>,
    /// Only return places in this category
    pub category: Option<String>,
}

/// Rank response
#[derive(Debug, Serialize, Deserialize)]
pub struct RankResponse {
    pub mode: RankMode,
    pub places: Vec<RankedPlace>,
}

/// Order places for the "Hot Spots Now" list
///
/// POST /api/rank
async fn rank_handler(
    payload: Result<Json<RankRequest>, JsonRejection>,
) -> Result<Json<RankResponse>, ApiError> {
    let Json(req) = payload?;
    let mut places = rank_places(&req.places, &req.posts, req.viewer)?;
    if let Some(category) = &req.category {
        places = hot_spots_for_category(places, category);
    }

    Ok(Json(RankResponse {
        mode: RankMode::for_viewer(req.viewer),
        places,
    }))
}

/// Cluster request body
#[derive(Debug, Deserialize)]
pub struct ClusterRequest {
    #[serde(default)]
    pub posts: Vec<Post>,
    /// A cluster from a previous response to show as individual pins
    pub expand: Option<Cluster>,
    /// Id of a cluster in the overview of `posts` to show as individual pins
    pub expand_id: Option<String>,
    /// Override the configured join radius
    pub threshold_deg: Option<f64>,
}

/// Cluster response
#[derive(Debug, Serialize, Deserialize)]
pub struct ClusterResponse {
    pub items: Vec<MapItem>,
    pub count: usize,
}

/// Group posts into map markers
///
/// POST /api/cluster
async fn cluster_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ClusterRequest>, JsonRejection>,
) -> Result<Json<ClusterResponse>, ApiError> {
    let Json(req) = payload?;
    let clusterer = match req.threshold_deg {
        Some(threshold) => Clusterer::new(threshold)?,
        None => state.clusterer().await?,
    };

    let items = match (&req.expand, &req.expand_id) {
        (Some(cluster), _) => clusterer.cluster(&req.posts, ClusterMode::Expanded(cluster)),
        (None, Some(id)) => {
            let overview = clusterer.cluster(&req.posts, ClusterMode::Overview);
            let cluster = find_cluster(&overview, id)
                .ok_or_else(|| ApiError::new("NOT_FOUND", format!("Cluster not found: {}", id)))?;
            clusterer.cluster(&req.posts, ClusterMode::Expanded(cluster))
        }
        (None, None) => clusterer.cluster(&req.posts, ClusterMode::Overview),
    };

    Ok(Json(ClusterResponse {
        count: items.len(),
        items,
    }))
}

/// Place picker request body
#[derive(Debug, Deserialize)]
pub struct PickerRequest {
    #[serde(default)]
    pub places: Vec<Place>,
    pub category: String,
    pub viewer: Option<GeoPoint>,
}

/// Place picker response
#[derive(Debug, Serialize, Deserialize)]
pub struct PickerResponse {
    pub category: String,
    pub places: Vec<RankedPlace>,
}

/// Places to choose from when composing a post
///
/// POST /api/places/picker
async fn picker_handler(
    payload: Result<Json<PickerRequest>, JsonRejection>,
) -> Result<Json<PickerResponse>, ApiError> {
    let Json(req) = payload?;
    let places = places_for_category(&req.places, &req.category, req.viewer)?;
    Ok(Json(PickerResponse {
        category: req.category,
        places,
    }))
}

/// Vibes list response
#[derive(Debug, Serialize, Deserialize)]
pub struct VibesResponse {
    pub vibes: Vec<VibeInfo>,
}

/// List the vibe options
///
/// GET /api/vibes
async fn vibes_handler() -> Json<VibesResponse> {
    Json(VibesResponse {
        vibes: available_vibes().iter().map(|v| v.info()).collect(),
    })
}

/// Formats list response
#[derive(Debug, Serialize, Deserialize)]
pub struct FormatsResponse {
    pub formats: Vec<FormatInfo>,
}

/// List available output formats
///
/// GET /api/formats
async fn formats_handler() -> Json<FormatsResponse> {
    Json(FormatsResponse {
        formats: available_formats(),
    })
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Configured join radius for clustering
    pub cluster_threshold_deg: f64,
    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let cluster_threshold_deg = state.config.read().await.cluster.threshold_deg;

    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        cluster_threshold_deg,
        uptime_secs: state.uptime().as_secs(),
    })
}

/// Get current location from IP address
///
/// GET /api/location
async fn location_handler() -> Result<Json<ViewerLocation>, ApiError> {
    let location = get_ip_locator().locate().await?;
    Ok(Json(location))
}
