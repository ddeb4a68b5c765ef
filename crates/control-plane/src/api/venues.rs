// Venue lookup HTTP routes

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use schedulink_core::Venue;
use std::sync::Arc;
use uuid::Uuid;

use super::common::{ErrorResponse, ListResponse};
use super::error::ApiError;
use crate::services::VenueService;

/// App state for venue routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<VenueService>,
}

impl AppState {
    pub fn new(service: Arc<VenueService>) -> Self {
        Self { service }
    }
}

/// Create venue routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/venues", get(list_venues))
        .route("/v1/venues/:venue_id", get(get_venue))
        .with_state(state)
}

/// GET /v1/venues - List venues by name
#[utoipa::path(
    get,
    path = "/v1/venues",
    responses(
        (status = 200, description = "List of venues", body = ListResponse<Venue>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "venues"
)]
pub async fn list_venues(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<Venue>>, ApiError> {
    let venues = state.service.list().await?;
    Ok(Json(ListResponse::new(venues)))
}

/// GET /v1/venues/{venue_id} - Get venue by ID
#[utoipa::path(
    get,
    path = "/v1/venues/{venue_id}",
    params(
        ("venue_id" = Uuid, Path, description = "Venue ID")
    ),
    responses(
        (status = 200, description = "Venue found", body = Venue),
        (status = 404, description = "Venue not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "venues"
)]
pub async fn get_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<Uuid>,
) -> Result<Json<Venue>, ApiError> {
    let venue = state.service.get(venue_id).await?;
    Ok(Json(venue))
}
