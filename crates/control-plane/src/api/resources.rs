// Resource booking HTTP routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use schedulink_core::Notification;
use std::sync::Arc;
use uuid::Uuid;

use super::common::ErrorResponse;
use super::error::ApiError;
use crate::services::ResourceService;

/// App state for resource routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ResourceService>,
}

impl AppState {
    pub fn new(service: Arc<ResourceService>) -> Self {
        Self { service }
    }
}

/// Create resource routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/resources/:resource_id/book", post(book_resource))
        .with_state(state)
}

/// POST /v1/resources/{resource_id}/book - Request a resource booking
#[utoipa::path(
    post,
    path = "/v1/resources/{resource_id}/book",
    params(
        ("resource_id" = Uuid, Path, description = "Resource ID")
    ),
    responses(
        (status = 201, description = "Booking request filed", body = Notification),
        (status = 400, description = "Resource is not available", body = ErrorResponse),
        (status = 404, description = "Resource not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "resources"
)]
pub async fn book_resource(
    State(state): State<AppState>,
    Path(resource_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Notification>), ApiError> {
    let notification = state.service.book(resource_id).await?;
    Ok((StatusCode::CREATED, Json(notification)))
}
