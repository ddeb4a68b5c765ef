// Notification HTTP routes (approval workflow)

use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use schedulink_core::{ApprovalOutcome, Event, Notification, NotificationType, Resource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::common::{ErrorResponse, ListResponse};
use super::error::ApiError;
use crate::services::NotificationService;

/// Query parameters for notification listing
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct ListNotificationsQuery {
    /// Notification type; defaults to `event_approval`
    #[serde(rename = "type")]
    pub kind: Option<NotificationType>,
}

/// Result of approving or declining a notification
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DecisionResponse {
    pub notification: Notification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<Event>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,
    /// Pending events told about a new conflict (approvals only)
    #[serde(default)]
    pub conflicts_notified: usize,
}

impl From<ApprovalOutcome> for DecisionResponse {
    fn from(outcome: ApprovalOutcome) -> Self {
        match outcome {
            ApprovalOutcome::Event {
                notification,
                event,
                conflicts_notified,
            } => Self {
                notification,
                event: Some(event),
                resource: None,
                conflicts_notified,
            },
            ApprovalOutcome::Resource {
                notification,
                resource,
            } => Self {
                notification,
                event: None,
                resource: Some(resource),
                conflicts_notified: 0,
            },
        }
    }
}

// ============================================
// App State and Routes
// ============================================

/// App state for notification routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<NotificationService>,
}

impl AppState {
    pub fn new(service: Arc<NotificationService>) -> Self {
        Self { service }
    }
}

/// Create notification routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/notifications", get(list_notifications))
        .route(
            "/v1/notifications/:notification_id/approve",
            put(approve_notification),
        )
        .route(
            "/v1/notifications/:notification_id/decline",
            put(decline_notification),
        )
        .with_state(state)
}

// ============================================
// HTTP Handlers
// ============================================

/// GET /v1/notifications - List notifications, newest first
#[utoipa::path(
    get,
    path = "/v1/notifications",
    params(ListNotificationsQuery),
    responses(
        (status = 200, description = "List of notifications", body = ListResponse<Notification>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<ListResponse<Notification>>, ApiError> {
    let notifications = state.service.list(query.kind).await?;
    Ok(Json(ListResponse::new(notifications)))
}

/// PUT /v1/notifications/{notification_id}/approve - Approve an event or booking
#[utoipa::path(
    put,
    path = "/v1/notifications/{notification_id}/approve",
    params(
        ("notification_id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Approved", body = DecisionResponse),
        (status = 400, description = "Notification is not actionable", body = ErrorResponse),
        (status = 404, description = "Notification, event or resource not found", body = ErrorResponse),
        (status = 409, description = "Conflicts with an approved event, or already declined", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notifications"
)]
pub async fn approve_notification(
    State(state): State<AppState>,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<DecisionResponse>, ApiError> {
    let outcome = state.service.approve(notification_id).await?;
    Ok(Json(outcome.into()))
}

/// PUT /v1/notifications/{notification_id}/decline - Decline an event or booking
#[utoipa::path(
    put,
    path = "/v1/notifications/{notification_id}/decline",
    params(
        ("notification_id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Declined", body = DecisionResponse),
        (status = 400, description = "Notification is not actionable", body = ErrorResponse),
        (status = 404, description = "Notification or event not found", body = ErrorResponse),
        (status = 409, description = "Already approved", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notifications"
)]
pub async fn decline_notification(
    State(state): State<AppState>,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<DecisionResponse>, ApiError> {
    let outcome = state.service.decline(notification_id).await?;
    Ok(Json(DecisionResponse {
        notification: outcome.notification,
        event: outcome.event,
        resource: None,
        conflicts_notified: 0,
    }))
}
