// Event HTTP routes
//
// Submission and update are rejected with 409 and the full conflict list
// when they collide with approved events.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, NaiveTime};
use schedulink_core::event::hhmm;
use schedulink_core::{Conflict, Event, EventStatus, NewEvent, ScheduleCandidate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::common::{ErrorResponse, ListResponse};
use super::error::ApiError;
use super::validation::{validate_candidate_input, validate_event_input};
use crate::services::EventService;

/// Query parameters for event listing
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct ListEventsQuery {
    /// Only return events in this status
    pub status: Option<EventStatus>,
}

/// Request for an advisory conflict check
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CheckConflictsRequest {
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub venue_ids: Vec<Uuid>,
    #[serde(default, with = "hhmm::option")]
    #[schema(value_type = Option<String>, example = "10:00")]
    pub event_start_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm::option")]
    #[schema(value_type = Option<String>, example = "11:00")]
    pub event_end_time: Option<NaiveTime>,
    /// Event to ignore, typically the one being edited
    #[serde(default)]
    pub exclude_event_id: Option<Uuid>,
}

impl CheckConflictsRequest {
    fn candidate(&self) -> ScheduleCandidate {
        ScheduleCandidate {
            start_date: self.start_date,
            end_date: self.end_date,
            venue_ids: self.venue_ids.clone(),
            event_start_time: self.event_start_time,
            event_end_time: self.event_end_time,
        }
    }
}

/// Result of an advisory conflict check
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckConflictsResponse {
    pub has_conflicts: bool,
    pub conflicts: Vec<Conflict>,
}

// ============================================
// App State and Routes
// ============================================

/// App state for events routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EventService>,
}

impl AppState {
    pub fn new(service: Arc<EventService>) -> Self {
        Self { service }
    }
}

/// Create event routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/events", post(create_event).get(list_events))
        .route("/v1/events/check-conflicts", post(check_conflicts))
        .route(
            "/v1/events/:event_id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .with_state(state)
}

// ============================================
// HTTP Handlers
// ============================================

/// POST /v1/events - Submit an event for approval
#[utoipa::path(
    post,
    path = "/v1/events",
    request_body = NewEvent,
    responses(
        (status = 201, description = "Event submitted, pending approval", body = Event),
        (status = 400, description = "Invalid event", body = ErrorResponse),
        (status = 409, description = "Conflicts with approved events", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<NewEvent>, JsonRejection>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let Json(input) = payload?;
    validate_event_input(&input)?;

    let event = state.service.create(input).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /v1/events - List events, newest start date first
#[utoipa::path(
    get,
    path = "/v1/events",
    params(ListEventsQuery),
    responses(
        (status = 200, description = "List of events", body = ListResponse<Event>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<ListResponse<Event>>, ApiError> {
    let events = state.service.list(query.status).await?;
    Ok(Json(ListResponse::new(events)))
}

/// GET /v1/events/{event_id} - Get event by ID
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
    let event = state.service.get(event_id).await?;
    Ok(Json(event))
}

/// PUT /v1/events/{event_id} - Replace event details
#[utoipa::path(
    put,
    path = "/v1/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    request_body = NewEvent,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 400, description = "Invalid event", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 409, description = "Conflicts with approved events", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    payload: Result<Json<NewEvent>, JsonRejection>,
) -> Result<Json<Event>, ApiError> {
    let Json(input) = payload?;
    validate_event_input(&input)?;

    let event = state.service.update(event_id, input).await?;
    Ok(Json(event))
}

/// DELETE /v1/events/{event_id} - Delete an event and its notifications
#[utoipa::path(
    delete,
    path = "/v1/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.service.delete(event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/events/check-conflicts - Advisory conflict check
#[utoipa::path(
    post,
    path = "/v1/events/check-conflicts",
    request_body = CheckConflictsRequest,
    responses(
        (status = 200, description = "Conflicts with approved events, if any", body = CheckConflictsResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn check_conflicts(
    State(state): State<AppState>,
    payload: Result<Json<CheckConflictsRequest>, JsonRejection>,
) -> Result<Json<CheckConflictsResponse>, ApiError> {
    let Json(req) = payload?;
    let candidate = req.candidate();
    validate_candidate_input(&candidate)?;

    let conflicts = state
        .service
        .check_conflicts(&candidate, req.exclude_event_id)
        .await?;
    Ok(Json(CheckConflictsResponse {
        has_conflicts: !conflicts.is_empty(),
        conflicts,
    }))
}
