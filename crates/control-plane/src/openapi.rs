// OpenAPI specification generation
//
// Shared by the API server (Swagger UI) and the export-openapi binary.

use crate::api;
use crate::api::{ErrorResponse, ListResponse};
use schedulink_core::{
    BroadcastKind, BroadcastMessage, Conflict, Event, EventStatus, NewEvent, Notification,
    NotificationStatus, NotificationType, Resource, Venue, VenueRef,
};
use utoipa::OpenApi;

/// OpenAPI documentation for the Schedulink API
#[derive(OpenApi)]
#[openapi(
    paths(
        api::events::create_event,
        api::events::list_events,
        api::events::get_event,
        api::events::update_event,
        api::events::delete_event,
        api::events::check_conflicts,
        api::notifications::list_notifications,
        api::notifications::approve_notification,
        api::notifications::decline_notification,
        api::venues::list_venues,
        api::venues::get_venue,
        api::resources::book_resource,
        api::sse::stream_sse,
    ),
    components(
        schemas(
            Event, EventStatus, NewEvent,
            Conflict, VenueRef,
            Notification, NotificationType, NotificationStatus,
            Venue, Resource,
            BroadcastMessage, BroadcastKind,
            ErrorResponse,
            api::events::CheckConflictsRequest,
            api::events::CheckConflictsResponse,
            api::notifications::DecisionResponse,
            ListResponse<Event>,
            ListResponse<Notification>,
            ListResponse<Venue>,
        )
    ),
    tags(
        (name = "events", description = "Event submission and conflict checks"),
        (name = "notifications", description = "Approval workflow and live updates (SSE)"),
        (name = "venues", description = "Venue lookup endpoints"),
        (name = "resources", description = "Resource booking endpoints")
    ),
    info(
        title = "Schedulink API",
        version = "0.2.0",
        description = "API for scheduling events across venues with conflict detection and approval",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI document as a pretty-printed JSON string
    pub fn to_json() -> Result<String, serde_json::Error> {
        Self::openapi().to_pretty_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for path in [
            "/v1/events",
            "/v1/events/{event_id}",
            "/v1/events/check-conflicts",
            "/v1/notifications",
            "/v1/notifications/{notification_id}/approve",
            "/v1/notifications/{notification_id}/decline",
            "/v1/venues",
            "/v1/venues/{venue_id}",
            "/v1/resources/{resource_id}/book",
            "/v1/sse",
        ] {
            assert!(paths.contains(&path), "missing {path}");
        }
    }

    #[test]
    fn test_to_json() {
        let json = ApiDoc::to_json().unwrap();
        assert!(json.contains("Schedulink API"));
    }
}
