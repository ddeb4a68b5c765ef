// Core traits for pluggable backends
//
// The workflows only talk to storage through these traits:
// - In-memory implementations for dev mode and tests
// - Postgres implementations in the control plane

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::broadcast::Broadcaster;
use crate::error::Result;
use crate::event::{DateRange, Event, EventStatus};
use crate::notification::{NewNotification, Notification, NotificationStatus, NotificationType};
use crate::venue::{Resource, Venue};

// ============================================================================
// EventStore
// ============================================================================

/// Persistence for events
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Get an event by ID
    async fn get_event(&self, id: Uuid) -> Result<Option<Event>>;

    /// List events, newest start date first
    async fn list_events(&self, status: Option<EventStatus>) -> Result<Vec<Event>>;

    /// Events in `status` whose date range overlaps `range`
    async fn events_overlapping(
        &self,
        status: EventStatus,
        range: DateRange,
        exclude: Option<Uuid>,
    ) -> Result<Vec<Event>>;

    async fn approved_events_overlapping(
        &self,
        range: DateRange,
        exclude: Option<Uuid>,
    ) -> Result<Vec<Event>> {
        self.events_overlapping(EventStatus::Approved, range, exclude)
            .await
    }

    async fn pending_events_overlapping(
        &self,
        range: DateRange,
        exclude: Option<Uuid>,
    ) -> Result<Vec<Event>> {
        self.events_overlapping(EventStatus::Pending, range, exclude)
            .await
    }

    /// Insert a new event
    async fn insert_event(&self, event: Event) -> Result<Event>;

    /// Replace an existing event's fields; `None` if it does not exist
    async fn update_event(&self, event: Event) -> Result<Option<Event>>;

    /// Change an event's status; `None` if it does not exist
    async fn set_event_status(&self, id: Uuid, status: EventStatus) -> Result<Option<Event>>;

    /// Delete an event; returns whether it existed
    async fn delete_event(&self, id: Uuid) -> Result<bool>;
}

// ============================================================================
// VenueRegistry
// ============================================================================

/// Read-only venue lookup
#[async_trait]
pub trait VenueRegistry: Send + Sync {
    async fn get_venue(&self, id: Uuid) -> Result<Option<Venue>>;

    async fn list_venues(&self) -> Result<Vec<Venue>>;

    /// Resolve ids to names; unknown ids are absent from the map
    async fn venue_names(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>> {
        Ok(self
            .list_venues()
            .await?
            .into_iter()
            .filter(|venue| ids.contains(&venue.id))
            .map(|venue| (venue.id, venue.name))
            .collect())
    }
}

// ============================================================================
// NotificationStore
// ============================================================================

/// Persistence for notifications
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Store a notification, assigning its id and creation time
    async fn insert_notification(&self, notification: NewNotification) -> Result<Notification>;

    async fn get_notification(&self, id: Uuid) -> Result<Option<Notification>>;

    /// Change a notification's status; `None` if it does not exist
    async fn set_notification_status(
        &self,
        id: Uuid,
        status: NotificationStatus,
    ) -> Result<Option<Notification>>;

    /// List notifications, newest first
    async fn list_notifications(&self, kind: Option<NotificationType>) -> Result<Vec<Notification>>;

    /// Remove every notification referencing an event; returns how many
    async fn delete_event_notifications(&self, event_id: Uuid) -> Result<u64>;
}

// ============================================================================
// ResourceStore
// ============================================================================

/// Persistence for bookable resources
#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn get_resource(&self, id: Uuid) -> Result<Option<Resource>>;

    /// Flip a resource's availability; `None` if it does not exist
    async fn set_resource_availability(
        &self,
        id: Uuid,
        availability: bool,
    ) -> Result<Option<Resource>>;
}

// ============================================================================
// ScheduleStores
// ============================================================================

/// Every backend the workflows need, bundled for injection
#[derive(Clone)]
pub struct ScheduleStores {
    pub events: Arc<dyn EventStore>,
    pub venues: Arc<dyn VenueRegistry>,
    pub notifications: Arc<dyn NotificationStore>,
    pub resources: Arc<dyn ResourceStore>,
    pub broadcaster: Arc<dyn Broadcaster>,
}
