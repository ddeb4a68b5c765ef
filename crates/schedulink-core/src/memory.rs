// In-memory implementations for dev mode and testing
//
// These keep all data in process memory, which makes them useful for:
// - Running the server without a database
// - Unit and integration tests of the workflows

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::broadcast::{BroadcastMessage, Broadcaster};
use crate::error::Result;
use crate::event::{DateRange, Event, EventStatus};
use crate::notification::{NewNotification, Notification, NotificationStatus, NotificationType};
use crate::traits::{EventStore, NotificationStore, ResourceStore, ScheduleStores, VenueRegistry};
use crate::venue::{Resource, Venue};

// ============================================================================
// InMemoryEventStore
// ============================================================================

#[derive(Debug, Default, Clone)]
pub struct InMemoryEventStore {
    events: Arc<RwLock<HashMap<Uuid, Event>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with an event as-is (status included)
    pub async fn seed(&self, event: Event) {
        self.events.write().await.insert(event.id, event);
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn get_event(&self, id: Uuid) -> Result<Option<Event>> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn list_events(&self, status: Option<EventStatus>) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self
            .events
            .read()
            .await
            .values()
            .filter(|event| status.map_or(true, |status| event.status == status))
            .cloned()
            .collect();
        events.sort_by(|a, b| {
            b.start_date
                .cmp(&a.start_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(events)
    }

    async fn events_overlapping(
        &self,
        status: EventStatus,
        range: DateRange,
        exclude: Option<Uuid>,
    ) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self
            .events
            .read()
            .await
            .values()
            .filter(|event| event.status == status)
            .filter(|event| Some(event.id) != exclude)
            .filter(|event| event.date_range().overlaps(&range))
            .cloned()
            .collect();
        events.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id)));
        Ok(events)
    }

    async fn insert_event(&self, event: Event) -> Result<Event> {
        self.events.write().await.insert(event.id, event.clone());
        Ok(event)
    }

    async fn update_event(&self, event: Event) -> Result<Option<Event>> {
        let mut events = self.events.write().await;
        match events.get_mut(&event.id) {
            Some(existing) => {
                *existing = event.clone();
                Ok(Some(event))
            }
            None => Ok(None),
        }
    }

    async fn set_event_status(&self, id: Uuid, status: EventStatus) -> Result<Option<Event>> {
        let mut events = self.events.write().await;
        Ok(events.get_mut(&id).map(|event| {
            event.status = status;
            event.updated_at = Utc::now();
            event.clone()
        }))
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool> {
        Ok(self.events.write().await.remove(&id).is_some())
    }
}

// ============================================================================
// InMemoryVenueRegistry
// ============================================================================

#[derive(Debug, Default, Clone)]
pub struct InMemoryVenueRegistry {
    venues: Arc<RwLock<HashMap<Uuid, Venue>>>,
}

impl InMemoryVenueRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, venue: Venue) -> Venue {
        self.venues.write().await.insert(venue.id, venue.clone());
        venue
    }
}

#[async_trait]
impl VenueRegistry for InMemoryVenueRegistry {
    async fn get_venue(&self, id: Uuid) -> Result<Option<Venue>> {
        Ok(self.venues.read().await.get(&id).cloned())
    }

    async fn list_venues(&self) -> Result<Vec<Venue>> {
        let mut venues: Vec<Venue> = self.venues.read().await.values().cloned().collect();
        venues.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(venues)
    }

    async fn venue_names(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>> {
        let venues = self.venues.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| venues.get(id).map(|venue| (*id, venue.name.clone())))
            .collect())
    }
}

// ============================================================================
// InMemoryNotificationStore
// ============================================================================

#[derive(Debug, Default, Clone)]
pub struct InMemoryNotificationStore {
    notifications: Arc<RwLock<HashMap<Uuid, Notification>>>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications referencing an event, oldest first
    pub async fn for_event(&self, event_id: Uuid) -> Vec<Notification> {
        let mut found: Vec<Notification> = self
            .notifications
            .read()
            .await
            .values()
            .filter(|n| n.event_id == Some(event_id))
            .cloned()
            .collect();
        found.sort_by_key(|n| (n.created_at, n.id));
        found
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn insert_notification(&self, notification: NewNotification) -> Result<Notification> {
        let notification = notification.into_notification(Uuid::now_v7(), Utc::now());
        self.notifications
            .write()
            .await
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn get_notification(&self, id: Uuid) -> Result<Option<Notification>> {
        Ok(self.notifications.read().await.get(&id).cloned())
    }

    async fn set_notification_status(
        &self,
        id: Uuid,
        status: NotificationStatus,
    ) -> Result<Option<Notification>> {
        let mut notifications = self.notifications.write().await;
        Ok(notifications.get_mut(&id).map(|notification| {
            notification.status = status;
            notification.clone()
        }))
    }

    async fn list_notifications(&self, kind: Option<NotificationType>) -> Result<Vec<Notification>> {
        let mut notifications: Vec<Notification> = self
            .notifications
            .read()
            .await
            .values()
            .filter(|n| kind.map_or(true, |kind| n.kind == kind))
            .cloned()
            .collect();
        notifications.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(notifications)
    }

    async fn delete_event_notifications(&self, event_id: Uuid) -> Result<u64> {
        let mut notifications = self.notifications.write().await;
        let before = notifications.len();
        notifications.retain(|_, n| n.event_id != Some(event_id));
        Ok((before - notifications.len()) as u64)
    }
}

// ============================================================================
// InMemoryResourceStore
// ============================================================================

#[derive(Debug, Default, Clone)]
pub struct InMemoryResourceStore {
    resources: Arc<RwLock<HashMap<Uuid, Resource>>>,
}

impl InMemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, resource: Resource) -> Resource {
        self.resources
            .write()
            .await
            .insert(resource.id, resource.clone());
        resource
    }
}

#[async_trait]
impl ResourceStore for InMemoryResourceStore {
    async fn get_resource(&self, id: Uuid) -> Result<Option<Resource>> {
        Ok(self.resources.read().await.get(&id).cloned())
    }

    async fn set_resource_availability(
        &self,
        id: Uuid,
        availability: bool,
    ) -> Result<Option<Resource>> {
        let mut resources = self.resources.write().await;
        Ok(resources.get_mut(&id).map(|resource| {
            resource.availability = availability;
            resource.clone()
        }))
    }
}

// ============================================================================
// RecordingBroadcaster
// ============================================================================

/// Broadcaster that keeps every published message, for assertions
#[derive(Debug, Default, Clone)]
pub struct RecordingBroadcaster {
    messages: Arc<Mutex<Vec<BroadcastMessage>>>,
}

impl RecordingBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<BroadcastMessage> {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Broadcaster for RecordingBroadcaster {
    fn publish(&self, message: BroadcastMessage) {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message);
    }
}

// ============================================================================
// InMemoryBackend
// ============================================================================

/// All in-memory stores together, keeping typed handles for seeding
#[derive(Debug, Default, Clone)]
pub struct InMemoryBackend {
    pub events: InMemoryEventStore,
    pub venues: InMemoryVenueRegistry,
    pub notifications: InMemoryNotificationStore,
    pub resources: InMemoryResourceStore,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stores(&self, broadcaster: Arc<dyn Broadcaster>) -> ScheduleStores {
        ScheduleStores {
            events: Arc::new(self.events.clone()),
            venues: Arc::new(self.venues.clone()),
            notifications: Arc::new(self.notifications.clone()),
            resources: Arc::new(self.resources.clone()),
            broadcaster,
        }
    }

    /// Register venues by name, returning them in the given order
    pub async fn seed_venues<I, S>(&self, names: I) -> Vec<Venue>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut venues = Vec::new();
        for name in names {
            venues.push(self.venues.add(Venue::new(name)).await);
        }
        venues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::NewEvent;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    async fn seed(store: &InMemoryEventStore, name: &str, start: &str, status: EventStatus) -> Event {
        let mut event = Event::pending(Uuid::now_v7(), NewEvent::new(name, date(start)), Utc::now());
        event.status = status;
        store.seed(event.clone()).await;
        event
    }

    #[tokio::test]
    async fn test_events_overlapping_filters_status_range_and_exclude() {
        let store = InMemoryEventStore::new();
        let inside = seed(&store, "Inside", "2024-01-11", EventStatus::Approved).await;
        let excluded = seed(&store, "Excluded", "2024-01-11", EventStatus::Approved).await;
        seed(&store, "Pending", "2024-01-11", EventStatus::Pending).await;
        seed(&store, "Later", "2024-01-20", EventStatus::Approved).await;

        let found = store
            .approved_events_overlapping(
                DateRange::new(date("2024-01-10"), Some(date("2024-01-12"))),
                Some(excluded.id),
            )
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, inside.id);
    }

    #[tokio::test]
    async fn test_list_events_newest_start_first() {
        let store = InMemoryEventStore::new();
        seed(&store, "First", "2024-01-01", EventStatus::Pending).await;
        seed(&store, "Third", "2024-03-01", EventStatus::Approved).await;
        seed(&store, "Second", "2024-02-01", EventStatus::Pending).await;

        let names: Vec<String> = store
            .list_events(None)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Third", "Second", "First"]);

        let pending = store.list_events(Some(EventStatus::Pending)).await.unwrap();
        assert_eq!(pending.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_event_notifications_only_touches_that_event() {
        let store = InMemoryNotificationStore::new();
        let kept_event = Uuid::now_v7();
        let removed_event = Uuid::now_v7();
        store
            .insert_notification(NewNotification::event_approval(kept_event, "Keep"))
            .await
            .unwrap();
        store
            .insert_notification(NewNotification::event_approval(removed_event, "Drop"))
            .await
            .unwrap();

        assert_eq!(store.delete_event_notifications(removed_event).await.unwrap(), 1);
        assert_eq!(store.list_notifications(None).await.unwrap().len(), 1);
        assert_eq!(store.for_event(kept_event).await.len(), 1);
    }

    #[tokio::test]
    async fn test_venue_names_skip_unknown_ids() {
        let backend = InMemoryBackend::new();
        let venues = backend.seed_venues(["Main Hall", "Gym"]).await;
        let unknown = Uuid::now_v7();

        let names = backend
            .venues
            .venue_names(&[venues[0].id, unknown])
            .await
            .unwrap();

        assert_eq!(names.len(), 1);
        assert_eq!(names[&venues[0].id], "Main Hall");
    }
}
