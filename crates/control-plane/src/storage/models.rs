// Database models (internal, may differ from public DTOs)

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use schedulink_core::{
    Event, EventStatus, NewNotification, Notification, NotificationStatus, NotificationType,
    Resource, SchedulingError, Venue,
};
use sqlx::FromRow;
use uuid::Uuid;

// ============================================
// Events
// ============================================

/// Event row without its venues (those live in `event_venues`)
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub setup_start_time: Option<NaiveTime>,
    pub setup_end_time: Option<NaiveTime>,
    pub event_start_time: Option<NaiveTime>,
    pub event_end_time: Option<NaiveTime>,
    pub cleanup_start_time: Option<NaiveTime>,
    pub cleanup_end_time: Option<NaiveTime>,
    pub behalf_of: Option<String>,
    pub contact_info: Option<String>,
    pub nature_of_event: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventRow {
    pub fn into_event(self, venue_ids: Vec<Uuid>) -> Result<Event, SchedulingError> {
        Ok(Event {
            id: self.id,
            name: self.name,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            venue_ids,
            setup_start_time: self.setup_start_time,
            setup_end_time: self.setup_end_time,
            event_start_time: self.event_start_time,
            event_end_time: self.event_end_time,
            cleanup_start_time: self.cleanup_start_time,
            cleanup_end_time: self.cleanup_end_time,
            behalf_of: self.behalf_of,
            contact_info: self.contact_info,
            nature_of_event: self.nature_of_event,
            status: self.status.parse::<EventStatus>()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct EventVenueRow {
    pub event_id: Uuid,
    pub venue_id: Uuid,
}

// ============================================
// Venues and resources
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct VenueRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub availability: bool,
}

impl From<VenueRow> for Venue {
    fn from(row: VenueRow) -> Self {
        Venue {
            id: row.id,
            name: row.name,
            description: row.description,
            category: row.category,
            availability: row.availability,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ResourceRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub availability: bool,
}

impl From<ResourceRow> for Resource {
    fn from(row: ResourceRow) -> Self {
        Resource {
            id: row.id,
            name: row.name,
            description: row.description,
            category: row.category,
            availability: row.availability,
        }
    }
}

// ============================================
// Notifications
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct NotificationRow {
    pub id: Uuid,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub message: String,
    pub event_id: Option<Uuid>,
    pub resource_id: Option<Uuid>,
    pub booking_id: Option<Uuid>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = SchedulingError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        Ok(Notification {
            id: row.id,
            kind: row.kind.parse::<NotificationType>()?,
            message: row.message,
            event_id: row.event_id,
            resource_id: row.resource_id,
            booking_id: row.booking_id,
            status: row.status.parse::<NotificationStatus>()?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CreateNotificationRow {
    pub id: Uuid,
    pub kind: String,
    pub message: String,
    pub event_id: Option<Uuid>,
    pub resource_id: Option<Uuid>,
    pub booking_id: Option<Uuid>,
    pub status: String,
}

impl CreateNotificationRow {
    pub fn new(id: Uuid, input: NewNotification) -> Self {
        Self {
            id,
            kind: input.kind.as_str().to_string(),
            message: input.message,
            event_id: input.event_id,
            resource_id: input.resource_id,
            booking_id: input.booking_id,
            status: input.status.as_str().to_string(),
        }
    }
}
