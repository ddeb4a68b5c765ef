// Database-backed EventStore implementation
//
// Event rows and their venue ids are loaded separately and stitched
// together here, so callers only ever see complete core::Event values.

use async_trait::async_trait;
use schedulink_core::{DateRange, Event, EventStatus, EventStore, Result, SchedulingError};
use std::collections::HashMap;
use uuid::Uuid;

use super::models::EventRow;
use super::repositories::Database;

// ============================================================================
// DbEventStore - Persists events in PostgreSQL
// ============================================================================

#[derive(Clone)]
pub struct DbEventStore {
    db: Database,
}

impl DbEventStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Attach venue ids to rows, preserving row order
    async fn hydrate(&self, rows: Vec<EventRow>) -> Result<Vec<Event>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut venues: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for link in self
            .db
            .list_event_venues(&ids)
            .await
            .map_err(|e| SchedulingError::storage(e.to_string()))?
        {
            venues.entry(link.event_id).or_default().push(link.venue_id);
        }

        rows.into_iter()
            .map(|row| {
                let venue_ids = venues.remove(&row.id).unwrap_or_default();
                row.into_event(venue_ids)
            })
            .collect()
    }

    async fn hydrate_one(&self, row: Option<EventRow>) -> Result<Option<Event>> {
        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.into_iter().next()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl EventStore for DbEventStore {
    async fn get_event(&self, id: Uuid) -> Result<Option<Event>> {
        let row = self
            .db
            .get_event(id)
            .await
            .map_err(|e| SchedulingError::storage(e.to_string()))?;
        self.hydrate_one(row).await
    }

    async fn list_events(&self, status: Option<EventStatus>) -> Result<Vec<Event>> {
        let rows = self
            .db
            .list_events(status.as_ref().map(EventStatus::as_str))
            .await
            .map_err(|e| SchedulingError::storage(e.to_string()))?;
        self.hydrate(rows).await
    }

    async fn events_overlapping(
        &self,
        status: EventStatus,
        range: DateRange,
        exclude: Option<Uuid>,
    ) -> Result<Vec<Event>> {
        let rows = self
            .db
            .list_events_overlapping(status.as_str(), range.start, range.end, exclude)
            .await
            .map_err(|e| SchedulingError::storage(e.to_string()))?;
        self.hydrate(rows).await
    }

    async fn insert_event(&self, event: Event) -> Result<Event> {
        let row = self
            .db
            .create_event(&event)
            .await
            .map_err(|e| SchedulingError::storage(e.to_string()))?;
        row.into_event(event.venue_ids)
    }

    async fn update_event(&self, event: Event) -> Result<Option<Event>> {
        let row = self
            .db
            .update_event(&event)
            .await
            .map_err(|e| SchedulingError::storage(e.to_string()))?;
        row.map(|row| row.into_event(event.venue_ids)).transpose()
    }

    async fn set_event_status(&self, id: Uuid, status: EventStatus) -> Result<Option<Event>> {
        let row = self
            .db
            .update_event_status(id, status.as_str())
            .await
            .map_err(|e| SchedulingError::storage(e.to_string()))?;
        self.hydrate_one(row).await
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool> {
        self.db
            .delete_event(id)
            .await
            .map_err(|e| SchedulingError::storage(e.to_string()))
    }
}

// ============================================================================
// Factory functions
// ============================================================================

/// Create a database-backed event store
pub fn create_db_event_store(db: Database) -> DbEventStore {
    DbEventStore::new(db)
}
