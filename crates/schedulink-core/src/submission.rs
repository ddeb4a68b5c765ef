// Event submission
//
// Create and update are gated on conflicts with approved events. The gate
// fails open: if the detector can't read storage the write proceeds with a
// warning, since approval re-checks under the schedule lock anyway.

use chrono::Utc;
use uuid::Uuid;

use crate::conflict::{Conflict, ConflictDetector, ScheduleCandidate};
use crate::error::{Result, SchedulingError};
use crate::event::{Event, EventStatus, NewEvent};
use crate::lock::ScheduleLock;
use crate::notification::NewNotification;
use crate::traits::ScheduleStores;

#[derive(Clone)]
pub struct EventSubmission {
    stores: ScheduleStores,
    detector: ConflictDetector,
    lock: ScheduleLock,
}

impl EventSubmission {
    pub fn new(stores: ScheduleStores, lock: ScheduleLock) -> Self {
        let detector = ConflictDetector::new(stores.events.clone(), stores.venues.clone());
        Self {
            stores,
            detector,
            lock,
        }
    }

    /// Submit a new event for approval
    pub async fn create(&self, input: NewEvent) -> Result<Event> {
        input.validate()?;
        self.gate(&input.schedule(), None).await?;

        let event = Event::pending(Uuid::now_v7(), input, Utc::now());
        let event = self.stores.events.insert_event(event).await?;
        self.stores
            .notifications
            .insert_notification(NewNotification::event_approval(event.id, &event.name))
            .await?;

        tracing::info!(event_id = %event.id, name = %event.name, "Event submitted");
        Ok(event)
    }

    /// Replace an event's details; its status is left untouched
    pub async fn update(&self, id: Uuid, input: NewEvent) -> Result<Event> {
        input.validate()?;
        let _guard = self.lock.acquire().await;

        let mut event = self.get(id).await?;
        self.gate(&input.schedule(), Some(id)).await?;

        event.apply(input, Utc::now());
        let event = self
            .stores
            .events
            .update_event(event)
            .await?
            .ok_or_else(|| event_not_found(id))?;

        tracing::info!(event_id = %event.id, "Event updated");
        Ok(event)
    }

    /// Dry-run conflict check; nothing is persisted
    pub async fn check(
        &self,
        candidate: &ScheduleCandidate,
        exclude_event_id: Option<Uuid>,
    ) -> Result<Vec<Conflict>> {
        candidate.validate()?;
        match self.detector.find_conflicts(candidate, exclude_event_id).await {
            Ok(conflicts) => Ok(conflicts),
            Err(e) => {
                tracing::warn!(error = %e, "Conflict check unavailable, reporting no conflicts");
                Ok(Vec::new())
            }
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Event> {
        self.stores
            .events
            .get_event(id)
            .await?
            .ok_or_else(|| event_not_found(id))
    }

    pub async fn list(&self, status: Option<EventStatus>) -> Result<Vec<Event>> {
        self.stores.events.list_events(status).await
    }

    /// Delete an event together with its notifications
    ///
    /// The event goes first. Notifications are swept even when the event is
    /// already gone, so a retry clears anything a failed sweep left behind.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let _guard = self.lock.acquire().await;
        let existed = self.stores.events.delete_event(id).await?;
        let removed = self.stores.notifications.delete_event_notifications(id).await?;
        if !existed {
            return Err(event_not_found(id));
        }
        tracing::info!(event_id = %id, notifications = removed, "Event deleted");
        Ok(())
    }

    async fn gate(&self, candidate: &ScheduleCandidate, exclude: Option<Uuid>) -> Result<()> {
        match self.detector.find_conflicts(candidate, exclude).await {
            Ok(conflicts) if conflicts.is_empty() => Ok(()),
            Ok(conflicts) => Err(SchedulingError::Conflicts(conflicts)),
            Err(e) => {
                tracing::warn!(error = %e, "Conflict detection failed, accepting submission");
                Ok(())
            }
        }
    }
}

fn event_not_found(id: Uuid) -> SchedulingError {
    SchedulingError::not_found(format!("Event {id} not found"))
}
