// Event service for business logic
//
// Submission, update and the advisory check all go through the core
// EventSubmission, which shares the schedule lock with approvals.

use schedulink_core::{
    Conflict, Event, EventStatus, EventSubmission, NewEvent, Result, ScheduleCandidate,
    ScheduleLock, ScheduleStores,
};
use uuid::Uuid;

pub struct EventService {
    submission: EventSubmission,
}

impl EventService {
    pub fn new(stores: ScheduleStores, lock: ScheduleLock) -> Self {
        Self {
            submission: EventSubmission::new(stores, lock),
        }
    }

    pub async fn create(&self, input: NewEvent) -> Result<Event> {
        self.submission.create(input).await
    }

    pub async fn update(&self, id: Uuid, input: NewEvent) -> Result<Event> {
        self.submission.update(id, input).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Event> {
        self.submission.get(id).await
    }

    pub async fn list(&self, status: Option<EventStatus>) -> Result<Vec<Event>> {
        self.submission.list(status).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.submission.delete(id).await
    }

    /// Advisory conflict check; never persists anything
    pub async fn check_conflicts(
        &self,
        candidate: &ScheduleCandidate,
        exclude_event_id: Option<Uuid>,
    ) -> Result<Vec<Conflict>> {
        self.submission.check(candidate, exclude_event_id).await
    }
}
