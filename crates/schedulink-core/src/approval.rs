// Approval workflow
//
// Reviewers act on notifications. Approving an event notification re-runs
// conflict detection against approved events under the schedule lock, then
// commits and fans out `event_conflict` notices to pending events that now
// collide. Approving a booking notification marks the resource unavailable.
//
// Approval is fail-closed (storage errors abort it); the fanout that follows
// a commit is best-effort and only logs its failures.

use serde::Serialize;
use uuid::Uuid;

use crate::broadcast::{BroadcastKind, BroadcastMessage};
use crate::conflict::ConflictDetector;
use crate::error::{Result, SchedulingError};
use crate::event::{format_time, Event, EventStatus};
use crate::lock::ScheduleLock;
use crate::notification::{NewNotification, Notification, NotificationStatus, NotificationType};
use crate::traits::ScheduleStores;
use crate::venue::Resource;

/// Message attached to the `event_approved` notice and broadcast
pub const EVENT_APPROVED_MESSAGE: &str = "New event added! Check the calendar for new events.";

/// Result of approving a notification
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApprovalOutcome {
    Event {
        notification: Notification,
        event: Event,
        /// Pending events told about a new conflict
        conflicts_notified: usize,
    },
    Resource {
        notification: Notification,
        resource: Resource,
    },
}

/// Result of declining a notification
#[derive(Debug, Clone, Serialize)]
pub struct DeclineOutcome {
    pub notification: Notification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<Event>,
}

#[derive(Clone)]
pub struct ApprovalWorkflow {
    stores: ScheduleStores,
    detector: ConflictDetector,
    lock: ScheduleLock,
}

impl ApprovalWorkflow {
    pub fn new(stores: ScheduleStores, lock: ScheduleLock) -> Self {
        let detector = ConflictDetector::new(stores.events.clone(), stores.venues.clone());
        Self {
            stores,
            detector,
            lock,
        }
    }

    /// Approve the event or booking a notification refers to
    pub async fn approve(&self, notification_id: Uuid) -> Result<ApprovalOutcome> {
        let notification = self.load_actionable(notification_id).await?;
        if notification.status == NotificationStatus::Declined {
            return Err(SchedulingError::invalid_transition(
                NotificationStatus::Declined,
                NotificationStatus::Approved,
            ));
        }

        if let Some(event_id) = notification.event_id {
            self.approve_event(notification, event_id).await
        } else if let Some(resource_id) = notification.resource_id {
            self.approve_booking(notification, resource_id).await
        } else {
            Err(SchedulingError::validation(
                "Notification references neither an event nor a resource",
            ))
        }
    }

    /// Decline the event or booking a notification refers to
    pub async fn decline(&self, notification_id: Uuid) -> Result<DeclineOutcome> {
        let notification = self.load_actionable(notification_id).await?;
        let _guard = self.lock.acquire().await;

        let event = match notification.event_id {
            Some(event_id) => Some(self.load_event(event_id).await?),
            None => None,
        };

        if notification.status == NotificationStatus::Approved
            || event.as_ref().map(|e| e.status) == Some(EventStatus::Approved)
        {
            return Err(SchedulingError::invalid_transition(
                EventStatus::Approved,
                EventStatus::Declined,
            ));
        }

        let event = match event {
            Some(event) if event.status == EventStatus::Pending => Some(
                self.stores
                    .events
                    .set_event_status(event.id, EventStatus::Declined)
                    .await?
                    .ok_or_else(|| event_not_found(event.id))?,
            ),
            other => other,
        };

        let notification = if notification.status == NotificationStatus::Declined {
            tracing::debug!(notification_id = %notification.id, "Notification already declined");
            notification
        } else {
            self.stores
                .notifications
                .set_notification_status(notification.id, NotificationStatus::Declined)
                .await?
                .ok_or_else(|| notification_not_found(notification_id))?
        };

        tracing::info!(
            notification_id = %notification.id,
            event_id = ?notification.event_id,
            "Notification declined"
        );
        Ok(DeclineOutcome {
            notification,
            event,
        })
    }

    async fn approve_event(
        &self,
        notification: Notification,
        event_id: Uuid,
    ) -> Result<ApprovalOutcome> {
        let guard = self.lock.acquire().await;
        let event = self.load_event(event_id).await?;

        match event.status {
            EventStatus::Declined => {
                return Err(SchedulingError::invalid_transition(
                    EventStatus::Declined,
                    EventStatus::Approved,
                ))
            }
            EventStatus::Approved => {
                tracing::debug!(event_id = %event.id, "Event already approved");
                let notification = self.mark_approved(notification).await?;
                return Ok(ApprovalOutcome::Event {
                    notification,
                    event,
                    conflicts_notified: 0,
                });
            }
            EventStatus::Pending => {}
        }

        if let Some(conflict) = self
            .detector
            .first_conflict(&event.schedule(), Some(event.id))
            .await?
        {
            tracing::info!(
                event_id = %event.id,
                conflicting_event_id = %conflict.event_id,
                "Approval blocked by conflict"
            );
            return Err(SchedulingError::conflict(conflict));
        }

        // Event first; a notification may only read approved once the event is
        let event = self
            .stores
            .events
            .set_event_status(event.id, EventStatus::Approved)
            .await?
            .ok_or_else(|| event_not_found(event_id))?;
        let notification = match self.mark_approved(notification).await {
            Ok(notification) => notification,
            Err(e) => {
                self.revert_to_pending(event.id).await;
                return Err(e);
            }
        };
        drop(guard);

        tracing::info!(event_id = %event.id, "Event approved");
        self.announce_approval(&event).await;
        let conflicts_notified = self.fan_out(&event).await;

        Ok(ApprovalOutcome::Event {
            notification,
            event,
            conflicts_notified,
        })
    }

    async fn approve_booking(
        &self,
        notification: Notification,
        resource_id: Uuid,
    ) -> Result<ApprovalOutcome> {
        let resource = self
            .stores
            .resources
            .set_resource_availability(resource_id, false)
            .await?
            .ok_or_else(|| SchedulingError::not_found(format!("Resource {resource_id} not found")))?;
        let notification = self.mark_approved(notification).await?;

        tracing::info!(resource_id = %resource.id, "Resource booking approved");
        Ok(ApprovalOutcome::Resource {
            notification,
            resource,
        })
    }

    /// Insert the `event_approved` notice and broadcast it
    async fn announce_approval(&self, event: &Event) {
        let notice = NewNotification::informational(
            NotificationType::EventApproved,
            EVENT_APPROVED_MESSAGE,
            event.id,
        );
        if let Err(e) = self.stores.notifications.insert_notification(notice).await {
            tracing::error!(event_id = %event.id, error = %e, "Failed to record approval notice");
        }
        self.stores.broadcaster.publish(BroadcastMessage::new(
            BroadcastKind::EventApproved,
            EVENT_APPROVED_MESSAGE,
            Some(event.id),
        ));
    }

    /// Tell every pending event that now collides with `approved`
    async fn fan_out(&self, approved: &Event) -> usize {
        let Some(window) = approved.event_window() else {
            return 0;
        };
        let conflicts = match self
            .detector
            .find_conflicts_in(EventStatus::Pending, &approved.schedule(), Some(approved.id))
            .await
        {
            Ok(conflicts) => conflicts,
            Err(e) => {
                tracing::error!(event_id = %approved.id, error = %e, "Conflict fanout failed");
                return 0;
            }
        };

        let mut notified = 0;
        for conflict in conflicts {
            let message = format!(
                "Your pending event \"{}\" conflicts with the recently approved event \"{}\" on {} from {} to {} at {}. Please choose a different date, time, or venue.",
                conflict.event_name,
                approved.name,
                approved.start_date,
                format_time(window.start),
                format_time(window.end),
                conflict.venue_names(),
            );
            let notice = NewNotification::informational(
                NotificationType::EventConflict,
                message,
                conflict.event_id,
            );
            match self.stores.notifications.insert_notification(notice).await {
                Ok(_) => notified += 1,
                Err(e) => {
                    tracing::error!(
                        event_id = %conflict.event_id,
                        error = %e,
                        "Failed to record conflict notice"
                    );
                    continue;
                }
            }
            self.stores.broadcaster.publish(BroadcastMessage::new(
                BroadcastKind::EventConflict,
                format!("Your pending event \"{}\" has a conflict", conflict.event_name),
                Some(conflict.event_id),
            ));
        }

        if notified > 0 {
            tracing::info!(
                event_id = %approved.id,
                notified,
                "Pending events notified of conflict"
            );
        }
        notified
    }

    async fn load_actionable(&self, notification_id: Uuid) -> Result<Notification> {
        let notification = self
            .stores
            .notifications
            .get_notification(notification_id)
            .await?
            .ok_or_else(|| notification_not_found(notification_id))?;
        if !notification.kind.is_actionable() {
            return Err(SchedulingError::validation(format!(
                "{} notifications cannot be approved or declined",
                notification.kind
            )));
        }
        Ok(notification)
    }

    async fn load_event(&self, event_id: Uuid) -> Result<Event> {
        self.stores
            .events
            .get_event(event_id)
            .await?
            .ok_or_else(|| event_not_found(event_id))
    }

    /// Undo an event approval whose notification could not be updated
    async fn revert_to_pending(&self, event_id: Uuid) {
        match self
            .stores
            .events
            .set_event_status(event_id, EventStatus::Pending)
            .await
        {
            Ok(_) => tracing::warn!(%event_id, "Approval rolled back"),
            Err(e) => tracing::error!(%event_id, error = %e, "Failed to roll back approval"),
        }
    }

    async fn mark_approved(&self, notification: Notification) -> Result<Notification> {
        if notification.status == NotificationStatus::Approved {
            return Ok(notification);
        }
        self.stores
            .notifications
            .set_notification_status(notification.id, NotificationStatus::Approved)
            .await?
            .ok_or_else(|| notification_not_found(notification.id))
    }
}

fn event_not_found(id: Uuid) -> SchedulingError {
    SchedulingError::not_found(format!("Event {id} not found"))
}

fn notification_not_found(id: Uuid) -> SchedulingError {
    SchedulingError::not_found(format!("Notification {id} not found"))
}
