// Notification service for the approval workflow

use schedulink_core::{
    ApprovalOutcome, ApprovalWorkflow, DeclineOutcome, Notification, NotificationStore,
    NotificationType, Result, ScheduleLock, ScheduleStores,
};
use std::sync::Arc;
use uuid::Uuid;

pub struct NotificationService {
    workflow: ApprovalWorkflow,
    notifications: Arc<dyn NotificationStore>,
}

impl NotificationService {
    pub fn new(stores: ScheduleStores, lock: ScheduleLock) -> Self {
        Self {
            notifications: stores.notifications.clone(),
            workflow: ApprovalWorkflow::new(stores, lock),
        }
    }

    /// List notifications of one type; approval requests when unspecified
    pub async fn list(&self, kind: Option<NotificationType>) -> Result<Vec<Notification>> {
        self.notifications
            .list_notifications(Some(kind.unwrap_or(NotificationType::EventApproval)))
            .await
    }

    pub async fn approve(&self, id: Uuid) -> Result<ApprovalOutcome> {
        self.workflow.approve(id).await
    }

    pub async fn decline(&self, id: Uuid) -> Result<DeclineOutcome> {
        self.workflow.decline(id).await
    }
}
