// Database-backed NotificationStore implementation

use async_trait::async_trait;
use schedulink_core::{
    NewNotification, Notification, NotificationStatus, NotificationStore, NotificationType, Result,
    SchedulingError,
};
use uuid::Uuid;

use super::models::CreateNotificationRow;
use super::repositories::Database;

#[derive(Clone)]
pub struct DbNotificationStore {
    db: Database,
}

impl DbNotificationStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationStore for DbNotificationStore {
    async fn insert_notification(&self, notification: NewNotification) -> Result<Notification> {
        let row = self
            .db
            .create_notification(CreateNotificationRow::new(Uuid::now_v7(), notification))
            .await
            .map_err(|e| SchedulingError::storage(e.to_string()))?;
        Notification::try_from(row)
    }

    async fn get_notification(&self, id: Uuid) -> Result<Option<Notification>> {
        let row = self
            .db
            .get_notification(id)
            .await
            .map_err(|e| SchedulingError::storage(e.to_string()))?;
        row.map(Notification::try_from).transpose()
    }

    async fn set_notification_status(
        &self,
        id: Uuid,
        status: NotificationStatus,
    ) -> Result<Option<Notification>> {
        let row = self
            .db
            .update_notification_status(id, status.as_str())
            .await
            .map_err(|e| SchedulingError::storage(e.to_string()))?;
        row.map(Notification::try_from).transpose()
    }

    async fn list_notifications(&self, kind: Option<NotificationType>) -> Result<Vec<Notification>> {
        let rows = self
            .db
            .list_notifications(kind.as_ref().map(NotificationType::as_str))
            .await
            .map_err(|e| SchedulingError::storage(e.to_string()))?;
        rows.into_iter().map(Notification::try_from).collect()
    }

    async fn delete_event_notifications(&self, event_id: Uuid) -> Result<u64> {
        self.db
            .delete_event_notifications(event_id)
            .await
            .map_err(|e| SchedulingError::storage(e.to_string()))
    }
}

/// Create a database-backed notification store
pub fn create_db_notification_store(db: Database) -> DbNotificationStore {
    DbNotificationStore::new(db)
}
