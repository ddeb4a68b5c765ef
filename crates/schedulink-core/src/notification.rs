// Notification domain types
//
// Actionable notifications (event approval, resource booking) drive the
// approval workflow. Informational ones (event approved, event conflict)
// are spawned by the workflow and never approved or declined.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::error::{Result, SchedulingError};

/// Notification type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    EventApproval,
    EventApproved,
    EventConflict,
    ResourceBooking,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::EventApproval => "event_approval",
            NotificationType::EventApproved => "event_approved",
            NotificationType::EventConflict => "event_conflict",
            NotificationType::ResourceBooking => "resource_booking",
        }
    }

    /// Whether a reviewer can approve or decline this notification
    pub fn is_actionable(&self) -> bool {
        matches!(
            self,
            NotificationType::EventApproval | NotificationType::ResourceBooking
        )
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NotificationType {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "event_approval" => Ok(NotificationType::EventApproval),
            "event_approved" => Ok(NotificationType::EventApproved),
            "event_conflict" => Ok(NotificationType::EventConflict),
            "resource_booking" => Ok(NotificationType::ResourceBooking),
            other => Err(SchedulingError::validation(format!(
                "unknown notification type '{other}'"
            ))),
        }
    }
}

/// Notification status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Pending,
    Approved,
    Declined,
    Unread,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Pending => "pending",
            NotificationStatus::Approved => "approved",
            NotificationStatus::Declined => "declined",
            NotificationStatus::Unread => "unread",
        }
    }
}

impl std::fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NotificationStatus {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(NotificationStatus::Pending),
            "approved" => Ok(NotificationStatus::Approved),
            "declined" => Ok(NotificationStatus::Declined),
            "unread" => Ok(NotificationStatus::Unread),
            other => Err(SchedulingError::validation(format!(
                "unknown notification status '{other}'"
            ))),
        }
    }
}

/// A durable notification record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Notification {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<Uuid>,
    pub status: NotificationStatus,
    pub created_at: DateTime<Utc>,
}

/// Input for filing a notification
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub kind: NotificationType,
    pub message: String,
    pub event_id: Option<Uuid>,
    pub resource_id: Option<Uuid>,
    pub booking_id: Option<Uuid>,
    pub status: NotificationStatus,
}

impl NewNotification {
    /// Approval request for a freshly submitted event
    pub fn event_approval(event_id: Uuid, event_name: &str) -> Self {
        Self {
            kind: NotificationType::EventApproval,
            message: format!("New event \"{event_name}\" requires approval"),
            event_id: Some(event_id),
            resource_id: None,
            booking_id: None,
            status: NotificationStatus::Pending,
        }
    }

    /// Booking request for a resource
    pub fn resource_booking(resource_id: Uuid, resource_name: &str) -> Self {
        Self {
            kind: NotificationType::ResourceBooking,
            message: format!("Resource \"{resource_name}\" booking request"),
            event_id: None,
            resource_id: Some(resource_id),
            booking_id: Some(resource_id),
            status: NotificationStatus::Pending,
        }
    }

    /// Unread informational notice about an event
    pub fn informational(kind: NotificationType, message: impl Into<String>, event_id: Uuid) -> Self {
        Self {
            kind,
            message: message.into(),
            event_id: Some(event_id),
            resource_id: None,
            booking_id: None,
            status: NotificationStatus::Unread,
        }
    }

    pub fn into_notification(self, id: Uuid, created_at: DateTime<Utc>) -> Notification {
        Notification {
            id,
            kind: self.kind,
            message: self.message,
            event_id: self.event_id,
            resource_id: self.resource_id,
            booking_id: self.booking_id,
            status: self.status,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_requests_are_actionable() {
        assert!(NotificationType::EventApproval.is_actionable());
        assert!(NotificationType::ResourceBooking.is_actionable());
        assert!(!NotificationType::EventApproved.is_actionable());
        assert!(!NotificationType::EventConflict.is_actionable());
    }

    #[test]
    fn test_notification_serializes_type_field() {
        let event_id = Uuid::now_v7();
        let notification = NewNotification::event_approval(event_id, "Science Fair")
            .into_notification(Uuid::now_v7(), Utc::now());

        let json = serde_json::to_value(&notification).unwrap();

        assert_eq!(json["type"], "event_approval");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["message"], "New event \"Science Fair\" requires approval");
        assert_eq!(json["event_id"], event_id.to_string());
        assert!(json.get("resource_id").is_none());
    }

    #[test]
    fn test_parse_type_and_status() {
        assert_eq!(
            "event_conflict".parse::<NotificationType>().unwrap(),
            NotificationType::EventConflict
        );
        assert_eq!(
            "unread".parse::<NotificationStatus>().unwrap(),
            NotificationStatus::Unread
        );
        assert!("seen".parse::<NotificationStatus>().is_err());
    }
}
