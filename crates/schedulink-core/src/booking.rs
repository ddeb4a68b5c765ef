// Resource booking requests
//
// Booking is a plain availability flag: a request files a `resource_booking`
// notification and approval flips the resource to unavailable.

use uuid::Uuid;

use crate::error::{Result, SchedulingError};
use crate::notification::{NewNotification, Notification};
use crate::traits::ScheduleStores;

#[derive(Clone)]
pub struct ResourceBooking {
    stores: ScheduleStores,
}

impl ResourceBooking {
    pub fn new(stores: ScheduleStores) -> Self {
        Self { stores }
    }

    /// File a booking request for an available resource
    pub async fn request(&self, resource_id: Uuid) -> Result<Notification> {
        let resource = self
            .stores
            .resources
            .get_resource(resource_id)
            .await?
            .ok_or_else(|| SchedulingError::not_found(format!("Resource {resource_id} not found")))?;
        if !resource.availability {
            return Err(SchedulingError::validation(format!(
                "Resource \"{}\" is not available",
                resource.name
            )));
        }

        let notification = self
            .stores
            .notifications
            .insert_notification(NewNotification::resource_booking(resource.id, &resource.name))
            .await?;
        tracing::info!(resource_id = %resource.id, "Resource booking requested");
        Ok(notification)
    }
}
