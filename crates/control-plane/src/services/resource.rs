// Resource booking service

use schedulink_core::{Notification, ResourceBooking, Result, ScheduleStores};
use uuid::Uuid;

pub struct ResourceService {
    booking: ResourceBooking,
}

impl ResourceService {
    pub fn new(stores: ScheduleStores) -> Self {
        Self {
            booking: ResourceBooking::new(stores),
        }
    }

    /// File a booking request; approval happens through the notification
    pub async fn book(&self, resource_id: Uuid) -> Result<Notification> {
        self.booking.request(resource_id).await
    }
}
