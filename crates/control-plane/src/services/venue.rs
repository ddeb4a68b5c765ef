// Venue lookup service

use schedulink_core::{Result, ScheduleStores, SchedulingError, Venue, VenueRegistry};
use std::sync::Arc;
use uuid::Uuid;

pub struct VenueService {
    venues: Arc<dyn VenueRegistry>,
}

impl VenueService {
    pub fn new(stores: ScheduleStores) -> Self {
        Self {
            venues: stores.venues,
        }
    }

    pub async fn list(&self) -> Result<Vec<Venue>> {
        self.venues.list_venues().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Venue> {
        self.venues
            .get_venue(id)
            .await?
            .ok_or_else(|| SchedulingError::not_found(format!("Venue {id} not found")))
    }
}
