// Services layer for business logic
// Services wrap the scheduling workflows and reach storage only through
// the core store traits

pub mod event;
pub mod notification;
pub mod resource;
pub mod venue;

pub use event::EventService;
pub use notification::NotificationService;
pub use resource::ResourceService;
pub use venue::VenueService;

use schedulink_core::{ScheduleLock, ScheduleStores};
use std::sync::Arc;

/// Every service, wired to one set of stores and one schedule lock
#[derive(Clone)]
pub struct Services {
    pub events: Arc<EventService>,
    pub notifications: Arc<NotificationService>,
    pub venues: Arc<VenueService>,
    pub resources: Arc<ResourceService>,
}

impl Services {
    pub fn new(stores: ScheduleStores) -> Self {
        let lock = ScheduleLock::new();
        Self {
            events: Arc::new(EventService::new(stores.clone(), lock.clone())),
            notifications: Arc::new(NotificationService::new(stores.clone(), lock)),
            venues: Arc::new(VenueService::new(stores.clone())),
            resources: Arc::new(ResourceService::new(stores)),
        }
    }
}
