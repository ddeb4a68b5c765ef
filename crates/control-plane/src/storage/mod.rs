// Storage layer for the Schedulink control-plane
// Decision: Support both PostgreSQL (production) and in-memory (dev mode)
//
// This module provides database implementations for core traits:
// - DbEventStore: implements EventStore, venues kept in a join table
// - DbVenueRegistry: implements VenueRegistry for id -> name lookups
// - DbNotificationStore: implements NotificationStore
// - DbResourceStore: implements ResourceStore for the booking flag

pub mod backend;
pub mod event_store;
pub mod models;
pub mod notification_store;
pub mod repositories;
pub mod resource_store;
pub mod venue_store;


pub use backend::StorageBackend;
pub use event_store::{create_db_event_store, DbEventStore};
pub use notification_store::{create_db_notification_store, DbNotificationStore};
pub use repositories::Database;
pub use resource_store::{create_db_resource_store, DbResourceStore};
pub use venue_store::{create_db_venue_registry, DbVenueRegistry};
