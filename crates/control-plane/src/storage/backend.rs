// Storage backend abstraction
// Decision: Use enum dispatch to pick the backend once at startup
//
// This module provides a unified StorageBackend enum that can work with
// either PostgreSQL (production) or in-memory (dev mode) storage and hands
// out the trait objects the scheduling workflows run on.

use anyhow::Result;
use schedulink_core::memory::InMemoryBackend;
use schedulink_core::{Broadcaster, ScheduleStores, Venue};
use sqlx::PgPool;
use std::sync::Arc;

use super::event_store::create_db_event_store;
use super::notification_store::create_db_notification_store;
use super::repositories::Database;
use super::resource_store::create_db_resource_store;
use super::venue_store::create_db_venue_registry;

/// Storage backend that can be either PostgreSQL or in-memory
#[derive(Clone)]
pub enum StorageBackend {
    /// PostgreSQL database (production)
    Postgres(Database),
    /// In-memory stores (dev mode)
    InMemory(InMemoryBackend),
}

impl StorageBackend {
    /// Connect to PostgreSQL and apply the schema
    pub async fn postgres(database_url: &str) -> Result<Self> {
        let db = Database::from_url(database_url).await?;
        db.migrate().await?;
        Ok(Self::Postgres(db))
    }

    /// Create an in-memory storage backend
    pub fn in_memory() -> Self {
        Self::InMemory(InMemoryBackend::new())
    }

    /// Check if this is dev mode (in-memory)
    pub fn is_dev_mode(&self) -> bool {
        matches!(self, Self::InMemory(_))
    }

    pub fn mode(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::InMemory(_) => "in-memory",
        }
    }

    /// Get the PostgreSQL pool if using PostgreSQL backend
    pub fn pool(&self) -> Option<&PgPool> {
        match self {
            Self::Postgres(db) => Some(db.pool()),
            Self::InMemory(_) => None,
        }
    }

    /// Trait objects for the scheduling workflows
    pub fn stores(&self, broadcaster: Arc<dyn Broadcaster>) -> ScheduleStores {
        match self {
            Self::Postgres(db) => ScheduleStores {
                events: Arc::new(create_db_event_store(db.clone())),
                venues: Arc::new(create_db_venue_registry(db.clone())),
                notifications: Arc::new(create_db_notification_store(db.clone())),
                resources: Arc::new(create_db_resource_store(db.clone())),
                broadcaster,
            },
            Self::InMemory(backend) => backend.stores(broadcaster),
        }
    }

    /// Register venues by name; only meaningful in dev mode
    pub async fn seed_venues(&self, names: &[String]) -> Vec<Venue> {
        match self {
            Self::InMemory(backend) => backend.seed_venues(names.iter().cloned()).await,
            Self::Postgres(_) => {
                if !names.is_empty() {
                    tracing::warn!("SEED_VENUES ignored when running against PostgreSQL");
                }
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schedulink_core::BroadcastHub;

    #[tokio::test]
    async fn test_in_memory_backend_seeds_venues() {
        let backend = StorageBackend::in_memory();
        assert!(backend.is_dev_mode());
        assert_eq!(backend.mode(), "in-memory");
        assert!(backend.pool().is_none());

        let seeded = backend
            .seed_venues(&["Main Hall".to_string(), "Gym".to_string()])
            .await;
        assert_eq!(seeded.len(), 2);

        let stores = backend.stores(Arc::new(BroadcastHub::new(4)));
        let venues = stores.venues.list_venues().await.unwrap();
        let names: Vec<&str> = venues.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Gym", "Main Hall"]);
    }
}
