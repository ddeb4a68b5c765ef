// Database-backed VenueRegistry implementation

use async_trait::async_trait;
use schedulink_core::{Result, SchedulingError, Venue, VenueRegistry};
use std::collections::HashMap;
use uuid::Uuid;

use super::repositories::Database;

#[derive(Clone)]
pub struct DbVenueRegistry {
    db: Database,
}

impl DbVenueRegistry {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VenueRegistry for DbVenueRegistry {
    async fn get_venue(&self, id: Uuid) -> Result<Option<Venue>> {
        let row = self
            .db
            .get_venue(id)
            .await
            .map_err(|e| SchedulingError::storage(e.to_string()))?;
        Ok(row.map(Venue::from))
    }

    async fn list_venues(&self) -> Result<Vec<Venue>> {
        let rows = self
            .db
            .list_venues()
            .await
            .map_err(|e| SchedulingError::storage(e.to_string()))?;
        Ok(rows.into_iter().map(Venue::from).collect())
    }

    async fn venue_names(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>> {
        let rows = self
            .db
            .list_venues_by_ids(ids)
            .await
            .map_err(|e| SchedulingError::storage(e.to_string()))?;
        Ok(rows.into_iter().map(|row| (row.id, row.name)).collect())
    }
}

/// Create a database-backed venue registry
pub fn create_db_venue_registry(db: Database) -> DbVenueRegistry {
    DbVenueRegistry::new(db)
}
