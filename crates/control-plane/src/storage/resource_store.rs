// Database-backed ResourceStore implementation

use async_trait::async_trait;
use schedulink_core::{Resource, ResourceStore, Result, SchedulingError};
use uuid::Uuid;

use super::repositories::Database;

#[derive(Clone)]
pub struct DbResourceStore {
    db: Database,
}

impl DbResourceStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResourceStore for DbResourceStore {
    async fn get_resource(&self, id: Uuid) -> Result<Option<Resource>> {
        let row = self
            .db
            .get_resource(id)
            .await
            .map_err(|e| SchedulingError::storage(e.to_string()))?;
        Ok(row.map(Resource::from))
    }

    async fn set_resource_availability(
        &self,
        id: Uuid,
        availability: bool,
    ) -> Result<Option<Resource>> {
        let row = self
            .db
            .update_resource_availability(id, availability)
            .await
            .map_err(|e| SchedulingError::storage(e.to_string()))?;
        Ok(row.map(Resource::from))
    }
}

/// Create a database-backed resource store
pub fn create_db_resource_store(db: Database) -> DbResourceStore {
    DbResourceStore::new(db)
}
