// Repository layer for database operations
// Events keep their venues in the event_venues join table, ordered by position

use anyhow::Result;
use chrono::NaiveDate;
use schedulink_core::Event;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::models::*;

const EVENT_COLUMNS: &str = "id, name, description, start_date, end_date, \
    setup_start_time, setup_end_time, event_start_time, event_end_time, \
    cleanup_start_time, cleanup_end_time, behalf_of, contact_info, nature_of_event, \
    status, created_at, updated_at";

const NOTIFICATION_COLUMNS: &str =
    "id, type, message, event_id, resource_id, booking_id, status, created_at";

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply the embedded schema migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    // ============================================
    // Events
    // ============================================

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_events(&self, status: Option<&str>) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY start_date DESC, created_at DESC
            "#
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Events in `status` whose date range overlaps `[start, end]`
    pub async fn list_events_overlapping(
        &self,
        status: &str,
        start: NaiveDate,
        end: NaiveDate,
        exclude: Option<Uuid>,
    ) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE status = $1
              AND ($4::uuid IS NULL OR id <> $4)
              AND (
                    start_date BETWEEN $2 AND $3
                 OR $2 BETWEEN start_date AND COALESCE(end_date, start_date)
              )
            ORDER BY start_date ASC, id ASC
            "#
        ))
        .bind(status)
        .bind(start)
        .bind(end)
        .bind(exclude)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn create_event(&self, event: &Event) -> Result<EventRow> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            INSERT INTO events (
                id, name, description, start_date, end_date,
                setup_start_time, setup_end_time, event_start_time, event_end_time,
                cleanup_start_time, cleanup_end_time, behalf_of, contact_info, nature_of_event,
                status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(event.id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(event.setup_start_time)
        .bind(event.setup_end_time)
        .bind(event.event_start_time)
        .bind(event.event_end_time)
        .bind(event.cleanup_start_time)
        .bind(event.cleanup_end_time)
        .bind(&event.behalf_of)
        .bind(&event.contact_info)
        .bind(&event.nature_of_event)
        .bind(event.status.as_str())
        .bind(event.created_at)
        .bind(event.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        Self::replace_event_venues(&mut tx, event.id, &event.venue_ids).await?;
        tx.commit().await?;

        Ok(row)
    }

    /// Overwrite an event's descriptive fields and venues; status is untouched
    pub async fn update_event(&self, event: &Event) -> Result<Option<EventRow>> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            UPDATE events
            SET
                name = $2,
                description = $3,
                start_date = $4,
                end_date = $5,
                setup_start_time = $6,
                setup_end_time = $7,
                event_start_time = $8,
                event_end_time = $9,
                cleanup_start_time = $10,
                cleanup_end_time = $11,
                behalf_of = $12,
                contact_info = $13,
                nature_of_event = $14,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(event.id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(event.setup_start_time)
        .bind(event.setup_end_time)
        .bind(event.event_start_time)
        .bind(event.event_end_time)
        .bind(event.cleanup_start_time)
        .bind(event.cleanup_end_time)
        .bind(&event.behalf_of)
        .bind(&event.contact_info)
        .bind(&event.nature_of_event)
        .fetch_optional(&mut *tx)
        .await?;

        if row.is_some() {
            Self::replace_event_venues(&mut tx, event.id, &event.venue_ids).await?;
        }
        tx.commit().await?;

        Ok(row)
    }

    pub async fn update_event_status(&self, id: Uuid, status: &str) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            UPDATE events
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_event(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Venue ids for the given events, in stored order per event
    pub async fn list_event_venues(&self, event_ids: &[Uuid]) -> Result<Vec<EventVenueRow>> {
        let rows = sqlx::query_as::<_, EventVenueRow>(
            r#"
            SELECT event_id, venue_id
            FROM event_venues
            WHERE event_id = ANY($1)
            ORDER BY event_id, position
            "#,
        )
        .bind(event_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn replace_event_venues(
        tx: &mut Transaction<'_, Postgres>,
        event_id: Uuid,
        venue_ids: &[Uuid],
    ) -> Result<()> {
        sqlx::query("DELETE FROM event_venues WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut **tx)
            .await?;

        for (position, venue_id) in venue_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO event_venues (event_id, position, venue_id) VALUES ($1, $2, $3)",
            )
            .bind(event_id)
            .bind(position as i32)
            .bind(venue_id)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }

    // ============================================
    // Venues
    // ============================================

    pub async fn get_venue(&self, id: Uuid) -> Result<Option<VenueRow>> {
        let row = sqlx::query_as::<_, VenueRow>(
            r#"
            SELECT id, name, description, category, availability
            FROM venues
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_venues(&self) -> Result<Vec<VenueRow>> {
        let rows = sqlx::query_as::<_, VenueRow>(
            r#"
            SELECT id, name, description, category, availability
            FROM venues
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_venues_by_ids(&self, ids: &[Uuid]) -> Result<Vec<VenueRow>> {
        let rows = sqlx::query_as::<_, VenueRow>(
            r#"
            SELECT id, name, description, category, availability
            FROM venues
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============================================
    // Notifications
    // ============================================

    pub async fn create_notification(&self, input: CreateNotificationRow) -> Result<NotificationRow> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            r#"
            INSERT INTO notifications (id, type, message, event_id, resource_id, booking_id, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(input.id)
        .bind(&input.kind)
        .bind(&input.message)
        .bind(input.event_id)
        .bind(input.resource_id)
        .bind(input.booking_id)
        .bind(&input.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_notification(&self, id: Uuid) -> Result<Option<NotificationRow>> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn update_notification_status(
        &self,
        id: Uuid,
        status: &str,
    ) -> Result<Option<NotificationRow>> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            r#"
            UPDATE notifications
            SET status = $2
            WHERE id = $1
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_notifications(&self, kind: Option<&str>) -> Result<Vec<NotificationRow>> {
        let rows = sqlx::query_as::<_, NotificationRow>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS}
            FROM notifications
            WHERE ($1::text IS NULL OR type = $1)
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn delete_event_notifications(&self, event_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE event_id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    // ============================================
    // Resources
    // ============================================

    pub async fn get_resource(&self, id: Uuid) -> Result<Option<ResourceRow>> {
        let row = sqlx::query_as::<_, ResourceRow>(
            r#"
            SELECT id, name, description, category, availability
            FROM resources
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn update_resource_availability(
        &self,
        id: Uuid,
        availability: bool,
    ) -> Result<Option<ResourceRow>> {
        let row = sqlx::query_as::<_, ResourceRow>(
            r#"
            UPDATE resources
            SET availability = $2
            WHERE id = $1
            RETURNING id, name, description, category, availability
            "#,
        )
        .bind(id)
        .bind(availability)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
