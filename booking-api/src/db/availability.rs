use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Availability, NewAvailability};

#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    async fn create(&self, slot: NewAvailability) -> Result<Availability>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Availability>>;

    /// Ordered by day, then start time
    async fn list_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<Availability>>;

    async fn update(&self, slot: &Availability) -> Result<Availability>;
}

pub struct PgAvailabilityRepository {
    pool: PgPool,
}

impl PgAvailabilityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvailabilityRepository for PgAvailabilityRepository {
    async fn create(&self, slot: NewAvailability) -> Result<Availability> {
        let created = sqlx::query_as::<_, Availability>(
            r#"
            INSERT INTO availabilities (id, doctor_id, day_of_week, start_time, end_time,
                                        is_available, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(slot.doctor_id)
        .bind(slot.day_of_week)
        .bind(slot.start_time)
        .bind(slot.end_time)
        .bind(slot.is_available)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Availability>> {
        let slot = sqlx::query_as::<_, Availability>("SELECT * FROM availabilities WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(slot)
    }

    async fn list_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<Availability>> {
        let slots = sqlx::query_as::<_, Availability>(
            "SELECT * FROM availabilities WHERE doctor_id = $1 ORDER BY day_of_week, start_time",
        )
        .bind(doctor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(slots)
    }

    async fn update(&self, slot: &Availability) -> Result<Availability> {
        let updated = sqlx::query_as::<_, Availability>(
            r#"
            UPDATE availabilities
            SET day_of_week = $2, start_time = $3, end_time = $4, is_available = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(slot.id)
        .bind(slot.day_of_week)
        .bind(slot.start_time)
        .bind(slot.end_time)
        .bind(slot.is_available)
        .fetch_one(&self.pool)
        .await?;
        Ok(updated)
    }
}
