use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Doctor, NewDoctor};

#[async_trait]
pub trait DoctorRepository: Send + Sync {
    async fn create(&self, doctor: NewDoctor) -> Result<Doctor>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Doctor>>;

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Doctor>>;

    /// Highest rated first
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Doctor>>;
}

pub struct PgDoctorRepository {
    pool: PgPool,
}

impl PgDoctorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DoctorRepository for PgDoctorRepository {
    async fn create(&self, doctor: NewDoctor) -> Result<Doctor> {
        sqlx::query_as::<_, Doctor>(
            r#"
            INSERT INTO doctors (id, user_id, specialization, experience, qualifications, bio,
                                 rating, consultation_fee, profile_image, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(doctor.user_id)
        .bind(&doctor.specialization)
        .bind(doctor.experience)
        .bind(&doctor.qualifications)
        .bind(&doctor.bio)
        .bind(doctor.rating)
        .bind(doctor.consultation_fee)
        .bind(&doctor.profile_image)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if super::is_unique_violation(&e) {
                AppError::BadRequest("Doctor profile already exists".into())
            } else {
                AppError::Database(e)
            }
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Doctor>> {
        let doctor = sqlx::query_as::<_, Doctor>("SELECT * FROM doctors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(doctor)
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Doctor>> {
        let doctor = sqlx::query_as::<_, Doctor>("SELECT * FROM doctors WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(doctor)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Doctor>> {
        let doctors = sqlx::query_as::<_, Doctor>(
            "SELECT * FROM doctors ORDER BY rating DESC, created_at ASC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(doctors)
    }
}
