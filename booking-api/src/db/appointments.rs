use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Appointment, NewAppointment};

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn create(&self, appointment: NewAppointment) -> Result<Appointment>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>>;

    async fn list_for_patient(&self, patient_id: Uuid) -> Result<Vec<Appointment>>;

    async fn list_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<Appointment>>;

    async fn update(&self, appointment: &Appointment) -> Result<Appointment>;
}

pub struct PgAppointmentRepository {
    pool: PgPool,
}

impl PgAppointmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for PgAppointmentRepository {
    async fn create(&self, appointment: NewAppointment) -> Result<Appointment> {
        let created = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (id, patient_id, doctor_id, appointment_date, appointment_time,
                                      status, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(appointment.patient_id)
        .bind(appointment.doctor_id)
        .bind(appointment.appointment_date)
        .bind(appointment.appointment_time)
        .bind(appointment.status.as_str())
        .bind(&appointment.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>> {
        let appointment = sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(appointment)
    }

    async fn list_for_patient(&self, patient_id: Uuid) -> Result<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT * FROM appointments
            WHERE patient_id = $1
            ORDER BY appointment_date, appointment_time
            "#,
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(appointments)
    }

    async fn list_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT * FROM appointments
            WHERE doctor_id = $1
            ORDER BY appointment_date, appointment_time
            "#,
        )
        .bind(doctor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(appointments)
    }

    async fn update(&self, appointment: &Appointment) -> Result<Appointment> {
        let updated = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments
            SET status = $2, notes = $3, prescription = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(appointment.id)
        .bind(&appointment.status)
        .bind(&appointment.notes)
        .bind(&appointment.prescription)
        .fetch_one(&self.pool)
        .await?;
        Ok(updated)
    }
}
