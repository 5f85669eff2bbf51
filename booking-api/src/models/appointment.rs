use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::availability::parse_time;

/// Any status may follow any other; there is no enforced workflow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::Completed => "Completed",
        }
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "Pending" => Ok(AppointmentStatus::Pending),
            "Confirmed" => Ok(AppointmentStatus::Confirmed),
            "Cancelled" => Ok(AppointmentStatus::Cancelled),
            "Completed" => Ok(AppointmentStatus::Completed),
            other => Err(AppError::BadRequest(format!(
                "`{}` is not a valid appointment status",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    #[serde(rename = "date")]
    pub appointment_date: NaiveDate,
    #[serde(rename = "time")]
    pub appointment_time: NaiveTime,
    pub status: String,
    pub notes: Option<String>,
    pub prescription: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn status(&self) -> AppointmentStatus {
        self.status.parse().unwrap_or(AppointmentStatus::Pending)
    }

    pub fn apply(mut self, update: UpdateAppointment) -> Result<Self> {
        if let Some(status) = update.status.as_deref() {
            self.status = status.trim().parse::<AppointmentStatus>()?.as_str().to_string();
        }
        if let Some(notes) = update.notes {
            self.notes = Some(notes);
        }
        if let Some(prescription) = update.prescription {
            self.prescription = Some(prescription);
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointment {
    pub doctor_id: Option<Uuid>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointment {
    pub status: Option<String>,
    pub notes: Option<String>,
    pub prescription: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

impl NewAppointment {
    pub fn new(patient_id: Uuid, input: CreateAppointment) -> Result<Self> {
        let doctor_id = input
            .doctor_id
            .ok_or_else(|| AppError::BadRequest("doctorId is required".into()))?;

        let date = input
            .date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| AppError::BadRequest("Appointment date is required".into()))?;
        let appointment_date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
            AppError::BadRequest("Appointment date must be formatted as YYYY-MM-DD".into())
        })?;

        let time = input
            .time
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::BadRequest("Appointment time is required".into()))?;
        let appointment_time = parse_time(time, "time")?;

        Ok(Self {
            patient_id,
            doctor_id,
            appointment_date,
            appointment_time,
            status: AppointmentStatus::Pending,
            notes: input.notes,
        })
    }
}
