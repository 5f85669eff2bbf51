use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};

/// A doctor's recurring weekly window; `day_of_week` 0 is Sunday.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAvailability {
    #[validate(
        required(message = "dayOfWeek is required"),
        range(min = 0, max = 6, message = "dayOfWeek must be between 0 and 6")
    )]
    pub day_of_week: Option<i16>,
    #[validate(required(message = "startTime is required"))]
    pub start_time: Option<String>,
    #[validate(required(message = "endTime is required"))]
    pub end_time: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAvailability {
    #[validate(range(min = 0, max = 6, message = "dayOfWeek must be between 0 and 6"))]
    pub day_of_week: Option<i16>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAvailability {
    pub doctor_id: Uuid,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
}

impl NewAvailability {
    pub fn new(doctor_id: Uuid, input: CreateAvailability) -> Result<Self> {
        input.validate()?;

        let start_time = parse_time(input.start_time.as_deref().unwrap_or_default(), "startTime")?;
        let end_time = parse_time(input.end_time.as_deref().unwrap_or_default(), "endTime")?;
        ensure_window(start_time, end_time)?;

        Ok(Self {
            doctor_id,
            day_of_week: input.day_of_week.unwrap_or_default(),
            start_time,
            end_time,
            is_available: input.is_available.unwrap_or(true),
        })
    }
}

impl Availability {
    /// Merge an update into this slot, re-checking the time window.
    pub fn apply(mut self, update: UpdateAvailability) -> Result<Self> {
        update.validate()?;

        if let Some(day) = update.day_of_week {
            self.day_of_week = day;
        }
        if let Some(start) = update.start_time.as_deref() {
            self.start_time = parse_time(start, "startTime")?;
        }
        if let Some(end) = update.end_time.as_deref() {
            self.end_time = parse_time(end, "endTime")?;
        }
        if let Some(available) = update.is_available {
            self.is_available = available;
        }

        ensure_window(self.start_time, self.end_time)?;
        Ok(self)
    }
}

/// Accepts `HH:MM` or `HH:MM:SS`.
pub fn parse_time(value: &str, field: &str) -> Result<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| AppError::BadRequest(format!("{} must be a time formatted as HH:MM", field)))
}

fn ensure_window(start: NaiveTime, end: NaiveTime) -> Result<()> {
    if start >= end {
        return Err(AppError::BadRequest(
            "endTime must be greater than startTime".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(start: &str, end: &str) -> CreateAvailability {
        CreateAvailability {
            day_of_week: Some(1),
            start_time: Some(start.into()),
            end_time: Some(end.into()),
            is_available: None,
        }
    }

    fn message<T: std::fmt::Debug>(result: Result<T>) -> String {
        match result {
            Err(AppError::BadRequest(msg)) => msg,
            other => panic!("expected bad request, got {:?}", other),
        }
    }

    #[test]
    fn accepts_ordered_window_and_defaults_available() {
        let slot = NewAvailability::new(Uuid::new_v4(), input("09:00", "12:30")).unwrap();
        assert_eq!(slot.start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(slot.end_time, NaiveTime::from_hms_opt(12, 30, 0).unwrap());
        assert!(slot.is_available);
    }

    #[test]
    fn rejects_end_not_after_start() {
        assert_eq!(
            message(NewAvailability::new(Uuid::new_v4(), input("10:00", "10:00"))),
            "endTime must be greater than startTime"
        );
        assert_eq!(
            message(NewAvailability::new(Uuid::new_v4(), input("17:00", "09:00"))),
            "endTime must be greater than startTime"
        );
    }

    #[test]
    fn compares_times_not_strings() {
        // "9:30" < "10:00" as times even though it sorts after as text
        assert!(NewAvailability::new(Uuid::new_v4(), input("9:30", "10:00")).is_ok());
    }

    #[test]
    fn rejects_day_out_of_range() {
        let mut bad = input("09:00", "10:00");
        bad.day_of_week = Some(7);
        assert_eq!(
            message(NewAvailability::new(Uuid::new_v4(), bad)),
            "dayOfWeek must be between 0 and 6"
        );
    }

    #[test]
    fn rejects_malformed_time() {
        assert_eq!(
            message(NewAvailability::new(Uuid::new_v4(), input("nine", "10:00"))),
            "startTime must be a time formatted as HH:MM"
        );
    }

    #[test]
    fn update_rechecks_window() {
        let now = Utc::now();
        let slot = Availability {
            id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            day_of_week: 2,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            is_available: true,
            created_at: now,
            updated_at: now,
        };

        let moved = slot
            .clone()
            .apply(UpdateAvailability { end_time: Some("13:00".into()), ..Default::default() })
            .unwrap();
        assert_eq!(moved.end_time, NaiveTime::from_hms_opt(13, 0, 0).unwrap());

        let inverted = slot.apply(UpdateAvailability {
            start_time: Some("12:00".into()),
            ..Default::default()
        });
        assert_eq!(message(inverted), "endTime must be greater than startTime");
    }
}
