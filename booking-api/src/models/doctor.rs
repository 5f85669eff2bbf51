use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::error::Result;

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub specialization: String,
    pub experience: i32,
    pub qualifications: String,
    pub bio: Option<String>,
    pub rating: f64,
    pub consultation_fee: f64,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoctor {
    #[serde(default)]
    #[validate(length(min = 1, message = "Doctor must have a specialization"))]
    pub specialization: String,
    #[validate(
        required(message = "Please enter experience in years"),
        range(min = 0, message = "Experience cannot be negative")
    )]
    pub experience: Option<i32>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Qualifications are required"))]
    pub qualifications: String,
    pub bio: Option<String>,
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: Option<f64>,
    #[validate(range(min = 0.0, message = "Consultation fee cannot be negative"))]
    pub consultation_fee: Option<f64>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDoctor {
    pub user_id: Uuid,
    pub specialization: String,
    pub experience: i32,
    pub qualifications: String,
    pub bio: Option<String>,
    pub rating: f64,
    pub consultation_fee: f64,
    pub profile_image: Option<String>,
}

impl NewDoctor {
    pub fn new(user_id: Uuid, mut input: CreateDoctor) -> Result<Self> {
        input.specialization = input.specialization.trim().to_string();
        input.qualifications = input.qualifications.trim().to_string();
        input.validate()?;

        Ok(Self {
            user_id,
            specialization: input.specialization,
            experience: input.experience.unwrap_or_default(),
            qualifications: input.qualifications,
            bio: non_empty(input.bio),
            rating: input.rating.unwrap_or(0.0),
            consultation_fee: input.consultation_fee.unwrap_or(0.0),
            profile_image: non_empty(input.profile_image),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
