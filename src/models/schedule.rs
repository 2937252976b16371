// src/models/schedule.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

use crate::content::SanitizedHtml;

/// Represents the 'schedules' table: one-off events such as kajian and
/// community gatherings.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Schedule {
    pub id: i64,

    pub event_name: String,

    pub event_date: chrono::NaiveDate,

    pub event_time: Option<chrono::NaiveTime>,

    pub location: Option<String>,

    /// Rich HTML notes for the event.
    pub description: Option<String>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Public view with the description re-sanitized.
#[derive(Debug, Serialize)]
pub struct PublicSchedule {
    pub id: i64,
    pub event_name: String,
    pub event_date: chrono::NaiveDate,
    pub event_time: Option<chrono::NaiveTime>,
    pub location: Option<String>,
    pub description: Option<SanitizedHtml>,
}

/// DTO for creating a new schedule entry.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateScheduleRequest {
    #[validate(length(min = 1, max = 200))]
    pub event_name: String,
    pub event_date: chrono::NaiveDate,
    pub event_time: Option<chrono::NaiveTime>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(length(max = 100000))]
    pub description: Option<String>,
}

/// DTO for updating a schedule entry. Fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateScheduleRequest {
    #[validate(length(min = 1, max = 200))]
    pub event_name: Option<String>,
    pub event_date: Option<chrono::NaiveDate>,
    pub event_time: Option<chrono::NaiveTime>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(length(max = 100000))]
    pub description: Option<String>,
}
