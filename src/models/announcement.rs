// src/models/announcement.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

/// Represents the 'announcements' table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Announcement {
    pub id: i64,

    pub title: String,

    pub description: Option<String>,

    /// Date shown next to the announcement, newest first on the site.
    pub display_date: chrono::NaiveDate,

    pub active: bool,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for creating a new announcement.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAnnouncementRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub display_date: chrono::NaiveDate,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// DTO for updating an announcement. Fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAnnouncementRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub display_date: Option<chrono::NaiveDate>,
    pub active: Option<bool>,
}

/// Query parameters for listing announcements.
#[derive(Debug, Deserialize)]
pub struct AnnouncementListParams {
    /// Number of items to return (default: 5, max: 50).
    pub limit: Option<i64>,
}

fn default_true() -> bool {
    true
}
