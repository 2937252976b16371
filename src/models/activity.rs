// src/models/activity.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

use crate::content::SanitizedHtml;

/// Represents the 'activities' table: recurring programs shown on the
/// public site (kajian, TPA, and so on).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,

    pub title: String,

    /// Rich HTML description.
    pub description: Option<String>,

    /// Icon identifier rendered by the frontend.
    pub icon_name: Option<String>,

    /// Free-form schedule line, e.g. "Setiap Jumat, 19:30".
    pub schedule_text: Option<String>,

    /// Highlighted programs sort before the rest.
    pub highlighted: bool,

    pub active: bool,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Public view with the description re-sanitized.
#[derive(Debug, Serialize)]
pub struct PublicActivity {
    pub id: i64,
    pub title: String,
    pub description: Option<SanitizedHtml>,
    pub icon_name: Option<String>,
    pub schedule_text: Option<String>,
    pub highlighted: bool,
}

/// DTO for creating a new activity.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateActivityRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 100000))]
    pub description: Option<String>,
    #[validate(length(max = 50))]
    pub icon_name: Option<String>,
    #[validate(length(max = 200))]
    pub schedule_text: Option<String>,
    #[serde(default)]
    pub highlighted: bool,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// DTO for updating an activity. Fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateActivityRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 100000))]
    pub description: Option<String>,
    #[validate(length(max = 50))]
    pub icon_name: Option<String>,
    #[validate(length(max = 200))]
    pub schedule_text: Option<String>,
    pub highlighted: Option<bool>,
    pub active: Option<bool>,
}

fn default_true() -> bool {
    true
}
