// src/models/content.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

use crate::content::SanitizedHtml;

/// Represents the 'site_content' table: one named slot per editable block
/// of profile text (sejarah, visi, misi, ...). Slots are seeded by the
/// migrations; admins overwrite their content, never create or delete
/// them.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ContentSlot {
    pub id: i64,

    /// Slot key, unique, e.g. "sejarah" or "misi".
    pub key: String,

    /// Label shown in the admin interface.
    pub title: String,

    /// Rich HTML content of the slot.
    pub content: Option<String>,
}

/// Public view of a slot with the content re-sanitized.
#[derive(Debug, Serialize)]
pub struct PublicContentSlot {
    pub key: String,
    pub title: String,
    pub content: Option<SanitizedHtml>,
}

/// DTO for overwriting a slot's content.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateContentRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 100000))]
    pub content: String,
}
