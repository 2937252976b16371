// src/models/setting.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

/// Represents one row of the 'site_settings' key/value table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SiteSetting {
    pub key: String,
    pub value: String,
}

/// Settings keys the public API may reveal. Everything else (and anything
/// added later by accident) stays admin-only.
pub const PUBLIC_SETTING_KEYS: &[&str] = &[
    "mosque_name",
    "mosque_subtitle",
    "logo_url",
    "footer_description",
    "footer_address",
    "footer_phone",
    "footer_email",
    "footer_hours_daily",
    "footer_hours_office",
];

/// A key is public when it is in the allow-list or is a section
/// visibility flag.
pub fn is_public_setting(key: &str) -> bool {
    PUBLIC_SETTING_KEYS.contains(&key)
        || (key.starts_with("section_") && key.ends_with("_visible"))
}

/// DTO for bulk-upserting settings.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSettingsRequest {
    pub values: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_flags_are_public() {
        assert!(is_public_setting("section_donation_visible"));
        assert!(is_public_setting("mosque_name"));
    }

    #[test]
    fn unknown_and_internal_keys_are_not_public() {
        assert!(!is_public_setting("maintenance_mode"));
        assert!(!is_public_setting("some_future_secret"));
    }
}
