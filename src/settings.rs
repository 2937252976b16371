// src/settings.rs

use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::{error::AppError, state::AppState};

/// When this key is exactly `"true"`, the public API serves only the
/// maintenance placeholder. The admin interface is unaffected.
pub const MAINTENANCE_KEY: &str = "maintenance_mode";

/// How long a fetched settings snapshot is served before the next read
/// goes back to the database.
pub const SETTINGS_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug)]
struct Snapshot {
    fetched_at: Instant,
    values: HashMap<String, String>,
}

/// An explicitly owned, explicitly invalidated cache over the
/// `site_settings` table. Lives in `AppState`; the admin settings handler
/// calls `invalidate` after every write so changes take effect on the next
/// read rather than after the staleness window.
#[derive(Debug)]
pub struct SettingsCache {
    ttl: Duration,
    inner: RwLock<Option<Snapshot>>,
}

impl SettingsCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: RwLock::new(None),
        }
    }

    /// Returns the settings map, refetching when the cached snapshot is
    /// older than the TTL or has been invalidated.
    pub async fn get(&self, pool: &PgPool) -> Result<HashMap<String, String>, AppError> {
        {
            let guard = self.inner.read().await;
            if let Some(snapshot) = guard.as_ref()
                && snapshot.fetched_at.elapsed() < self.ttl
            {
                return Ok(snapshot.values.clone());
            }
        }

        let values = fetch_settings(pool).await?;
        let mut guard = self.inner.write().await;
        *guard = Some(Snapshot {
            fetched_at: Instant::now(),
            values: values.clone(),
        });
        Ok(values)
    }

    /// Drops the cached snapshot so the next read hits the database.
    pub async fn invalidate(&self) {
        let mut guard = self.inner.write().await;
        *guard = None;
    }
}

async fn fetch_settings(pool: &PgPool) -> Result<HashMap<String, String>, AppError> {
    let rows: Vec<(String, String)> =
        sqlx::query_as("SELECT key, value FROM site_settings")
            .fetch_all(pool)
            .await?;

    Ok(rows.into_iter().collect())
}

/// A section renders unless its flag is exactly `"false"`. Any other
/// value, including an absent key, means visible.
pub fn section_visible(settings: &HashMap<String, String>, key: &str) -> bool {
    settings.get(key).map(|v| v != "false").unwrap_or(true)
}

/// Maintenance mode is on only when the flag is exactly `"true"`.
pub fn maintenance_enabled(settings: &HashMap<String, String>) -> bool {
    settings
        .get(MAINTENANCE_KEY)
        .map(|v| v == "true")
        .unwrap_or(false)
}

/// Axum Middleware: layered over the public routes only, so the admin
/// interface and uploads stay reachable while the site is closed.
pub async fn maintenance_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let settings = state.settings.get(&state.pool).await?;

    if maintenance_enabled(&settings) {
        let body = Json(json!({
            "maintenance": true,
            "message": "The site is temporarily closed for maintenance",
        }));
        return Ok((StatusCode::SERVICE_UNAVAILABLE, body).into_response());
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn section_hidden_only_on_exact_false() {
        let map = settings(&[("section_donation_visible", "false")]);
        assert!(!section_visible(&map, "section_donation_visible"));

        let map = settings(&[("section_donation_visible", "FALSE")]);
        assert!(section_visible(&map, "section_donation_visible"));

        let map = settings(&[("section_donation_visible", "0")]);
        assert!(section_visible(&map, "section_donation_visible"));
    }

    #[test]
    fn absent_key_means_visible() {
        let map = settings(&[]);
        assert!(section_visible(&map, "section_articles_visible"));
    }

    #[test]
    fn maintenance_only_on_exact_true() {
        assert!(maintenance_enabled(&settings(&[(MAINTENANCE_KEY, "true")])));
        assert!(!maintenance_enabled(&settings(&[(MAINTENANCE_KEY, "TRUE")])));
        assert!(!maintenance_enabled(&settings(&[(MAINTENANCE_KEY, "1")])));
        assert!(!maintenance_enabled(&settings(&[])));
    }

    #[test]
    fn maintenance_does_not_depend_on_section_flags() {
        let map = settings(&[
            (MAINTENANCE_KEY, "true"),
            ("section_articles_visible", "true"),
        ]);
        assert!(maintenance_enabled(&map));
    }
}
