// src/handlers/content.rs

use std::collections::HashMap;

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::{Map, json};
use sqlx::PgPool;

use crate::{
    content::sanitize::sanitize_opt,
    error::AppError,
    handlers::{activities, articles, schedules},
    models::{
        activity::Activity,
        announcement::Announcement,
        article::Article,
        content::{ContentSlot, PublicContentSlot},
        setting::is_public_setting,
    },
    settings::section_visible,
    state::AppState,
};

fn to_public(slot: ContentSlot) -> PublicContentSlot {
    PublicContentSlot {
        key: slot.key,
        title: slot.title,
        content: sanitize_opt(slot.content.as_deref()),
    }
}

async fn fetch_slots(
    pool: &PgPool,
    keys: &[&str],
) -> Result<HashMap<String, PublicContentSlot>, AppError> {
    let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();

    let slots = sqlx::query_as::<_, ContentSlot>(
        r#"
        SELECT id, key, title, content
        FROM site_content
        WHERE key = ANY($1)
        "#,
    )
    .bind(&keys)
    .fetch_all(pool)
    .await?;

    Ok(slots
        .into_iter()
        .map(to_public)
        .map(|slot| (slot.key.clone(), slot))
        .collect())
}

/// Lists every content slot, keyed for direct lookup by the frontend.
pub async fn list_content(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let slots = sqlx::query_as::<_, ContentSlot>(
        r#"
        SELECT id, key, title, content
        FROM site_content
        ORDER BY key
        "#,
    )
    .fetch_all(&pool)
    .await?;

    let map: HashMap<String, PublicContentSlot> = slots
        .into_iter()
        .map(to_public)
        .map(|slot| (slot.key.clone(), slot))
        .collect();

    Ok(Json(map))
}

/// Returns the public subset of the settings map: site identity, footer
/// contact lines, and the section visibility flags. Internal keys never
/// leave the admin API.
pub async fn public_settings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let settings = state.settings.get(&state.pool).await?;

    let public: HashMap<String, String> = settings
        .into_iter()
        .filter(|(key, _)| is_public_setting(key))
        .collect();

    Ok(Json(public))
}

/// Aggregate payload for the landing page. Each section appears only when
/// its visibility flag allows it; hidden sections are omitted entirely
/// rather than served empty.
pub async fn home(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let settings = state.settings.get(&state.pool).await?;
    let pool = &state.pool;

    let mut sections = Map::new();

    if section_visible(&settings, "section_hero_visible") {
        let slots = fetch_slots(pool, &["ayat_arab", "ayat_terjemah", "ayat_sumber"]).await?;
        sections.insert("hero".to_string(), json!({ "slots": slots }));
    }

    if section_visible(&settings, "section_sejarah_visible") {
        let slots = fetch_slots(pool, &["sejarah", "sejarah_detail"]).await?;
        sections.insert("sejarah".to_string(), json!({ "slots": slots }));
    }

    if section_visible(&settings, "section_visimisi_visible") {
        let slots = fetch_slots(pool, &["visi", "misi"]).await?;
        sections.insert("visimisi".to_string(), json!({ "slots": slots }));
    }

    if section_visible(&settings, "section_announcements_visible") {
        let announcements = sqlx::query_as::<_, Announcement>(
            r#"
            SELECT id, title, description, display_date, active, created_at
            FROM announcements
            WHERE active = TRUE
            ORDER BY display_date DESC
            LIMIT 5
            "#,
        )
        .fetch_all(pool)
        .await?;
        sections.insert("announcements".to_string(), json!(announcements));
    }

    if section_visible(&settings, "section_schedule_visible") {
        let schedule_rows = sqlx::query_as::<_, crate::models::schedule::Schedule>(
            r#"
            SELECT id, event_name, event_date, event_time, location, description, created_at
            FROM schedules
            ORDER BY event_date ASC, event_time ASC NULLS LAST
            LIMIT 10
            "#,
        )
        .fetch_all(pool)
        .await?;
        let rows: Vec<_> = schedule_rows.into_iter().map(schedules::to_public).collect();
        sections.insert("schedule".to_string(), json!(rows));
    }

    if section_visible(&settings, "section_articles_visible") {
        let article_rows = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, slug, content, image_url, status, created_at, updated_at
            FROM articles
            WHERE status = 'published'
            ORDER BY created_at DESC
            LIMIT 3
            "#,
        )
        .fetch_all(pool)
        .await?;
        let rows: Vec<_> = article_rows.into_iter().map(articles::to_public).collect();
        sections.insert("articles".to_string(), json!(rows));
    }

    if section_visible(&settings, "section_activities_visible") {
        let activity_rows = sqlx::query_as::<_, Activity>(
            r#"
            SELECT id, title, description, icon_name, schedule_text, highlighted, active, created_at
            FROM activities
            WHERE active = TRUE
            ORDER BY highlighted DESC, created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await?;
        let rows: Vec<_> = activity_rows.into_iter().map(activities::to_public).collect();
        sections.insert("activities".to_string(), json!(rows));
    }

    Ok(Json(json!({ "sections": sections })))
}
