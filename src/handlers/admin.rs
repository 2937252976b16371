// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use validator::Validate;

use crate::{
    config::Config,
    content::{is_safe_url, sanitize, text},
    editor::{Document, EditorSession},
    error::AppError,
    models::{
        activity::{Activity, CreateActivityRequest, UpdateActivityRequest},
        announcement::{Announcement, CreateAnnouncementRequest, UpdateAnnouncementRequest},
        article::{Article, CreateArticleRequest, UpdateArticleRequest},
        content::UpdateContentRequest,
        schedule::{CreateScheduleRequest, Schedule, UpdateScheduleRequest},
        setting::{SiteSetting, UpdateSettingsRequest},
    },
    state::AppState,
};

fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Rejects image URLs outside the scheme allow-list before they can be
/// persisted. Empty strings are treated as "no image".
fn check_image_url(image_url: Option<&str>, config: &Config) -> Result<(), AppError> {
    if let Some(url) = image_url.filter(|u| !u.trim().is_empty())
        && !is_safe_url(url, &config.public_origin)
    {
        return Err(AppError::BadRequest("Image URL is not allowed".to_string()));
    }
    Ok(())
}

fn map_unique_violation(e: sqlx::Error, what: &str) -> AppError {
    // Postgres error code for unique violation is 23505
    if e.to_string().contains("unique constraint") || e.to_string().contains("23505") {
        AppError::Conflict(format!("{} already exists", what))
    } else {
        tracing::error!("Database error: {:?}", e);
        AppError::from(e)
    }
}

// ---------------------------------------------------------------------------
// Articles

/// Lists all articles including drafts.
/// Admin only.
pub async fn list_articles(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let articles = sqlx::query_as::<_, Article>(
        r#"
        SELECT id, title, slug, content, image_url, status, created_at, updated_at
        FROM articles
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(articles))
}

/// Creates a new article. The rich body is sanitized before it is stored.
/// Admin only.
pub async fn create_article(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Json(payload): Json<CreateArticleRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_payload(&payload)?;
    check_image_url(payload.image_url.as_deref(), &config)?;

    let content = payload
        .content
        .as_deref()
        .map(|c| sanitize(c).into_inner());

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO articles (title, slug, content, image_url, status)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(&payload.title)
    .bind(&payload.slug)
    .bind(&content)
    .bind(&payload.image_url)
    .bind(&payload.status)
    .fetch_one(&pool)
    .await
    .map_err(|e| map_unique_violation(e, "Article slug"))?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// Updates an article by ID. Fields are optional.
/// Admin only.
pub async fn update_article(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateArticleRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_payload(&payload)?;
    check_image_url(payload.image_url.as_deref(), &config)?;

    if payload.title.is_none()
        && payload.slug.is_none()
        && payload.content.is_none()
        && payload.image_url.is_none()
        && payload.status.is_none()
    {
        return Ok(StatusCode::OK);
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE articles SET ");
    let mut separated = builder.separated(", ");

    if let Some(title) = payload.title {
        separated.push("title = ");
        separated.push_bind_unseparated(title);
    }

    if let Some(slug) = payload.slug {
        separated.push("slug = ");
        separated.push_bind_unseparated(slug);
    }

    if let Some(content) = payload.content {
        separated.push("content = ");
        separated.push_bind_unseparated(sanitize(&content).into_inner());
    }

    if let Some(image_url) = payload.image_url {
        separated.push("image_url = ");
        separated.push_bind_unseparated(image_url);
    }

    if let Some(status) = payload.status {
        separated.push("status = ");
        separated.push_bind_unseparated(status);
    }

    separated.push("updated_at = now()");

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder
        .build()
        .execute(&pool)
        .await
        .map_err(|e| map_unique_violation(e, "Article slug"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Article not found".to_string()));
    }

    Ok(StatusCode::OK)
}

/// Deletes an article by ID.
/// Admin only.
pub async fn delete_article(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM articles WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete article: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Article not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Activities

/// Lists all activities including inactive ones.
/// Admin only.
pub async fn list_activities(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let activities = sqlx::query_as::<_, Activity>(
        r#"
        SELECT id, title, description, icon_name, schedule_text, highlighted, active, created_at
        FROM activities
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(activities))
}

/// Creates a new activity.
/// Admin only.
pub async fn create_activity(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateActivityRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_payload(&payload)?;

    let description = payload
        .description
        .as_deref()
        .map(|d| sanitize(d).into_inner());

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO activities (title, description, icon_name, schedule_text, highlighted, active)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(&payload.title)
    .bind(&description)
    .bind(&payload.icon_name)
    .bind(&payload.schedule_text)
    .bind(payload.highlighted)
    .bind(payload.active)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create activity: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// Updates an activity by ID. Fields are optional.
/// Admin only.
pub async fn update_activity(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateActivityRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_payload(&payload)?;

    if payload.title.is_none()
        && payload.description.is_none()
        && payload.icon_name.is_none()
        && payload.schedule_text.is_none()
        && payload.highlighted.is_none()
        && payload.active.is_none()
    {
        return Ok(StatusCode::OK);
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE activities SET ");
    let mut separated = builder.separated(", ");

    if let Some(title) = payload.title {
        separated.push("title = ");
        separated.push_bind_unseparated(title);
    }

    if let Some(description) = payload.description {
        separated.push("description = ");
        separated.push_bind_unseparated(sanitize(&description).into_inner());
    }

    if let Some(icon_name) = payload.icon_name {
        separated.push("icon_name = ");
        separated.push_bind_unseparated(icon_name);
    }

    if let Some(schedule_text) = payload.schedule_text {
        separated.push("schedule_text = ");
        separated.push_bind_unseparated(schedule_text);
    }

    if let Some(highlighted) = payload.highlighted {
        separated.push("highlighted = ");
        separated.push_bind_unseparated(highlighted);
    }

    if let Some(active) = payload.active {
        separated.push("active = ");
        separated.push_bind_unseparated(active);
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder.build().execute(&pool).await.map_err(|e| {
        tracing::error!("Failed to update activity: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Activity not found".to_string()));
    }

    Ok(StatusCode::OK)
}

/// Deletes an activity by ID.
/// Admin only.
pub async fn delete_activity(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM activities WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete activity: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Activity not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Announcements

/// Lists all announcements including inactive ones.
/// Admin only.
pub async fn list_announcements(
    State(pool): State<PgPool>,
) -> Result<impl IntoResponse, AppError> {
    let announcements = sqlx::query_as::<_, Announcement>(
        r#"
        SELECT id, title, description, display_date, active, created_at
        FROM announcements
        ORDER BY display_date DESC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(announcements))
}

/// Creates a new announcement.
/// Admin only.
pub async fn create_announcement(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateAnnouncementRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_payload(&payload)?;

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO announcements (title, description, display_date, active)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(payload.display_date)
    .bind(payload.active)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create announcement: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// Updates an announcement by ID. Fields are optional.
/// Admin only.
pub async fn update_announcement(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateAnnouncementRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_payload(&payload)?;

    if payload.title.is_none()
        && payload.description.is_none()
        && payload.display_date.is_none()
        && payload.active.is_none()
    {
        return Ok(StatusCode::OK);
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE announcements SET ");
    let mut separated = builder.separated(", ");

    if let Some(title) = payload.title {
        separated.push("title = ");
        separated.push_bind_unseparated(title);
    }

    if let Some(description) = payload.description {
        separated.push("description = ");
        separated.push_bind_unseparated(description);
    }

    if let Some(display_date) = payload.display_date {
        separated.push("display_date = ");
        separated.push_bind_unseparated(display_date);
    }

    if let Some(active) = payload.active {
        separated.push("active = ");
        separated.push_bind_unseparated(active);
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder.build().execute(&pool).await.map_err(|e| {
        tracing::error!("Failed to update announcement: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Announcement not found".to_string()));
    }

    Ok(StatusCode::OK)
}

/// Deletes an announcement by ID.
/// Admin only.
pub async fn delete_announcement(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM announcements WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete announcement: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Announcement not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Schedules

/// Lists all schedule entries.
/// Admin only.
pub async fn list_schedules(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let schedules = sqlx::query_as::<_, Schedule>(
        r#"
        SELECT id, event_name, event_date, event_time, location, description, created_at
        FROM schedules
        ORDER BY event_date DESC, event_time ASC NULLS LAST
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(schedules))
}

/// Creates a new schedule entry. The rich notes field is sanitized before
/// it is stored.
/// Admin only.
pub async fn create_schedule(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateScheduleRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_payload(&payload)?;

    let description = payload
        .description
        .as_deref()
        .map(|d| sanitize(d).into_inner());

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO schedules (event_name, event_date, event_time, location, description)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(&payload.event_name)
    .bind(payload.event_date)
    .bind(payload.event_time)
    .bind(&payload.location)
    .bind(&description)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create schedule: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// Updates a schedule entry by ID. Fields are optional.
/// Admin only.
pub async fn update_schedule(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateScheduleRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_payload(&payload)?;

    if payload.event_name.is_none()
        && payload.event_date.is_none()
        && payload.event_time.is_none()
        && payload.location.is_none()
        && payload.description.is_none()
    {
        return Ok(StatusCode::OK);
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE schedules SET ");
    let mut separated = builder.separated(", ");

    if let Some(event_name) = payload.event_name {
        separated.push("event_name = ");
        separated.push_bind_unseparated(event_name);
    }

    if let Some(event_date) = payload.event_date {
        separated.push("event_date = ");
        separated.push_bind_unseparated(event_date);
    }

    if let Some(event_time) = payload.event_time {
        separated.push("event_time = ");
        separated.push_bind_unseparated(event_time);
    }

    if let Some(location) = payload.location {
        separated.push("location = ");
        separated.push_bind_unseparated(location);
    }

    if let Some(description) = payload.description {
        separated.push("description = ");
        separated.push_bind_unseparated(sanitize(&description).into_inner());
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder.build().execute(&pool).await.map_err(|e| {
        tracing::error!("Failed to update schedule: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Schedule not found".to_string()));
    }

    Ok(StatusCode::OK)
}

/// Deletes a schedule entry by ID.
/// Admin only.
pub async fn delete_schedule(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM schedules WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete schedule: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Schedule not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Content slots

/// Overwrites the content of a seeded slot (sejarah, visi, misi, ...).
/// Slots are never created through the API, so an unknown key is a 404.
/// Admin only.
pub async fn update_content(
    State(pool): State<PgPool>,
    Path(key): Path<String>,
    Json(payload): Json<UpdateContentRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_payload(&payload)?;

    let content = sanitize(&payload.content).into_inner();

    let result = sqlx::query(
        r#"
        UPDATE site_content
        SET content = $2, title = COALESCE($3, title)
        WHERE key = $1
        "#,
    )
    .bind(&key)
    .bind(&content)
    .bind(&payload.title)
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to update content slot: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Content slot not found".to_string()));
    }

    Ok(StatusCode::OK)
}

// ---------------------------------------------------------------------------
// Settings

/// Returns the full settings map, internal keys included.
/// Admin only.
pub async fn list_settings(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let rows = sqlx::query_as::<_, SiteSetting>("SELECT key, value FROM site_settings ORDER BY key")
        .fetch_all(&pool)
        .await?;

    let map: std::collections::HashMap<String, String> =
        rows.into_iter().map(|row| (row.key, row.value)).collect();

    Ok(Json(map))
}

/// Bulk-upserts settings values and invalidates the settings cache so the
/// change is visible on the next public read.
/// Admin only.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.values.is_empty() {
        return Ok(StatusCode::OK);
    }

    for (key, value) in &payload.values {
        if key.is_empty() || key.len() > 100 {
            return Err(AppError::BadRequest(format!("Invalid settings key: {}", key)));
        }
        if value.len() > 10000 {
            return Err(AppError::BadRequest(format!(
                "Value too long for key: {}",
                key
            )));
        }
    }

    for (key, value) in &payload.values {
        sqlx::query(
            r#"
            INSERT INTO site_settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&state.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to upsert setting: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;
    }

    state.settings.invalidate().await;

    Ok(StatusCode::OK)
}

// ---------------------------------------------------------------------------
// Editor preview

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub document: Document,
}

/// Renders an editor document the way the public pages will: serialized,
/// sanitized, and reduced to a plain-text excerpt. Lets the admin
/// interface show exactly what a save would publish.
/// Admin only.
pub async fn preview_content(
    State(config): State<Config>,
    Json(payload): Json<PreviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = EditorSession::from_document(payload.document, config.public_origin.clone());
    let html = session.html();
    let excerpt = text::truncate_plain(Some(html.as_str()), text::EXCERPT_LENGTH);

    Ok(Json(json!({ "html": html, "excerpt": excerpt })))
}
