// src/handlers/announcements.rs

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::announcement::{Announcement, AnnouncementListParams},
};

/// Lists active announcements, newest display date first.
pub async fn list_announcements(
    State(pool): State<PgPool>,
    Query(params): Query<AnnouncementListParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit.unwrap_or(5).clamp(1, 50);

    let announcements = sqlx::query_as::<_, Announcement>(
        r#"
        SELECT id, title, description, display_date, active, created_at
        FROM announcements
        WHERE active = TRUE
        ORDER BY display_date DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(&pool)
    .await?;

    Ok(Json(announcements))
}
