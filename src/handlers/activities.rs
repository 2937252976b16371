// src/handlers/activities.rs

use axum::{Json, extract::State, response::IntoResponse};
use sqlx::PgPool;

use crate::{
    content::sanitize::sanitize_opt,
    error::AppError,
    models::activity::{Activity, PublicActivity},
};

pub(crate) fn to_public(activity: Activity) -> PublicActivity {
    PublicActivity {
        id: activity.id,
        title: activity.title,
        description: sanitize_opt(activity.description.as_deref()),
        icon_name: activity.icon_name,
        schedule_text: activity.schedule_text,
        highlighted: activity.highlighted,
    }
}

/// Lists active programs, highlighted ones first.
pub async fn list_activities(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let activities = sqlx::query_as::<_, Activity>(
        r#"
        SELECT id, title, description, icon_name, schedule_text, highlighted, active, created_at
        FROM activities
        WHERE active = TRUE
        ORDER BY highlighted DESC, created_at ASC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    let activities: Vec<PublicActivity> = activities.into_iter().map(to_public).collect();

    Ok(Json(activities))
}
