// src/handlers/schedules.rs

use axum::{Json, extract::State, response::IntoResponse};
use sqlx::PgPool;

use crate::{
    content::sanitize::sanitize_opt,
    error::AppError,
    models::schedule::{PublicSchedule, Schedule},
};

pub(crate) fn to_public(schedule: Schedule) -> PublicSchedule {
    PublicSchedule {
        id: schedule.id,
        event_name: schedule.event_name,
        event_date: schedule.event_date,
        event_time: schedule.event_time,
        location: schedule.location,
        description: sanitize_opt(schedule.description.as_deref()),
    }
}

/// Lists event schedules, soonest first.
pub async fn list_schedules(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let schedules = sqlx::query_as::<_, Schedule>(
        r#"
        SELECT id, event_name, event_date, event_time, location, description, created_at
        FROM schedules
        ORDER BY event_date ASC, event_time ASC NULLS LAST
        "#,
    )
    .fetch_all(&pool)
    .await?;

    let schedules: Vec<PublicSchedule> = schedules.into_iter().map(to_public).collect();

    Ok(Json(schedules))
}
