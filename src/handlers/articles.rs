// src/handlers/articles.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use sqlx::PgPool;

use crate::{
    content::{sanitize::sanitize_opt, text},
    error::AppError,
    models::article::{Article, ArticleListParams, PublicArticle},
};

/// Shapes a stored row for the public API: content re-sanitized on the way
/// out, plus a plain-text excerpt for list previews.
pub(crate) fn to_public(article: Article) -> PublicArticle {
    PublicArticle {
        id: article.id,
        title: article.title,
        slug: article.slug,
        excerpt: text::truncate_plain(article.content.as_deref(), text::EXCERPT_LENGTH),
        content: sanitize_opt(article.content.as_deref()),
        image_url: article.image_url,
        created_at: article.created_at,
    }
}

/// Lists published articles, newest first.
pub async fn list_articles(
    State(pool): State<PgPool>,
    Query(params): Query<ArticleListParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit.unwrap_or(20).clamp(1, 100);

    let articles = sqlx::query_as::<_, Article>(
        r#"
        SELECT id, title, slug, content, image_url, status, created_at, updated_at
        FROM articles
        WHERE status = 'published'
        ORDER BY created_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(&pool)
    .await?;

    let articles: Vec<PublicArticle> = articles.into_iter().map(to_public).collect();

    Ok(Json(articles))
}

/// Retrieves a single published article by slug.
pub async fn get_article(
    State(pool): State<PgPool>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let article = sqlx::query_as::<_, Article>(
        r#"
        SELECT id, title, slug, content, image_url, status, created_at, updated_at
        FROM articles
        WHERE slug = $1 AND status = 'published'
        "#,
    )
    .bind(&slug)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Article not found".to_string()))?;

    Ok(Json(to_public(article)))
}
