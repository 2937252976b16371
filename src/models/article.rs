// src/models/article.rs

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

use crate::content::SanitizedHtml;

/// Represents the 'articles' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,

    pub title: String,

    /// URL-safe identifier, unique across articles.
    pub slug: String,

    /// Rich HTML body. Sanitized before every write and again before it is
    /// served as markup.
    pub content: Option<String>,

    pub image_url: Option<String>,

    /// 'draft' or 'published'. Only published articles appear publicly.
    pub status: String,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Public view of an article: content re-sanitized, plus a plain-text
/// excerpt for list previews.
#[derive(Debug, Serialize)]
pub struct PublicArticle {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: Option<SanitizedHtml>,
    pub image_url: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

pub static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap());

/// DTO for creating a new article.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateArticleRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(
        length(min = 1, max = 200),
        regex(path = *SLUG_RE, message = "Slug must be lowercase letters, digits and dashes")
    )]
    pub slug: String,
    #[validate(length(max = 100000))]
    pub content: Option<String>,
    #[validate(length(max = 500))]
    pub image_url: Option<String>,
    #[validate(custom(function = validate_status))]
    pub status: String,
}

/// DTO for updating an article. Fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateArticleRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(
        length(min = 1, max = 200),
        regex(path = *SLUG_RE, message = "Slug must be lowercase letters, digits and dashes")
    )]
    pub slug: Option<String>,
    #[validate(length(max = 100000))]
    pub content: Option<String>,
    #[validate(length(max = 500))]
    pub image_url: Option<String>,
    #[validate(custom(function = validate_status))]
    pub status: Option<String>,
}

/// Query parameters for listing published articles.
#[derive(Debug, Deserialize)]
pub struct ArticleListParams {
    /// Number of items to return (default: 20, max: 100).
    pub limit: Option<i64>,
}

fn validate_status(status: &str) -> Result<(), validator::ValidationError> {
    if status != "draft" && status != "published" {
        return Err(validator::ValidationError::new("invalid_status"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_pattern_accepts_kebab_case_only() {
        assert!(SLUG_RE.is_match("kajian-ramadhan-2025"));
        assert!(SLUG_RE.is_match("a"));
        assert!(!SLUG_RE.is_match("Trailing-"));
        assert!(!SLUG_RE.is_match("-leading"));
        assert!(!SLUG_RE.is_match("no spaces"));
        assert!(!SLUG_RE.is_match("UpperCase"));
        assert!(!SLUG_RE.is_match(""));
    }
}
