// src/handlers/upload.rs

use axum::{Json, extract::Multipart, extract::State, response::IntoResponse};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

/// Size ceiling for editor image uploads.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Accepts a multipart image upload for the rich text editor.
///
/// Validation happens before the object store is touched: only `image/*`
/// content types, at most 5 MiB. Accepted files are stored under a
/// collision-resistant key and the public URL is returned, so a failure at
/// any point inserts nothing.
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::BadRequest("Malformed multipart request".to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            return Err(AppError::BadRequest("File must be an image".to_string()));
        }

        let file_name = field.file_name().unwrap_or_default().to_string();

        let data = field
            .bytes()
            .await
            .map_err(|_| AppError::BadRequest("Failed to read uploaded file".to_string()))?;

        if data.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }
        if data.len() > MAX_IMAGE_BYTES {
            return Err(AppError::BadRequest(
                "Image exceeds the 5 MiB size limit".to_string(),
            ));
        }

        let key = object_key(&file_name);
        let url = state.store.put(&key, &data).await?;

        tracing::info!("Uploaded editor image as {}", key);
        return Ok(Json(json!({ "url": url })));
    }

    Err(AppError::BadRequest(
        "Multipart request has no 'file' field".to_string(),
    ))
}

/// Builds a collision-resistant object key: timestamp plus a random
/// suffix, keeping the original extension when it looks sane.
fn object_key(file_name: &str) -> String {
    let ext = file_name
        .rsplit('.')
        .next()
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= 5
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
                && !file_name.starts_with('.')
                && file_name.contains('.')
        })
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| "bin".to_string());

    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "editor/{}-{}.{}",
        Utc::now().timestamp_millis(),
        &suffix[..8],
        ext
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_key_keeps_sane_extensions() {
        let key = object_key("photo.JPG");
        assert!(key.starts_with("editor/"));
        assert!(key.ends_with(".jpg"));
    }

    #[test]
    fn object_key_defaults_odd_names_to_bin() {
        assert!(object_key("noextension").ends_with(".bin"));
        assert!(object_key(".hidden").ends_with(".bin"));
        assert!(object_key("weird.ex!t").ends_with(".bin"));
        assert!(object_key("").ends_with(".bin"));
    }

    #[test]
    fn object_keys_do_not_collide() {
        assert_ne!(object_key("a.png"), object_key("a.png"));
    }
}
