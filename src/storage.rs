// src/storage.rs

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use url::Url;

use crate::error::AppError;

/// Where uploaded binaries go. The seam exists so the handlers do not care
/// whether bytes land on the local disk or in a hosted bucket; the
/// filesystem implementation below is the one the server wires in.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `bytes` under `key` and returns a publicly resolvable URL.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String, AppError>;
}

/// Filesystem-backed store. Files are written under `root` and served by
/// the static file route at `{public_origin}/uploads/{key}`.
pub struct FsStore {
    root: PathBuf,
    public_origin: Url,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>, public_origin: Url) -> Self {
        Self {
            root: root.into(),
            public_origin,
        }
    }
}

#[async_trait]
impl ObjectStore for FsStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String, AppError> {
        // Keys are generated internally, but never let one escape the root.
        let relative = Path::new(key);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(AppError::BadRequest("Invalid object key".to_string()));
        }

        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::InternalServerError(e.to_string()))?;
        }

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        let mut url = self.public_origin.clone();
        url.set_path(&format!("uploads/{}", key));
        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (FsStore, PathBuf) {
        let root = std::env::temp_dir().join(format!("fsstore-test-{}", uuid::Uuid::new_v4()));
        let store = FsStore::new(
            root.clone(),
            Url::parse("http://localhost:3000").unwrap(),
        );
        (store, root)
    }

    #[tokio::test]
    async fn put_writes_file_and_returns_public_url() {
        let (store, root) = temp_store();

        let url = store.put("editor/a.png", b"png-bytes").await.unwrap();
        assert_eq!(url, "http://localhost:3000/uploads/editor/a.png");

        let on_disk = tokio::fs::read(root.join("editor/a.png")).await.unwrap();
        assert_eq!(on_disk, b"png-bytes");

        tokio::fs::remove_dir_all(root).await.unwrap();
    }

    #[tokio::test]
    async fn put_rejects_traversal_keys() {
        let (store, _root) = temp_store();

        let err = store.put("../escape.png", b"x").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
