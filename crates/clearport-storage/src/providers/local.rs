//! Local filesystem document storage provider.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use clearport_core::error::{AppError, ErrorKind};
use clearport_core::result::AppResult;

use crate::DocumentStore;

/// Local filesystem document store.
#[derive(Debug, Clone)]
pub struct LocalDocumentStore {
    /// Root directory for all stored documents.
    root: PathBuf,
    /// Public base URL documents are served under.
    public_base_url: String,
}

impl LocalDocumentStore {
    /// Create a new local store rooted at the given path.
    pub async fn new(root_path: &str, public_base_url: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn resolve(&self, key: &str) -> PathBuf {
        let clean = key.trim_start_matches('/');
        self.root.join(clean)
    }

    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn put(&self, key: &str, data: Bytes, _content_type: &str) -> AppResult<String> {
        let full_path = self.resolve(key);
        self.ensure_parent(&full_path).await?;

        let mut file = fs::File::create(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create document: {}", full_path.display()),
                e,
            )
        })?;
        file.write_all(&data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write document: {}", full_path.display()),
                e,
            )
        })?;
        file.flush().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to flush document", e)
        })?;

        debug!(key, bytes = data.len(), "Stored document locally");
        Ok(format!("{}/{}", self.public_base_url, key.trim_start_matches('/')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_returns_public_url() {
        let dir = std::env::temp_dir().join(format!("clearport-test-{}", uuid::Uuid::new_v4()));
        let store = LocalDocumentStore::new(
            dir.to_str().expect("utf8 path"),
            "http://localhost:8080/documents/",
        )
        .await
        .expect("store");

        let url = store
            .put("shipments/abc/manifest.pdf", Bytes::from_static(b"%PDF"), "application/pdf")
            .await
            .expect("put");

        assert_eq!(url, "http://localhost:8080/documents/shipments/abc/manifest.pdf");
        let stored = tokio::fs::read(dir.join("shipments/abc/manifest.pdf"))
            .await
            .expect("read back");
        assert_eq!(stored, b"%PDF");
    }
}
