//! Document store construction from configuration.

use std::sync::Arc;

use tracing::info;

use clearport_core::config::storage::StorageConfig;
use clearport_core::error::AppError;
use clearport_core::result::AppResult;

use crate::DocumentStore;
use crate::providers::local::LocalDocumentStore;
use crate::providers::s3::S3DocumentStore;

/// Build the configured document store.
pub async fn build_document_store(config: &StorageConfig) -> AppResult<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = match config.provider.as_str() {
        "local" => Arc::new(
            LocalDocumentStore::new(&config.local.root, &config.local.public_base_url).await?,
        ),
        "s3" => Arc::new(
            S3DocumentStore::new(
                &config.s3.bucket,
                &config.s3.region,
                &config.s3.public_base_url,
            )
            .await?,
        ),
        other => {
            return Err(AppError::configuration(format!(
                "Unknown storage provider: '{other}'. Expected 'local' or 's3'"
            )));
        }
    };

    info!(provider = store.provider_type(), "Document store initialized");
    Ok(store)
}
