//! S3-compatible document storage provider.

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use clearport_core::error::{AppError, ErrorKind};
use clearport_core::result::AppResult;

use crate::DocumentStore;

/// S3-backed document store.
#[derive(Debug, Clone)]
pub struct S3DocumentStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3DocumentStore {
    /// Create a new S3 store from the ambient AWS credential chain.
    pub async fn new(bucket: &str, region: &str, public_base_url: &str) -> AppResult<Self> {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;
        let client = aws_sdk_s3::Client::new(&config);

        let public_base_url = if public_base_url.is_empty() {
            format!("https://{bucket}.s3.{region}.amazonaws.com")
        } else {
            public_base_url.trim_end_matches('/').to_string()
        };

        Ok(Self {
            client,
            bucket: bucket.to_string(),
            public_base_url,
        })
    }
}

#[async_trait]
impl DocumentStore for S3DocumentStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<String> {
        let key = key.trim_start_matches('/');
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(aws_sdk_s3::primitives::ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to upload document to s3://{}/{key}", self.bucket),
                    e,
                )
            })?;

        debug!(key, bucket = %self.bucket, "Stored document in S3");
        Ok(format!("{}/{key}", self.public_base_url))
    }
}
