//! Document storage: uploaded customs documents go through a
//! [`DocumentStore`] and are referenced by public URL afterwards.

pub mod manager;
pub mod providers;

use async_trait::async_trait;
use bytes::Bytes;

use clearport_core::result::AppResult;

/// Stores an uploaded document and returns the public URL it will be
/// served under.
///
/// Uploads happen before the enclosing database transaction touches any
/// status field, so a failed upload aborts the mutation cleanly.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    /// Provider name for logging.
    fn provider_type(&self) -> &str;

    /// Store a document under the given key and return its public URL.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<String>;
}
