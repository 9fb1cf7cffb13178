//! Document storage configuration.

use serde::{Deserialize, Serialize};

/// Document storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage provider: `"local"` or `"s3"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Local provider settings.
    #[serde(default)]
    pub local: LocalStorageConfig,
    /// S3 provider settings.
    #[serde(default)]
    pub s3: S3StorageConfig,
}

/// Local filesystem document storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root directory for stored documents.
    #[serde(default = "default_root")]
    pub root: String,
    /// Public base URL under which stored documents are served.
    #[serde(default = "default_base_url")]
    pub public_base_url: String,
}

/// S3-compatible document storage.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct S3StorageConfig {
    /// Bucket name.
    #[serde(default)]
    pub bucket: String,
    /// AWS region.
    #[serde(default)]
    pub region: String,
    /// Public base URL (e.g. a CDN in front of the bucket). Empty means
    /// the standard virtual-hosted bucket URL.
    #[serde(default)]
    pub public_base_url: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            public_base_url: default_base_url(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_root() -> String {
    "data/documents".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8080/documents".to_string()
}
