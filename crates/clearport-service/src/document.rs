//! Uploaded document payloads handed to services.

use bytes::Bytes;

/// A decoded document ready to be handed to the [`DocumentStore`].
///
/// [`DocumentStore`]: clearport_storage::DocumentStore
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    /// Original file name, used as the tail of the storage key.
    pub file_name: String,
    /// MIME type reported by the client.
    pub content_type: String,
    /// Raw document bytes.
    pub data: Bytes,
}

impl DocumentUpload {
    /// File name with path separators stripped, safe to embed in a
    /// storage key.
    pub fn safe_file_name(&self) -> String {
        self.file_name.replace(['/', '\\'], "_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_file_name_strips_separators() {
        let doc = DocumentUpload {
            file_name: "../etc/passwd".into(),
            content_type: "text/plain".into(),
            data: Bytes::new(),
        };
        assert_eq!(doc.safe_file_name(), ".._etc_passwd");
    }
}
