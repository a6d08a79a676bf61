use async_trait::async_trait;

/// Error uploading an audio artifact to the object store.
///
/// Recovered at field granularity by the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("empty buffer cannot be uploaded")]
    EmptyBuffer,

    #[error("object store rejected the upload: HTTP {status}: {body}")]
    Store { status: u16, body: String },

    #[error("object store unreachable: {0}")]
    Network(#[from] reqwest::Error),
}

/// Repository for object-storage uploads.
///
/// Keys are opaque caller-constructed paths; last write for a key wins.
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// Upload raw audio bytes under the given key and return the public URL.
    ///
    /// The URL is derived only after the store confirms the upload.
    async fn upload(&self, bytes: &[u8], key: &str) -> Result<String, UploadError>;
}
