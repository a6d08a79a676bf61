use crate::domain::animal::{Animal, FieldKind};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Error reading or writing the animal collection.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("document {0} not found")]
    NotFound(String),

    #[error("document store rejected the request: HTTP {status}: {body}")]
    Store { status: u16, body: String },

    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("document store unreachable: {0}")]
    Network(#[from] reqwest::Error),
}

/// Repository for the `animals` collection of the document store.
#[async_trait]
pub trait AnimalRepository: Send + Sync {
    /// List every animal document in the collection
    async fn list_animals(&self) -> Result<Vec<Animal>, PersistenceError>;

    /// Merge-patch audio URL fields onto one document.
    ///
    /// Only the named fields are written; everything else on the document is
    /// left untouched. The id must be one previously returned by
    /// `list_animals`. Callers must pass a non-empty map.
    async fn update_audio_urls(
        &self,
        id: &str,
        urls: &BTreeMap<FieldKind, String>,
    ) -> Result<(), PersistenceError>;
}
