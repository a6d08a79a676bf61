use crate::domain::animal::Language;
use async_trait::async_trait;

/// Error synthesizing one piece of text.
///
/// Recovered at field granularity by the pipeline: the field is omitted from
/// the record update, never retried here.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("empty text cannot be synthesized")]
    EmptyText,

    #[error("TTS provider rejected the request: HTTP {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("TTS provider unreachable: {0}")]
    Network(#[from] reqwest::Error),
}

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (ElevenLabs, Google Translate, etc.)
///
/// Implementations are responsible for:
/// - Handling provider-specific text length limitations
/// - Splitting text into batches if needed
/// - Merging audio chunks into a single audio stream
/// - Provider-specific voice selection
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize text to speech for a given language
    ///
    /// Returns merged audio data ready for upload (MP3 format)
    ///
    /// # Errors
    /// Returns error if synthesis fails or the provider is unavailable.
    /// Never retries internally; failures propagate to the caller.
    async fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>, SynthesisError>;
}
