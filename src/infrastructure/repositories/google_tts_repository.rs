use super::tts_repository::{SynthesisError, TtsRepository};
use crate::domain::animal::Language;
use async_trait::async_trait;

/// The unofficial translate endpoint caps each request around 200 characters
const MAX_BATCH_SIZE: usize = 200;

/// Google Translate implementation of the TTS repository (free multilingual).
///
/// Text longer than the per-request cap is split on sentence boundaries and
/// the resulting MP3 chunks concatenated in order.
pub struct GoogleTtsRepository {
    client: reqwest::Client,
    base_url: String,
    slow: bool,
}

impl GoogleTtsRepository {
    pub fn new(client: reqwest::Client, base_url: String, slow: bool) -> Self {
        Self {
            client,
            base_url,
            slow,
        }
    }

    fn speed(&self) -> &'static str {
        // Same values the gTTS clients send for slow vs normal speech
        if self.slow {
            "0.24"
        } else {
            "1"
        }
    }

    fn batch_url(&self, batch: &str, language: Language) -> String {
        format!(
            "{}/translate_tts?ie=UTF-8&client=tw-ob&tl={}&ttsspeed={}&q={}",
            self.base_url,
            language,
            self.speed(),
            urlencoding::encode(batch)
        )
    }

    /// Call the endpoint for a single batch that fits the request cap
    async fn call_endpoint(
        &self,
        batch: &str,
        language: Language,
    ) -> Result<Vec<u8>, SynthesisError> {
        let response = self.client.get(self.batch_url(batch, language)).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                language = %language,
                batch_size = batch.len(),
                "Google TTS request failed"
            );
            return Err(SynthesisError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Split text into batches that respect sentence boundaries.
/// Each batch is at most `max_size` characters.
fn split_into_batches(text: &str, max_size: usize) -> Vec<String> {
    if text.len() <= max_size {
        return vec![text.to_string()];
    }

    let mut batches = Vec::new();
    let mut current_batch = String::new();

    // Split on sentence-ending punctuation
    let sentence_pattern = regex::Regex::new(r"([.!?]+\s+)").unwrap();
    let mut last_end = 0;

    for mat in sentence_pattern.find_iter(text) {
        let sentence = &text[last_end..mat.end()];

        // If adding this sentence would exceed the limit, save current batch
        if !current_batch.is_empty() && current_batch.len() + sentence.len() > max_size {
            batches.push(current_batch.trim().to_string());
            current_batch = String::new();
        }

        current_batch.push_str(sentence);
        last_end = mat.end();
    }

    // Handle remaining text after last sentence boundary
    if last_end < text.len() {
        let remaining = &text[last_end..];

        if !current_batch.is_empty() && current_batch.len() + remaining.len() > max_size {
            batches.push(current_batch.trim().to_string());
            current_batch = String::new();
        }

        // If remaining text itself is too large, split it by characters
        if remaining.len() > max_size {
            let chars: Vec<char> = remaining.chars().collect();
            for chunk in chars.chunks(max_size) {
                batches.push(chunk.iter().collect());
            }
        } else {
            current_batch.push_str(remaining);
        }
    }

    if !current_batch.is_empty() {
        batches.push(current_batch.trim().to_string());
    }

    batches
}

#[async_trait]
impl TtsRepository for GoogleTtsRepository {
    async fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>, SynthesisError> {
        if text.trim().is_empty() {
            return Err(SynthesisError::EmptyText);
        }

        let batches = split_into_batches(text, MAX_BATCH_SIZE);
        tracing::info!(
            language = %language,
            slow = self.slow,
            batch_count = batches.len(),
            text_length = text.len(),
            "Calling Google TTS"
        );

        let mut merged_audio = Vec::new();
        for (index, batch) in batches.iter().enumerate() {
            tracing::debug!(batch_index = index, batch_size = batch.len(), "Synthesizing batch");
            let audio = self.call_endpoint(batch, language).await?;
            merged_audio.extend(audio);
        }

        tracing::debug!(audio_size = merged_audio.len(), "Google TTS audio merged");

        Ok(merged_audio)
    }
}
