use super::tts_repository::{SynthesisError, TtsRepository};
use crate::domain::animal::Language;
use async_trait::async_trait;
use serde::Serialize;

/// Model that supports both English and Indonesian
const MODEL_ID: &str = "eleven_multilingual_v2";

/// ElevenLabs implementation of the TTS repository (paid neural voices).
///
/// The voice is fixed at construction; the multilingual model picks up the
/// language from the text itself, so the language selector only shows up in
/// logs here.
pub struct ElevenLabsTtsRepository {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    voice_id: String,
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
    style: f32,
    use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
            style: 0.0,
            use_speaker_boost: true,
        }
    }
}

impl ElevenLabsTtsRepository {
    pub fn new(client: reqwest::Client, base_url: String, api_key: String, voice_id: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
            voice_id,
        }
    }

    fn synthesis_url(&self) -> String {
        format!("{}/v1/text-to-speech/{}", self.base_url, self.voice_id)
    }
}

#[async_trait]
impl TtsRepository for ElevenLabsTtsRepository {
    async fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>, SynthesisError> {
        if text.trim().is_empty() {
            return Err(SynthesisError::EmptyText);
        }

        let request = SynthesisRequest {
            text,
            model_id: MODEL_ID,
            voice_settings: VoiceSettings::default(),
        };

        tracing::info!(
            voice_id = %self.voice_id,
            model = MODEL_ID,
            language = %language,
            text_length = text.len(),
            "Calling ElevenLabs text-to-speech"
        );

        let response = self
            .client
            .post(self.synthesis_url())
            .header("xi-api-key", &self.api_key)
            .header("Accept", "audio/mpeg")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                body = %body,
                "ElevenLabs synthesis failed"
            );
            return Err(SynthesisError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let audio = response.bytes().await?.to_vec();
        tracing::debug!(audio_size = audio.len(), "ElevenLabs audio received");

        Ok(audio)
    }
}
