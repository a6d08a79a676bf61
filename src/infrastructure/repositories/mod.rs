pub mod animal_repository;
pub mod elevenlabs_tts_repository;
pub mod firestore_animal_repository;
pub mod google_tts_repository;
pub mod storage_repository;
pub mod supabase_storage_repository;
pub mod tts_repository;

pub use animal_repository::{AnimalRepository, PersistenceError};
pub use elevenlabs_tts_repository::ElevenLabsTtsRepository;
pub use firestore_animal_repository::FirestoreAnimalRepository;
pub use google_tts_repository::GoogleTtsRepository;
pub use storage_repository::{StorageRepository, UploadError};
pub use supabase_storage_repository::SupabaseStorageRepository;
pub use tts_repository::{SynthesisError, TtsRepository};

use crate::infrastructure::config::{Config, TtsProvider};
use std::sync::Arc;

/// Build the TTS repository the configuration selected at startup
pub fn build_tts_repository(client: &reqwest::Client, config: &Config) -> Arc<dyn TtsRepository> {
    match &config.tts_provider {
        TtsProvider::ElevenLabs { api_key, voice_id } => Arc::new(ElevenLabsTtsRepository::new(
            client.clone(),
            config.elevenlabs_base_url.clone(),
            api_key.clone(),
            voice_id.clone(),
        )),
        TtsProvider::Google { slow } => Arc::new(GoogleTtsRepository::new(
            client.clone(),
            config.google_tts_base_url.clone(),
            *slow,
        )),
    }
}

/// Build the Supabase-backed storage repository
pub fn build_storage_repository(
    client: &reqwest::Client,
    config: &Config,
) -> Arc<dyn StorageRepository> {
    Arc::new(SupabaseStorageRepository::new(
        client.clone(),
        config.supabase_url.clone(),
        config.supabase_key.clone(),
        config.supabase_bucket.clone(),
    ))
}

/// Build the Firestore-backed animal repository
pub fn build_animal_repository(
    client: &reqwest::Client,
    config: &Config,
) -> Arc<dyn AnimalRepository> {
    Arc::new(FirestoreAnimalRepository::new(
        client.clone(),
        config.firestore_base_url.clone(),
        config.firestore_project_id.clone(),
        config.firestore_access_token.clone(),
    ))
}
