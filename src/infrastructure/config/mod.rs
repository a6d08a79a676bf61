use crate::error::AppError;
use std::env;
use std::time::Duration;

const DEFAULT_BUCKET: &str = "faunadex-audio";
const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM"; // Rachel - mature, engaging
const DEFAULT_ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io";
const DEFAULT_GOOGLE_TTS_BASE_URL: &str = "https://translate.google.com";
const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// TTS provider selected at startup.
///
/// An explicit tagged choice: which provider runs is decided here once, never
/// inferred downstream from which credentials happen to be set.
#[derive(Debug, Clone, PartialEq)]
pub enum TtsProvider {
    /// ElevenLabs neural voices (paid)
    ElevenLabs { api_key: String, voice_id: String },
    /// Google Translate TTS (free)
    Google { slow: bool },
}

impl TtsProvider {
    /// Provider name safe for logging (no credentials)
    pub fn name(&self) -> &'static str {
        match self {
            TtsProvider::ElevenLabs { .. } => "elevenlabs",
            TtsProvider::Google { .. } => "google",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub tts_provider: TtsProvider,
    pub elevenlabs_base_url: String,
    pub google_tts_base_url: String,
    pub supabase_url: String,
    pub supabase_key: String,
    pub supabase_bucket: String,
    pub firestore_base_url: String,
    pub firestore_project_id: String,
    pub firestore_access_token: String,
    pub http_timeout: Duration,
    pub work_dir: String,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let tts_provider = match env::var("TTS_PROVIDER")
            .unwrap_or_else(|_| "elevenlabs".to_string())
            .to_lowercase()
            .as_str()
        {
            "elevenlabs" => TtsProvider::ElevenLabs {
                api_key: required("ELEVENLABS_API_KEY")?,
                voice_id: env::var("ELEVENLABS_VOICE_ID")
                    .unwrap_or_else(|_| DEFAULT_VOICE_ID.to_string()),
            },
            "google" => TtsProvider::Google {
                slow: env::var("GOOGLE_TTS_SLOW")
                    .map(|s| s.to_lowercase() == "true")
                    .unwrap_or(false),
            },
            other => {
                return Err(AppError::Configuration(format!(
                    "unknown TTS_PROVIDER '{other}' (expected 'elevenlabs' or 'google')"
                )))
            }
        };

        let config = Config {
            tts_provider,
            elevenlabs_base_url: env::var("ELEVENLABS_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_ELEVENLABS_BASE_URL.to_string()),
            google_tts_base_url: env::var("GOOGLE_TTS_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GOOGLE_TTS_BASE_URL.to_string()),
            supabase_url: required("SUPABASE_URL")?,
            supabase_key: required("SUPABASE_KEY")?,
            supabase_bucket: env::var("SUPABASE_BUCKET")
                .unwrap_or_else(|_| DEFAULT_BUCKET.to_string()),
            firestore_base_url: env::var("FIRESTORE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_FIRESTORE_BASE_URL.to_string()),
            firestore_project_id: required("FIRESTORE_PROJECT_ID")?,
            firestore_access_token: required("FIRESTORE_ACCESS_TOKEN")?,
            http_timeout: Duration::from_secs(
                env::var("HTTP_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration(
                            "HTTP_TIMEOUT_SECS must be an integer number of seconds".to_string(),
                        )
                    })?,
            ),
            work_dir: env::var("WORK_DIR").unwrap_or_else(|_| "temp_audio".to_string()),
            log_format: env::var("LOG_FORMAT")
                .map(|s| match s.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })
                .unwrap_or(LogFormat::Pretty),
        };

        Ok(config)
    }
}

fn required(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| {
        AppError::Configuration(format!("missing required environment variable {name}"))
    })
}
