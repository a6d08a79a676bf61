use faunadex_audio::domain::narration::{AudioSpool, NarrationService};
use faunadex_audio::infrastructure::config::{Config, LogFormat};
use faunadex_audio::infrastructure::repositories::{
    build_animal_repository, build_storage_repository, build_tts_repository,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration; missing variables abort before any record is read
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        provider = config.tts_provider.name(),
        bucket = %config.supabase_bucket,
        project = %config.firestore_project_id,
        "Starting FaunaDex audio batch"
    );

    // One HTTP client for every integration, with an explicit timeout
    let client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()?;

    let animal_repo = build_animal_repository(&client, &config);
    let tts_repo = build_tts_repository(&client, &config);
    let storage_repo = build_storage_repository(&client, &config);

    let spool = match AudioSpool::create(&config.work_dir) {
        Ok(spool) => Some(spool),
        Err(e) => {
            tracing::warn!(
                dir = %config.work_dir,
                error = %e,
                "Could not create work directory, keeping audio in memory only"
            );
            None
        }
    };

    let service = NarrationService::new(animal_repo, tts_repo, storage_repo, spool);
    let summary = service.run().await?;

    tracing::info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Batch finished"
    );

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "faunadex_audio=info".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "faunadex_audio=info".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
