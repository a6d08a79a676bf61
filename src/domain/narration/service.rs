use super::spool::AudioSpool;
use crate::domain::animal::{Animal, FieldKind};
use crate::error::AppResult;
use crate::infrastructure::repositories::{AnimalRepository, StorageRepository, TtsRepository};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Final tally of one batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: u32,
    pub failed: u32,
}

/// How one record ended up.
///
/// `Skipped` and `NothingProduced` both tally as failures; they are kept
/// apart so the log says which one happened.
#[derive(Debug, PartialEq, Eq)]
enum RecordOutcome {
    /// The updater was called and succeeded
    Updated { fields: usize },
    /// No recognized field had usable text; the updater was never called
    Skipped,
    /// Every field failed synthesis or upload; the updater was never called
    NothingProduced,
}

/// Drives the per-record pipeline: synthesize each usable text field, upload
/// the audio, then merge-patch the collected URLs onto the record.
///
/// Failures are isolated per field and per record: a failed field is dropped
/// from the update, a failed record is tallied and iteration continues.
pub struct NarrationService {
    animal_repo: Arc<dyn AnimalRepository>,
    tts_repo: Arc<dyn TtsRepository>,
    storage_repo: Arc<dyn StorageRepository>,
    spool: Option<AudioSpool>,
}

impl NarrationService {
    pub fn new(
        animal_repo: Arc<dyn AnimalRepository>,
        tts_repo: Arc<dyn TtsRepository>,
        storage_repo: Arc<dyn StorageRepository>,
        spool: Option<AudioSpool>,
    ) -> Self {
        Self {
            animal_repo,
            tts_repo,
            storage_repo,
            spool,
        }
    }

    /// Process every animal in the collection, one at a time, and report the
    /// tally. Only the initial listing can fail the whole batch.
    pub async fn run(&self) -> AppResult<BatchSummary> {
        let animals = self.animal_repo.list_animals().await?;
        tracing::info!(count = animals.len(), "Starting narration batch");

        let mut summary = BatchSummary {
            succeeded: 0,
            failed: 0,
        };

        for animal in &animals {
            tracing::info!(animal_id = %animal.id, name = %animal.name, "Processing animal");

            match self.process_record(animal).await {
                Ok(RecordOutcome::Updated { fields }) => {
                    tracing::info!(animal_id = %animal.id, fields, "Animal updated");
                    summary.succeeded += 1;
                }
                Ok(RecordOutcome::Skipped) => {
                    tracing::warn!(animal_id = %animal.id, "No usable text fields, skipping");
                    summary.failed += 1;
                }
                Ok(RecordOutcome::NothingProduced) => {
                    tracing::warn!(animal_id = %animal.id, "Every field failed, nothing to update");
                    summary.failed += 1;
                }
                // Per-record boundary: nothing that happens to one record may
                // stop the rest of the batch.
                Err(e) => {
                    tracing::error!(animal_id = %animal.id, error = %e, "Animal processing failed");
                    summary.failed += 1;
                }
            }
        }

        self.cleanup_spool(&summary);

        tracing::info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Narration batch complete"
        );

        Ok(summary)
    }

    async fn process_record(&self, animal: &Animal) -> AppResult<RecordOutcome> {
        let fields = animal.narratable_fields();
        if fields.is_empty() {
            return Ok(RecordOutcome::Skipped);
        }

        let mut pending: BTreeMap<FieldKind, String> = BTreeMap::new();

        for (kind, text) in fields {
            let audio = match self.tts_repo.synthesize(text, kind.language).await {
                Ok(audio) => audio,
                Err(e) => {
                    tracing::warn!(
                        animal_id = %animal.id,
                        field = %kind,
                        error = %e,
                        "Synthesis failed, field omitted"
                    );
                    continue;
                }
            };

            // Local copy only; the upload below works from memory
            if let Some(spool) = &self.spool {
                if let Err(e) = spool.write(&kind.file_name(&animal.id), &audio) {
                    tracing::warn!(
                        animal_id = %animal.id,
                        field = %kind,
                        error = %e,
                        "Spool write failed"
                    );
                }
            }

            match self
                .storage_repo
                .upload(&audio, &kind.storage_key(&animal.id))
                .await
            {
                Ok(url) => {
                    pending.insert(kind, url);
                }
                Err(e) => {
                    tracing::warn!(
                        animal_id = %animal.id,
                        field = %kind,
                        error = %e,
                        "Upload failed, field omitted"
                    );
                }
            }
        }

        if pending.is_empty() {
            return Ok(RecordOutcome::NothingProduced);
        }

        let fields = pending.len();
        self.animal_repo
            .update_audio_urls(&animal.id, &pending)
            .await?;

        Ok(RecordOutcome::Updated { fields })
    }

    /// Best-effort removal of the run's spool directory, only once something
    /// succeeded; failure is reported and otherwise ignored.
    fn cleanup_spool(&self, summary: &BatchSummary) {
        let Some(spool) = &self.spool else { return };
        if summary.succeeded == 0 {
            tracing::info!(dir = %spool.path().display(), "No successes, keeping spool directory");
            return;
        }
        if let Err(e) = spool.cleanup() {
            tracing::warn!(
                dir = %spool.path().display(),
                error = %e,
                "Failed to remove spool directory"
            );
        }
    }
}
