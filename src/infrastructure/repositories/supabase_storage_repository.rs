use super::storage_repository::{StorageRepository, UploadError};
use async_trait::async_trait;

/// Supabase Storage implementation of the storage repository.
///
/// Objects land under a single bucket; the public URL is derived from the
/// project base URL, bucket and key once the store confirms the upload.
pub struct SupabaseStorageRepository {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl SupabaseStorageRepository {
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        service_key: String,
        bucket: String,
    ) -> Self {
        Self {
            client,
            base_url,
            service_key,
            bucket,
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, key)
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, key
        )
    }
}

#[async_trait]
impl StorageRepository for SupabaseStorageRepository {
    async fn upload(&self, bytes: &[u8], key: &str) -> Result<String, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::EmptyBuffer);
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = bytes.len(),
            "Uploading audio to Supabase Storage"
        );

        let response = self
            .client
            .post(self.object_url(key))
            .bearer_auth(&self.service_key)
            .header("Content-Type", "audio/mpeg")
            .body(bytes.to_vec())
            .send()
            .await?;

        let status = response.status();
        // Supabase returns 200 or 201 depending on the storage-api version
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                key = %key,
                body = %body,
                "Supabase upload failed"
            );
            return Err(UploadError::Store {
                status: status.as_u16(),
                body,
            });
        }

        let url = self.public_url(key);
        tracing::debug!(url = %url, "Upload confirmed");

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_bytes, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_repository(server: &MockServer) -> SupabaseStorageRepository {
        SupabaseStorageRepository::new(
            reqwest::Client::new(),
            server.uri(),
            "service-key".to_string(),
            "faunadex-audio".to_string(),
        )
    }

    #[tokio::test]
    async fn test_upload_returns_public_url() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/storage/v1/object/faunadex-audio/audio/descriptions/a1_en.mp3"))
            .and(header("authorization", "Bearer service-key"))
            .and(header("content-type", "audio/mpeg"))
            .and(body_bytes(vec![9u8; 32]))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Key": "faunadex-audio/audio/descriptions/a1_en.mp3"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let repo = test_repository(&server);
        let url = repo
            .upload(&[9u8; 32], "audio/descriptions/a1_en.mp3")
            .await
            .unwrap();

        assert_eq!(
            url,
            format!(
                "{}/storage/v1/object/public/faunadex-audio/audio/descriptions/a1_en.mp3",
                server.uri()
            )
        );
    }

    #[tokio::test]
    async fn test_upload_accepts_201_created() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let repo = test_repository(&server);
        assert!(repo.upload(&[1u8; 4], "audio/test/x.mp3").await.is_ok());
    }

    #[tokio::test]
    async fn test_upload_propagates_store_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": "Internal", "message": "bucket unavailable"
            })))
            .mount(&server)
            .await;

        let repo = test_repository(&server);
        let err = repo
            .upload(&[1u8; 4], "audio/test/x.mp3")
            .await
            .unwrap_err();

        match err {
            UploadError::Store { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("bucket unavailable"));
            }
            other => panic!("expected Store error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_buffer_locally() {
        let server = MockServer::start().await;
        let repo = test_repository(&server);

        let result = repo.upload(&[], "audio/test/x.mp3").await;

        assert!(matches!(result, Err(UploadError::EmptyBuffer)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
