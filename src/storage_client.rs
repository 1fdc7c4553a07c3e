use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;
use time::OffsetDateTime;

/// Client for the S3-compatible object store holding book files and covers.
///
/// Uploads are upsert-by-key: re-uploading the same key overwrites the object
/// and keeps its public URL stable.
#[derive(Clone)]
pub struct StorageClient {
    http_client: Client,
    base_url: String,
    bucket: String,
    api_key: Secret<String>,
}

impl StorageClient {
    pub fn new(
        base_url: String,
        bucket: String,
        api_key: Secret<String>,
        timeout: Duration,
    ) -> Self {
        let http_client = Client::builder().timeout(timeout).build().unwrap();

        Self {
            http_client,
            base_url,
            bucket,
            api_key,
        }
    }

    /// Keys are `{kind}/{owner_id}/{unix_millis}-{original_name}`, so two
    /// uploads of the same file by the same owner never collide.
    pub fn object_key(kind: &str, owner_id: uuid::Uuid, original_name: &str) -> String {
        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        format!("{kind}/{owner_id}/{millis}-{original_name}")
    }

    #[tracing::instrument(name = "Upload object", skip(self, bytes))]
    pub async fn upload(&self, key: &str, bytes: Vec<u8>) -> Result<String, StorageError> {
        let url = format!("{}/object/{}/{}", self.base_url, self.bucket, key);

        self.http_client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .header("x-upsert", "true")
            .header("Content-Type", "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| StorageError::UploadFailed {
                key: key.into(),
                source,
            })?;

        Ok(self.public_url(key))
    }

    /// Public URLs are derived from the key, no round-trip needed.
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/object/public/{}/{}", self.base_url, self.bucket, key)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to upload `{key}`")]
    UploadFailed {
        key: String,
        #[source]
        source: reqwest::Error,
    },
}
