//! Cloudinary upload API client.
//!
//! Uploads are signed: the signed parameters (everything except `file` and
//! `api_key`) are sorted, joined as `key=value&...`, suffixed with the API
//! secret, and hashed with SHA-256.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::image_store::{ImageStore, ImageStoreError, StoredImage};
use crate::config::CloudinaryConfig;

/// Cloudinary API base URL.
const BASE_URL: &str = "https://api.cloudinary.com/v1_1";

/// Cloudinary upload API client.
#[derive(Clone)]
pub struct CloudinaryClient {
    client: reqwest::Client,
    upload_url: String,
    api_key: String,
    api_secret: SecretString,
    folder: Option<String>,
}

/// Successful upload response (fields we use).
#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
    public_id: Option<String>,
}

/// Error response body.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl CloudinaryClient {
    /// Create a new Cloudinary client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &CloudinaryConfig) -> Result<Self, ImageStoreError> {
        Self::with_base_url(config, BASE_URL)
    }

    /// Create a client that talks to `base_url` instead of the public API.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn with_base_url(config: &CloudinaryConfig, base_url: &str) -> Result<Self, ImageStoreError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            upload_url: format!(
                "{}/{}/image/upload",
                base_url.trim_end_matches('/'),
                config.cloud_name
            ),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            folder: config.folder.clone(),
        })
    }

    /// Parameters covered by the signature, sorted by key.
    fn signed_params(&self, timestamp: i64) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(2);
        if let Some(folder) = &self.folder {
            params.push(("folder", folder.clone()));
        }
        params.push(("timestamp", timestamp.to_string()));
        params.sort_by_key(|(key, _)| *key);
        params
    }
}

/// Compute the hex SHA-256 signature over sorted `params` and `secret`.
fn sign(params: &[(&str, String)], secret: &str) -> String {
    let joined = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl ImageStore for CloudinaryClient {
    async fn upload(&self, data_uri: &str) -> Result<StoredImage, ImageStoreError> {
        let timestamp = chrono::Utc::now().timestamp();
        let signed = self.signed_params(timestamp);
        let signature = sign(&signed, self.api_secret.expose_secret());

        let mut form: Vec<(&str, String)> = signed;
        form.push(("file", data_uri.to_owned()));
        form.push(("api_key", self.api_key.clone()));
        form.push(("signature_algorithm", "sha256".to_owned()));
        form.push(("signature", signature));

        let response = self.client.post(&self.upload_url).form(&form).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ImageStoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| ImageStoreError::Parse(e.to_string()))?;

        tracing::debug!(public_id = ?uploaded.public_id, "Uploaded image to Cloudinary");

        Ok(StoredImage {
            url: uploaded.url,
            public_id: uploaded.public_id,
        })
    }
}
