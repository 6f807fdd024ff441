//! Image host abstraction.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when uploading to the image host.
#[derive(Debug, Error)]
pub enum ImageStoreError {
    /// HTTP request failed (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Image host returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the image host response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// An image accepted by the image host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Durable reference URL.
    pub url: String,
    /// Host-specific identifier, if the host returns one.
    pub public_id: Option<String>,
}

/// Remote storage for restaurant images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Upload an image given as a `data:` URI.
    async fn upload(&self, data_uri: &str) -> Result<StoredImage, ImageStoreError>;
}
