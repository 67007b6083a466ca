//! Token metadata builder
//!
//! Produces the `(key, value)` list passed to `mint`. The collection image is
//! downloaded once per builder and embedded as a base64 text blob.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use icrc7_types::{MetadataValue, TokenId, TokenMetadata};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;

/// Image used by the demo collection
pub const DEFAULT_IMAGE_URL: &str = "https://internetcomputer.org/img/IC_logo_horizontal.svg";

/// Remote asset download failures
#[derive(Debug, Error)]
pub enum AssetFetchError {
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },
}

/// Builds per-token mint metadata
#[derive(Debug)]
pub struct MetadataBuilder {
    http: reqwest::Client,
    image_url: Option<String>,
    image: OnceCell<Vec<u8>>,
}

impl MetadataBuilder {
    /// Builder embedding the image at `image_url`, or no image when `None`.
    pub fn new(image_url: Option<String>, fetch_timeout: Duration) -> Result<Self, AssetFetchError> {
        let http = reqwest::Client::builder()
            .timeout(fetch_timeout)
            .build()
            .map_err(AssetFetchError::Client)?;
        Ok(Self {
            http,
            image_url,
            image: OnceCell::new(),
        })
    }

    /// Builder that never touches the network
    pub fn without_image() -> Result<Self, AssetFetchError> {
        Self::new(None, Duration::from_secs(30))
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Metadata for `token_id`: name, description and, when configured, image.
    pub async fn build(&self, token_id: &TokenId) -> Result<TokenMetadata, AssetFetchError> {
        let mut metadata = vec![
            (
                "name".to_string(),
                MetadataValue::Text(format!("Test Name {}", token_id.0)),
            ),
            (
                "description".to_string(),
                MetadataValue::Text(format!("Test description {}", token_id.0)),
            ),
        ];

        if let Some(url) = &self.image_url {
            let bytes = self
                .image
                .get_or_try_init(|| self.fetch(url))
                .await?;
            metadata.push(("image".to_string(), encode_image(bytes)));
        }

        Ok(metadata)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetFetchError> {
        tracing::debug!(url, "Fetching metadata image");
        let request_error = |source| AssetFetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.http.get(url).send().await.map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(AssetFetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(request_error)?;
        tracing::debug!(url, bytes = body.len(), "Fetched metadata image");
        Ok(body.to_vec())
    }
}

/// Wrap image bytes as a blob holding their base64 text.
pub fn encode_image(bytes: &[u8]) -> MetadataValue {
    MetadataValue::Blob(STANDARD.encode(bytes).into_bytes())
}
