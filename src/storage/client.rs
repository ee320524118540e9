//! HTTP client for a Supabase-compatible storage API
//!
//! Objects are created with `POST {base}/storage/v1/object/{bucket}/{key}`,
//! the raw file bytes as the body and the API key as bearer token.

use super::traits::StorageClientTrait;
use crate::config::SignupConfig;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Cache lifetime attached to uploaded objects, in seconds
const CACHE_CONTROL: &str = "3600";

/// Errors from the storage service
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is not configured (set SIGNUP_STORAGE_URL and SIGNUP_STORAGE_KEY)")]
    NotConfigured,
    #[error("object key must not be empty")]
    EmptyKey,
    #[error("storage request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("storage returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Client for uploading objects to the storage service
pub struct StorageClient {
    client: Client,
    base_url: Option<String>,
    api_key: Option<String>,
}

impl StorageClient {
    /// Create a new storage client from configuration
    pub fn new(config: &SignupConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config
                .storage_url
                .as_ref()
                .map(|url| url.trim_end_matches('/').to_string()),
            api_key: config.api_key.clone(),
        })
    }

    /// Build the object URL, percent-encoding each key segment
    fn object_url(&self, bucket: &str, object_key: &str) -> Result<String, StorageError> {
        let base = self.base_url.as_deref().ok_or(StorageError::NotConfigured)?;
        let key = object_key.trim_start_matches('/');
        if key.is_empty() {
            return Err(StorageError::EmptyKey);
        }
        let encoded: Vec<String> = key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        Ok(format!(
            "{base}/storage/v1/object/{}/{}",
            urlencoding::encode(bucket),
            encoded.join("/")
        ))
    }

    async fn put_object(
        &self,
        bucket: &str,
        object_key: &str,
        content: Vec<u8>,
    ) -> Result<(), StorageError> {
        let url = self.object_url(bucket, object_key)?;
        let api_key = self.api_key.as_deref().ok_or(StorageError::NotConfigured)?;
        let content_type = mime_guess::from_path(object_key).first_or_octet_stream();

        tracing::debug!(%url, bytes = content.len(), %content_type, "Uploading object");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("apikey", api_key)
            .header("Content-Type", content_type.essence_str())
            .header("Cache-Control", format!("max-age={CACHE_CONTROL}"))
            .header("x-upsert", "false")
            .body(content)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Status { status, body });
        }

        Ok(())
    }
}

#[async_trait]
impl StorageClientTrait for StorageClient {
    fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.api_key.is_some()
    }

    async fn upload(&self, bucket: &str, object_key: &str, content: Vec<u8>) -> Result<()> {
        self.put_object(bucket, object_key, content).await?;
        tracing::info!(bucket, object_key, "Uploaded object");
        Ok(())
    }
}
