//! Configuration handling for the sign-up form

use crate::state::{DEFAULT_EMAIL_DOMAIN, DEFAULT_MAX_AVATAR_BYTES};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Bucket the avatar is uploaded to unless configured otherwise
pub const DEFAULT_BUCKET: &str = "react-form";

/// Default HTTP timeout for the upload request
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// User configuration for the form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SignupConfig {
    /// Base URL of the storage service, e.g. `https://xyz.supabase.co`
    pub storage_url: Option<String>,
    /// API key sent with storage requests
    pub api_key: Option<String>,
    /// Bucket that receives avatar uploads
    pub bucket: String,
    /// Required email suffix
    pub email_domain: String,
    /// Largest accepted avatar, in bytes
    pub max_avatar_bytes: u64,
    /// Upload request timeout
    pub request_timeout_secs: u64,
}

impl Default for SignupConfig {
    fn default() -> Self {
        Self {
            storage_url: None,
            api_key: None,
            bucket: DEFAULT_BUCKET.to_string(),
            email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
            max_avatar_bytes: DEFAULT_MAX_AVATAR_BYTES,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl SignupConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "signup", "signup-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the config file, then apply environment overrides.
    ///
    /// On first run the file is created with defaults so it can be edited.
    pub fn load() -> Result<Self> {
        let config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            Some(path) => {
                let config = Self::default();
                if let Err(e) = config.save_to(&path) {
                    tracing::warn!("Could not write default config to {}: {e}", path.display());
                }
                config
            }
            None => Self::default(),
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Load configuration from a specific file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Apply `SIGNUP_*` overrides looked up through `lookup`
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty("SIGNUP_STORAGE_URL") {
            self.storage_url = Some(url);
        }
        if let Some(key) = non_empty("SIGNUP_STORAGE_KEY") {
            self.api_key = Some(key);
        }
        if let Some(bucket) = non_empty("SIGNUP_STORAGE_BUCKET") {
            self.bucket = bucket;
        }
        if let Some(domain) = non_empty("SIGNUP_EMAIL_DOMAIN") {
            self.email_domain = domain;
        }
        if let Some(raw) = non_empty("SIGNUP_MAX_AVATAR_BYTES") {
            match raw.trim().parse() {
                Ok(bytes) => self.max_avatar_bytes = bytes,
                Err(_) => tracing::warn!("Ignoring invalid SIGNUP_MAX_AVATAR_BYTES={raw}"),
            }
        }
        self
    }
}
