//! Trait abstraction for the storage client to enable mocking in tests

use anyhow::Result;
use async_trait::async_trait;

/// Trait for object storage operations, enabling mocking in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageClientTrait: Send + Sync {
    /// Whether the client has enough configuration to attempt an upload
    fn is_configured(&self) -> bool;

    /// Store `content` under `object_key` in `bucket`
    async fn upload(&self, bucket: &str, object_key: &str, content: Vec<u8>) -> Result<()>;
}
