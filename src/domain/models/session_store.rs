use anyhow::Result;
use async_trait::async_trait;

use super::SessionKey;

pub type SessionStoreBox = Box<dyn SessionStore + Send + Sync>;

/// Durable key-value storage for the session fields.
#[async_trait]
pub trait SessionStore {
    async fn get(&self, key: SessionKey) -> Option<String>;

    async fn set(&self, key: SessionKey, value: &str) -> Result<()>;

    async fn remove(&self, key: SessionKey) -> Result<()>;
}
