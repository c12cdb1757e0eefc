use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::models::SessionKey;
use crate::domain::models::SessionStore;

/// Process-local session store. Nothing survives a restart.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: DashMap<String, String>,
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    #[allow(clippy::implicit_return)]
    async fn get(&self, key: SessionKey) -> Option<String> {
        return self
            .entries
            .get(&key.to_string())
            .map(|val| return val.to_string());
    }

    #[allow(clippy::implicit_return)]
    async fn set(&self, key: SessionKey, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn remove(&self, key: SessionKey) -> Result<()> {
        self.entries.remove(&key.to_string());
        return Ok(());
    }
}
