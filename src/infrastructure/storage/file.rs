#[cfg(test)]
#[path = "file_test.rs"]
mod tests;

use std::collections::BTreeMap;
use std::path;

use anyhow::Result;
use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::SessionKey;
use crate::domain::models::SessionStore;

/// Session store persisted as a small YAML document.
pub struct FileSessionStore {
    pub file_path: path::PathBuf,
}

impl Default for FileSessionStore {
    fn default() -> FileSessionStore {
        return FileSessionStore::new(path::PathBuf::from(Config::get(ConfigKey::SessionFile)));
    }
}

impl FileSessionStore {
    pub fn new(file_path: path::PathBuf) -> FileSessionStore {
        return FileSessionStore { file_path };
    }

    async fn read(&self) -> BTreeMap<String, String> {
        let payload = match fs::read_to_string(&self.file_path).await {
            Ok(payload) => payload,
            Err(_) => return BTreeMap::new(),
        };

        match serde_yaml::from_str::<BTreeMap<String, String>>(&payload) {
            Ok(entries) => return entries,
            Err(err) => {
                tracing::warn!(error = ?err, path = ?self.file_path, "Ignoring unreadable session file");
                return BTreeMap::new();
            }
        }
    }

    async fn write(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if entries.is_empty() {
            if self.file_path.exists() {
                fs::remove_file(&self.file_path).await?;
            }
            return Ok(());
        }

        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }

        let payload = serde_yaml::to_string(entries)?;
        let mut file = fs::File::create(&self.file_path).await?;
        file.write_all(payload.as_bytes()).await?;
        file.flush().await?;

        return Ok(());
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    #[allow(clippy::implicit_return)]
    async fn get(&self, key: SessionKey) -> Option<String> {
        return self.read().await.get(&key.to_string()).cloned();
    }

    #[allow(clippy::implicit_return)]
    async fn set(&self, key: SessionKey, value: &str) -> Result<()> {
        let mut entries = self.read().await;
        entries.insert(key.to_string(), value.to_string());

        return self.write(&entries).await;
    }

    #[allow(clippy::implicit_return)]
    async fn remove(&self, key: SessionKey) -> Result<()> {
        let mut entries = self.read().await;
        if entries.remove(&key.to_string()).is_none() {
            return Ok(());
        }

        return self.write(&entries).await;
    }
}
