use super::SessionStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const TOKEN_KEY: &str = "token";

/// Session store backed by a fjall keyspace in the data directory.
pub struct DiskSessionStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskSessionStore {
    pub fn open(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join("session");
        std::fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;

        let keyspace = fjall::Config::new(&path)
            .open()
            .with_context(|| format!("Failed to open session store at {}", path.display()))?;
        let partition = keyspace
            .open_partition("session", PartitionCreateOptions::default())
            .context("Failed to open session partition")?;
        debug!("Opened session store at {}", path.display());
        Ok(Self {
            keyspace,
            partition,
        })
    }
}

#[async_trait]
impl SessionStore for DiskSessionStore {
    async fn load_token(&self) -> Result<Option<String>> {
        let value = self
            .partition
            .get(TOKEN_KEY)
            .context("Failed to read session token")?;
        match value {
            Some(bytes) => {
                let token =
                    String::from_utf8(bytes.to_vec()).context("Stored session token is corrupt")?;
                debug!("Session token found");
                Ok(Some(token))
            }
            None => {
                debug!("No session token stored");
                Ok(None)
            }
        }
    }

    async fn save_token(&self, token: &str) -> Result<()> {
        self.partition
            .insert(TOKEN_KEY, token.as_bytes())
            .context("Failed to store session token")?;
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to persist session token")?;
        debug!("Session token saved");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.partition
            .remove(TOKEN_KEY)
            .context("Failed to remove session token")?;
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to persist session removal")?;
        debug!("Session token cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_token_round_trip() {
        let dir = tempdir().unwrap();
        let store = DiskSessionStore::open(dir.path()).unwrap();

        assert!(store.load_token().await.unwrap().is_none());
        store.save_token("abc.def.ghi").await.unwrap();
        assert_eq!(
            store.load_token().await.unwrap().as_deref(),
            Some("abc.def.ghi")
        );

        store.save_token("newer").await.unwrap();
        assert_eq!(store.load_token().await.unwrap().as_deref(), Some("newer"));
    }

    #[tokio::test]
    async fn test_token_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = DiskSessionStore::open(dir.path()).unwrap();
            store.save_token("persisted").await.unwrap();
        }
        let store = DiskSessionStore::open(dir.path()).unwrap();
        assert_eq!(
            store.load_token().await.unwrap().as_deref(),
            Some("persisted")
        );
    }

    #[tokio::test]
    async fn test_clear() {
        let dir = tempdir().unwrap();
        let store = DiskSessionStore::open(dir.path()).unwrap();
        store.save_token("gone soon").await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load_token().await.unwrap().is_none());
        // Clearing an empty store is fine.
        store.clear().await.unwrap();
    }
}
