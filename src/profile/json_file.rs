//! Single-file JSON profile store.
//!
//! Keeps every profile in one `user_id -> profile` JSON map on disk, read
//! and rewritten whole on each put. A writer mutex serializes rewrites so
//! concurrent puts cannot interleave partial files.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::warn;

use super::{ProfileStore, StoreError, UserProfile};

/// File-backed profile store.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store reading and writing `path`. The file is created on
    /// the first put.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_map(&self) -> Result<HashMap<String, UserProfile>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(map) => Ok(map),
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        error = %e,
                        "malformed profile file, starting empty"
                    );
                    Ok(HashMap::new())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

#[async_trait]
impl ProfileStore for JsonFileStore {
    async fn get(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let mut map = self.read_map().await?;
        Ok(map.remove(user_id))
    }

    async fn put(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_map().await?;
        map.insert(profile.user_id.clone(), profile.clone());
        let encoded = serde_json::to_string_pretty(&map)?;
        tokio::fs::write(&self.path, encoded).await?;
        Ok(())
    }
}
