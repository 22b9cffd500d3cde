//! JSON-file preference store
//!
//! The whole document is rewritten on every mutation: it is serialized to a
//! sibling `.tmp` file which is then renamed over the original. Mutations are
//! applied to a copy and only become visible once that copy is on disk.

use async_trait::async_trait;
use common::{ProductId, UserId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::document::PreferenceDocument;
use crate::error::StorageError;
use crate::store::traits::PreferenceStore;
use crate::Result;

pub struct JsonFilePreferenceStore {
    path: PathBuf,
    history_limit: usize,
    document: Mutex<PreferenceDocument>,
}

impl JsonFilePreferenceStore {
    /// Open `path`, starting from an empty document if it does not exist yet
    pub async fn open(path: impl AsRef<Path>, history_limit: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let document = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No preference file yet, starting empty");
                PreferenceDocument::default()
            }
            Err(e) => return Err(StorageError::io(path.display().to_string(), e)),
        };

        Ok(Self {
            path,
            history_limit,
            document: Mutex::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, document: &PreferenceDocument) -> Result<()> {
        let content = serde_json::to_string_pretty(document)?;
        let tmp = self.path.with_extension("json.tmp");

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io(parent.display().to_string(), e))?;
        }
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| StorageError::io(tmp.display().to_string(), e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StorageError::io(self.path.display().to_string(), e))?;

        debug!(path = %self.path.display(), "Preferences written");
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for JsonFilePreferenceStore {
    async fn wishlist(&self, user: UserId) -> Result<Vec<ProductId>> {
        Ok(self.document.lock().await.wishlist(&user))
    }

    async fn add_to_wishlist(&self, user: UserId, product: ProductId) -> Result<bool> {
        let mut doc = self.document.lock().await;
        let mut next = doc.clone();
        let added = next.add_to_wishlist(user, product);
        if added {
            self.persist(&next).await?;
            *doc = next;
        }
        Ok(added)
    }

    async fn remove_from_wishlist(&self, user: UserId, product: ProductId) -> Result<bool> {
        let mut doc = self.document.lock().await;
        let mut next = doc.clone();
        let removed = next.remove_from_wishlist(&user, &product);
        if removed {
            self.persist(&next).await?;
            *doc = next;
        }
        Ok(removed)
    }

    async fn wishlist_counts(&self) -> Result<HashMap<ProductId, usize>> {
        Ok(self.document.lock().await.wishlist_counts())
    }

    async fn search_history(&self, user: UserId) -> Result<Vec<String>> {
        Ok(self.document.lock().await.search_history(&user))
    }

    async fn record_search(&self, user: UserId, query: &str) -> Result<Vec<String>> {
        let mut doc = self.document.lock().await;
        let mut next = doc.clone();
        if next.record_search(user, query, self.history_limit) {
            self.persist(&next).await?;
            *doc = next;
        }
        Ok(doc.search_history(&user))
    }

    async fn clear_search_history(&self, user: UserId) -> Result<()> {
        let mut doc = self.document.lock().await;
        let mut next = doc.clone();
        if next.clear_search_history(&user) {
            self.persist(&next).await?;
            *doc = next;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("closetswap-prefs-{}", uuid::Uuid::new_v4()))
            .join("preferences.json")
    }

    #[tokio::test]
    async fn test_preferences_survive_reopen() {
        let path = temp_path();
        let user = UserId::new();
        let product = ProductId::new();

        {
            let store = JsonFilePreferenceStore::open(&path, 5).await.unwrap();
            store.add_to_wishlist(user, product).await.unwrap();
            store.record_search(user, "leather boots").await.unwrap();
        }

        let reopened = JsonFilePreferenceStore::open(&path, 5).await.unwrap();
        assert_eq!(reopened.wishlist(user).await.unwrap(), vec![product]);
        assert_eq!(
            reopened.search_history(user).await.unwrap(),
            vec!["leather boots"]
        );

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let store = JsonFilePreferenceStore::open(temp_path(), 5).await.unwrap();
        assert!(store.wishlist_counts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_serialization_error() {
        let path = temp_path();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).unwrap();
        }
        std::fs::write(&path, "not json").unwrap();

        let result = JsonFilePreferenceStore::open(&path, 5).await;
        assert!(matches!(result, Err(StorageError::Serialization(_))));

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[tokio::test]
    async fn test_failed_write_leaves_memory_unchanged() {
        let path = temp_path();
        let dir = path.parent().unwrap().to_path_buf();
        let user = UserId::new();
        let product = ProductId::new();
        let store = JsonFilePreferenceStore::open(&path, 5).await.unwrap();

        // A regular file where the directory should be makes every write fail.
        std::fs::write(&dir, "in the way").unwrap();
        assert!(store.add_to_wishlist(user, product).await.is_err());
        assert!(store.record_search(user, "silk scarf").await.is_err());
        assert!(store.wishlist(user).await.unwrap().is_empty());
        assert!(store.search_history(user).await.unwrap().is_empty());
        assert!(store.wishlist_counts().await.unwrap().is_empty());

        std::fs::remove_file(&dir).unwrap();
        assert!(store.add_to_wishlist(user, product).await.unwrap());
        let reopened = JsonFilePreferenceStore::open(&path, 5).await.unwrap();
        assert_eq!(reopened.wishlist(user).await.unwrap(), vec![product]);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
