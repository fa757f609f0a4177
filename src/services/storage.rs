// src/services/storage.rs
// DOCUMENTATION: Local photo object storage
// PURPOSE: Persist uploaded photos on disk and derive their public URLs

use crate::errors::PinsError;
use chrono::Utc;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Filesystem-backed photo store
/// DOCUMENTATION: Objects live under `root` and are served back under
/// `base_url`. Keys have the form `{user_id}/{timestamp}_{filename}` so a
/// user's uploads share one directory.
#[derive(Debug, Clone)]
pub struct PhotoStorage {
    root: PathBuf,
    base_url: String,
}

impl PhotoStorage {
    /// Create the store, making sure the root directory exists
    pub async fn new(root: impl Into<PathBuf>, base_url: String) -> Result<Self, PinsError> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            PinsError::StorageError(format!(
                "Failed to create storage directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(PhotoStorage {
            root,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the object key for a fresh upload
    /// DOCUMENTATION: Millisecond timestamp prefix keeps keys unique per
    /// user even when the same file is uploaded repeatedly
    pub fn object_key(user_id: Uuid, original_filename: &str) -> String {
        format!(
            "{}/{}_{}",
            user_id,
            Utc::now().timestamp_millis(),
            sanitize_filename(original_filename)
        )
    }

    /// Public URL under which a stored object is reachable
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    /// Convert an object key to a filesystem path, rejecting traversal
    fn key_to_path(&self, key: &str) -> Result<PathBuf, PinsError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') || key.contains('\\') {
            return Err(PinsError::InvalidInput(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        Ok(self.root.join(key))
    }

    /// Write an object and return its public URL
    pub async fn store(&self, key: &str, data: &[u8]) -> Result<String, PinsError> {
        let path = self.key_to_path(key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                PinsError::StorageError(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let mut file = fs::File::create(&path).await.map_err(|e| {
            PinsError::StorageError(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            PinsError::StorageError(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            PinsError::StorageError(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        log::debug!("Stored photo object {} ({} bytes)", key, data.len());
        Ok(self.public_url(key))
    }

    /// Read an object back
    pub async fn read(&self, key: &str) -> Result<Vec<u8>, PinsError> {
        let path = self.key_to_path(key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(PinsError::NotFound(key.to_string()));
        }

        fs::read(&path).await.map_err(|e| {
            PinsError::StorageError(format!("Failed to read file {}: {}", path.display(), e))
        })
    }

    /// Delete an object; deleting something already gone is not an error
    pub async fn remove(&self, key: &str) -> Result<(), PinsError> {
        let path = self.key_to_path(key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            PinsError::StorageError(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        log::debug!("Removed photo object {}", key);
        Ok(())
    }
}

/// Reduce an uploaded filename to characters safe in a key and a URL
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .take(128)
        .collect();

    if cleaned.trim_matches('_').is_empty() {
        "photo".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn storage(dir: &tempfile::TempDir) -> PhotoStorage {
        PhotoStorage::new(dir.path(), "http://localhost:8003/media".to_string())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_store_read_remove_round_trip() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;

        let key = PhotoStorage::object_key(Uuid::new_v4(), "beach.jpg");
        let url = storage.store(&key, b"jpeg bytes").await.unwrap();

        assert_eq!(url, format!("http://localhost:8003/media/{}", key));
        assert_eq!(storage.read(&key).await.unwrap(), b"jpeg bytes");

        storage.remove(&key).await.unwrap();
        assert!(matches!(
            storage.read(&key).await,
            Err(PinsError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_remove_missing_object_is_ok() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;

        assert!(storage.remove("someone/123_gone.jpg").await.is_ok());
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;

        for key in ["../../etc/passwd", "/etc/passwd", "a/..\\b", ""] {
            assert!(matches!(
                storage.read(key).await,
                Err(PinsError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_object_key_shape() {
        let user_id = Uuid::new_v4();
        let key = PhotoStorage::object_key(user_id, "Sunset over Ålesund!.jpg");

        let (dir, file) = key.split_once('/').unwrap();
        assert_eq!(dir, user_id.to_string());

        // timestamp prefix, then the sanitized name
        let (ts, name) = file.split_once('_').unwrap();
        assert!(ts.chars().all(|c| c.is_ascii_digit()));
        assert!(name.ends_with(".jpg"));
        assert!(!name.contains('!'));
        assert!(!name.contains(' '));
    }

    #[test]
    fn test_sanitize_degenerate_filenames() {
        assert_eq!(sanitize_filename("???"), "photo");
        assert_eq!(sanitize_filename("trip report.pdf"), "trip_report.pdf");
    }
}
