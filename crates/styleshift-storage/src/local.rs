use crate::keys;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/styleshift/media")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:3000/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Keys containing path traversal sequences that could escape the base
    /// storage directory are rejected.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.contains("..") || storage_key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(storage_key))
    }

    /// Generate public URL for a stored file
    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload(
        &self,
        filename: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<(String, String)> {
        let key = keys::upload_key(filename);
        let path = self.key_to_path(&key)?;
        self.ensure_parent_dir(&path).await?;

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        file.write_all(&data)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        let url = self.generate_url(&key);

        tracing::info!(
            key = %key,
            size_bytes = data.len(),
            path = %path.display(),
            "Local upload successful"
        );

        Ok((key, url))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(storage_key)?;

        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(storage_key.to_string()))
            }
            Err(e) => Err(StorageError::DownloadFailed(e.to_string())),
        }
    }

    async fn get_presigned_url(
        &self,
        storage_key: &str,
        _expires_in: Duration,
    ) -> StorageResult<String> {
        // The local backend serves files from a public base URL; there is no
        // signing authority, so the URL does not actually expire.
        let _ = self.key_to_path(storage_key)?;
        Ok(self.generate_url(storage_key))
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        Ok(fs::try_exists(&path).await?)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn test_storage() -> (LocalStorage, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let storage = LocalStorage::new(dir.path(), "http://localhost:3000/media".to_string())
            .await
            .expect("create storage");
        (storage, dir)
    }

    #[tokio::test]
    async fn test_upload_writes_file_and_returns_url() {
        let (storage, _dir) = test_storage().await;
        let (key, url) = storage
            .upload("photo.jpg", "image/jpeg", b"jpeg-bytes".to_vec())
            .await
            .expect("upload");
        assert_eq!(key, "user_uploads/photo.jpg");
        assert_eq!(url, "http://localhost:3000/media/user_uploads/photo.jpg");
        assert!(storage.exists(&key).await.unwrap());
        assert_eq!(storage.download(&key).await.unwrap(), b"jpeg-bytes");
    }

    #[tokio::test]
    async fn test_same_name_upload_overwrites() {
        let (storage, _dir) = test_storage().await;
        storage
            .upload("photo.jpg", "image/jpeg", b"first".to_vec())
            .await
            .unwrap();
        let (key, _) = storage
            .upload("photo.jpg", "image/jpeg", b"second".to_vec())
            .await
            .unwrap();
        assert_eq!(storage.download(&key).await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_traversal_keys_rejected() {
        let (storage, _dir) = test_storage().await;
        let err = storage.download("../outside").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
        let err = storage.download("/etc/passwd").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn test_download_missing_is_not_found() {
        let (storage, _dir) = test_storage().await;
        let err = storage.download("user_uploads/missing.jpg").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }
}
