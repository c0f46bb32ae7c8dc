use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::errors::{InvalidStoragePath, ReadError, WriteError};

/// Blob storage addressed by slash-separated relative paths
/// (`receipts/{transactionId}/{file}`).
#[async_trait]
pub trait FileStorageDatasource: Send + Sync {
    async fn upload(&self, path: &str, content: &[u8]) -> Result<(), ServerError>;

    async fn download(&self, path: &str) -> Result<Vec<u8>, ServerError>;
}

/// Stores files below a root directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalFileStorageDatasource {
    root: PathBuf,
}

impl LocalFileStorageDatasource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, ServerError> {
        let relative = Path::new(path);
        let is_safe = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !is_safe {
            return Err(InvalidStoragePath::new(path));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FileStorageDatasource for LocalFileStorageDatasource {
    async fn upload(&self, path: &str, content: &[u8]) -> Result<(), ServerError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| WriteError::with_debug(path, &e))?;
        }
        tokio::fs::write(&target, content)
            .await
            .map_err(|e| WriteError::with_debug(path, &e))?;
        tracing::debug!(path, bytes = content.len(), "file uploaded");
        Ok(())
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, ServerError> {
        let target = self.resolve(path)?;
        tokio::fs::read(&target)
            .await
            .map_err(|e| ReadError::with_debug(&e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_then_download() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorageDatasource::new(dir.path());

        storage
            .upload("receipts/tx1/1_0_slip.jpg", b"jpeg bytes")
            .await
            .unwrap();

        assert!(dir.path().join("receipts/tx1/1_0_slip.jpg").exists());
        assert_eq!(
            storage.download("receipts/tx1/1_0_slip.jpg").await.unwrap(),
            b"jpeg bytes"
        );
    }

    #[tokio::test]
    async fn refuses_paths_escaping_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorageDatasource::new(dir.path());

        assert!(storage.upload("../outside.txt", b"x").await.is_err());
        assert!(storage.upload("/etc/passwd", b"x").await.is_err());
        assert!(storage.upload("", b"x").await.is_err());
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorageDatasource::new(dir.path());
        assert!(storage.download("receipts/none.jpg").await.is_err());
    }
}
