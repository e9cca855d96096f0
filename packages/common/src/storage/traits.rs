use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;
use super::name::ImageName;
use crate::image::ImageFormat;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Outcome of a successful [`ImageStore::put`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredImage {
    pub name: ImageName,
    /// `true` if this call wrote the file, `false` if identical content was
    /// already present.
    pub created: bool,
}

/// Content-addressed image storage.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store image bytes under their content-derived name.
    async fn put(&self, data: &[u8], format: ImageFormat) -> Result<StoredImage, StorageError>;

    /// Retrieve all bytes of an image.
    async fn get(&self, name: &ImageName) -> Result<Vec<u8>, StorageError> {
        let mut reader = self.get_stream(name).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    /// Retrieve an image as a streaming async reader.
    async fn get_stream(&self, name: &ImageName) -> Result<BoxReader, StorageError>;

    async fn exists(&self, name: &ImageName) -> Result<bool, StorageError>;

    /// Delete an image.
    ///
    /// Returns `true` if the file was deleted, `false` if it did not exist.
    async fn delete(&self, name: &ImageName) -> Result<bool, StorageError>;
}
