use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncWriteExt, BufReader};

use super::error::StorageError;
use super::name::ImageName;
use super::traits::{BoxReader, ImageStore, StoredImage};
use crate::image::ImageFormat;

/// Filesystem-backed image store.
///
/// Images live flat in the base directory as `{sha256 hex}.{ext}`, which is
/// the layout a static file server can expose directly. Writes are staged in
/// `{base_path}/.tmp` and published with a hard link, so a final name is
/// never observed half-written and never replaced.
pub struct FilesystemImageStore {
    base_path: PathBuf,
}

impl FilesystemImageStore {
    /// Create a new filesystem image store, creating directories as needed.
    pub async fn new(base_path: PathBuf) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn image_path(&self, name: &ImageName) -> PathBuf {
        self.base_path.join(name.file_name())
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }

    async fn write_temp(&self, path: &Path, data: &[u8]) -> Result<(), StorageError> {
        let mut file = fs::File::create(path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        Ok(())
    }
}

#[async_trait]
impl ImageStore for FilesystemImageStore {
    async fn put(&self, data: &[u8], format: ImageFormat) -> Result<StoredImage, StorageError> {
        let name = ImageName::compute(data, format);
        let image_path = self.image_path(&name);

        if fs::try_exists(&image_path).await? {
            return Ok(StoredImage {
                name,
                created: false,
            });
        }

        let temp_path = self.temp_path();
        if let Err(e) = self.write_temp(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        // A concurrent writer may have published the same content meanwhile;
        // `hard_link` refuses to replace it.
        let created = match fs::hard_link(&temp_path, &image_path).await {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => false,
            Err(e) => {
                let _ = fs::remove_file(&temp_path).await;
                return Err(e.into());
            }
        };
        let _ = fs::remove_file(&temp_path).await;

        if created {
            tracing::info!(image = %name, bytes = data.len(), "Stored image");
        }

        Ok(StoredImage { name, created })
    }

    async fn get_stream(&self, name: &ImageName) -> Result<BoxReader, StorageError> {
        match fs::File::open(self.image_path(name)).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(name.file_name())),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, name: &ImageName) -> Result<bool, StorageError> {
        Ok(fs::try_exists(self.image_path(name)).await?)
    }

    async fn delete(&self, name: &ImageName) -> Result<bool, StorageError> {
        match fs::remove_file(self.image_path(name)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
