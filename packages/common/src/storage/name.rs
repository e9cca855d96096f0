use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::error::StorageError;
use crate::image::ImageFormat;

/// Content-addressed image file name: `<sha256 hex>.<ext>`.
///
/// Two uploads with identical bytes always map to the same name, so a name
/// collision on disk implies identical content.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageName {
    digest: [u8; 32],
    format: ImageFormat,
}

impl ImageName {
    /// Derive the name for the given image bytes.
    pub fn compute(data: &[u8], format: ImageFormat) -> Self {
        Self {
            digest: Sha256::digest(data).into(),
            format,
        }
    }

    /// Parse a stored file name.
    ///
    /// Only `<64 lowercase hex chars>.<jpg|png>` is accepted, so a parsed name
    /// can never address anything outside the image directory.
    pub fn parse(s: &str) -> Result<Self, StorageError> {
        let (stem, ext) = s
            .split_once('.')
            .ok_or_else(|| StorageError::InvalidName(format!("missing extension in {s:?}")))?;

        let format = ImageFormat::from_extension(ext)
            .ok_or_else(|| StorageError::InvalidName(format!("unsupported extension {ext:?}")))?;

        if stem.len() != 64 {
            return Err(StorageError::InvalidName(format!(
                "expected 64 hex characters, got {}",
                stem.len()
            )));
        }
        if stem.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(StorageError::InvalidName("hex digest must be lowercase".into()));
        }

        let bytes =
            hex::decode(stem).map_err(|e| StorageError::InvalidName(format!("invalid hex: {e}")))?;
        let digest: [u8; 32] = bytes
            .try_into()
            .map_err(|_| StorageError::InvalidName("decoded to wrong length".into()))?;

        Ok(Self { digest, format })
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Hex digest without the extension, used as an entity tag.
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.digest_hex(), self.format.extension())
    }
}

impl fmt::Debug for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageName({})", self.file_name())
    }
}

impl fmt::Display for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

impl Serialize for ImageName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.file_name())
    }
}

impl<'de> Deserialize<'de> for ImageName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
