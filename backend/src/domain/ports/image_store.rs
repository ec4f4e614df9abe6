//! Hosted image storage port.

use async_trait::async_trait;

/// Outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Public delivery URL of the stored image.
    pub url: String,
}

/// Failures reported by the image host.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageStoreError {
    #[error("image upload failed: {message}")]
    Upload { message: String },
    #[error("image delete failed: {message}")]
    Delete { message: String },
}

impl ImageStoreError {
    pub fn upload(message: impl Into<String>) -> Self {
        Self::Upload {
            message: message.into(),
        }
    }

    pub fn delete(message: impl Into<String>) -> Self {
        Self::Delete {
            message: message.into(),
        }
    }
}

/// Upload and removal of hosted images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `bytes` under `folder` with the given public identifier.
    async fn upload(
        &self,
        folder: &str,
        public_id: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredImage, ImageStoreError>;

    /// Remove a previously uploaded image by its delivery URL.
    async fn delete(&self, url: &str) -> Result<(), ImageStoreError>;
}
