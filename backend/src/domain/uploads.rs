//! Image upload orchestration.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::ports::image_store::ImageStore;
use crate::domain::ports::user_store::UserStore;
use crate::domain::user::{User, UserId};

/// Folder for profile pictures on the image host.
const PROFILE_FOLDER: &str = "profile_pictures";
/// Folder for general post images on the image host.
const POST_FOLDER: &str = "post_images";

/// Largest accepted upload, in bytes.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Pushes uploaded images to the hosting service and records the resulting
/// URLs where they belong.
#[derive(Clone)]
pub struct UploadService {
    images: Arc<dyn ImageStore>,
    users: Arc<dyn UserStore>,
}

impl UploadService {
    pub fn new(images: Arc<dyn ImageStore>, users: Arc<dyn UserStore>) -> Self {
        Self { images, users }
    }

    /// Upload a new profile picture for `user_id` and persist its URL.
    ///
    /// The previous picture is removed best-effort; a failed cleanup is
    /// logged and does not fail the request.
    pub async fn profile_picture(
        &self,
        user_id: UserId,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<User, Error> {
        validate_image(&bytes, content_type)?;
        let mut user = self
            .users
            .fetch(user_id)
            .await?
            .ok_or_else(|| Error::not_found("User not found"))?;

        let public_id = format!("user_{}_{}", user_id, Uuid::new_v4().simple());
        let stored = self
            .images
            .upload(PROFILE_FOLDER, &public_id, bytes, content_type)
            .await?;

        let previous = user.profile_picture.replace(stored.url);
        user.updated_at = Some(chrono::Utc::now());
        self.users.update(&user).await?;

        if let Some(old_url) = previous {
            if let Err(error) = self.images.delete(&old_url).await {
                warn!(%error, user_id = %user_id, "failed to remove previous profile picture");
            }
        }
        Ok(user)
    }

    /// Upload a standalone post image and return its delivery URL.
    pub async fn post_image(
        &self,
        user_id: UserId,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, Error> {
        validate_image(&bytes, content_type)?;
        let public_id = format!("user_{}_{}", user_id, Uuid::new_v4().simple());
        let stored = self
            .images
            .upload(POST_FOLDER, &public_id, bytes, content_type)
            .await?;
        Ok(stored.url)
    }
}

fn validate_image(bytes: &[u8], content_type: &str) -> Result<(), Error> {
    if bytes.is_empty() {
        return Err(Error::invalid_request("No file uploaded"));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(Error::invalid_request("Image exceeds the 5MB size limit"));
    }
    if !content_type.starts_with("image/") {
        return Err(Error::invalid_request("Only image uploads are accepted"));
    }
    Ok(())
}
