//! Multipart image upload handlers.

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::TryStreamExt;
use serde_json::json;

use crate::domain::error::Error;
use crate::domain::uploads::MAX_IMAGE_BYTES;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::error;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

struct UploadedFile {
    bytes: Vec<u8>,
    content_type: String,
}

/// Drain the multipart payload and return the `image` field's bytes.
///
/// The size cap is enforced while reading so an oversized upload is
/// rejected without buffering the whole body.
async fn read_image_field(mut payload: Multipart) -> Result<UploadedFile, Error> {
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|err| Error::invalid_request(format!("Malformed upload: {err}")))?
    {
        if field.content_disposition().get_name() != Some("image") {
            continue;
        }
        let content_type = field
            .content_type()
            .map(ToString::to_string)
            .unwrap_or_else(|| "application/octet-stream".to_owned());
        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|err| Error::invalid_request(format!("Malformed upload: {err}")))?
        {
            if bytes.len() + chunk.len() > MAX_IMAGE_BYTES {
                return Err(Error::invalid_request("Image exceeds the 5MB size limit"));
            }
            bytes.extend_from_slice(&chunk);
        }
        return Ok(UploadedFile {
            bytes,
            content_type,
        });
    }
    Err(Error::invalid_request("No file uploaded"))
}

/// Upload a profile picture and persist its URL on the caller's profile.
#[utoipa::path(
    post,
    path = "/api/upload/profile-picture",
    responses(
        (status = 200, description = "Image stored and profile updated"),
        (status = 400, description = "Missing or invalid file", body = error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "uploads"
)]
pub async fn profile_picture(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: Multipart,
) -> ApiResult {
    let file = read_image_field(payload).await?;
    let user = state
        .uploads
        .profile_picture(caller.id, file.bytes, &file.content_type)
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Profile picture uploaded successfully",
        "imageUrl": user.profile_picture,
    })))
}

/// Upload a post image and return its delivery URL.
#[utoipa::path(
    post,
    path = "/api/upload/post-image",
    responses(
        (status = 200, description = "Image stored"),
        (status = 400, description = "Missing or invalid file", body = error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "uploads"
)]
pub async fn post_image(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: Multipart,
) -> ApiResult {
    let file = read_image_field(payload).await?;
    let url = state
        .uploads
        .post_image(caller.id, file.bytes, &file.content_type)
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Image uploaded successfully",
        "imageUrl": url,
    })))
}
