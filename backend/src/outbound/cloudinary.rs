//! Cloudinary adapter for hosted image storage.
//!
//! Uploads use the signed REST API: parameters are sorted, concatenated,
//! suffixed with the API secret and hashed with SHA-256 to form the
//! signature. Deletion addresses images by the public id parsed back out of
//! the delivery URL.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::debug;
use url::Url;

use crate::domain::ports::image_store::{ImageStore, ImageStoreError, StoredImage};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_ENDPOINT: &str = "https://api.cloudinary.com/v1_1/";

/// Cloudinary account settings.
#[derive(Debug, Clone)]
pub struct CloudinarySettings {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Cloudinary client implementing the image store port.
#[derive(Clone)]
pub struct Cloudinary {
    client: Client,
    endpoint: Url,
    settings: CloudinarySettings,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Deserialize)]
struct DestroyResponse {
    result: String,
}

impl Cloudinary {
    pub fn new(settings: CloudinarySettings) -> Result<Self, ImageStoreError> {
        let endpoint = Url::parse(DEFAULT_ENDPOINT)
            .map_err(|err| ImageStoreError::upload(err.to_string()))?;
        Self::with_endpoint(endpoint, settings)
    }

    /// Client against a custom endpoint, used in tests.
    pub fn with_endpoint(
        endpoint: Url,
        settings: CloudinarySettings,
    ) -> Result<Self, ImageStoreError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ImageStoreError::upload(err.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            settings,
        })
    }

    fn action_url(&self, action: &str) -> Result<Url, ImageStoreError> {
        self.endpoint
            .join(&format!("{}/image/{action}", self.settings.cloud_name))
            .map_err(|err| ImageStoreError::upload(err.to_string()))
    }

    /// SHA-256 signature over the sorted `key=value` pairs joined with `&`,
    /// with the API secret appended.
    fn sign(&self, mut params: Vec<(&str, String)>) -> String {
        params.sort_by(|a, b| a.0.cmp(b.0));
        let joined = params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        let mut hasher = Sha256::new();
        hasher.update(joined.as_bytes());
        hasher.update(self.settings.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Extract the public id (including folder) from a delivery URL.
///
/// Delivery URLs look like
/// `https://res.cloudinary.com/demo/image/upload/v17123/folder/name.png`;
/// the public id is everything after the version segment, extension
/// dropped.
fn public_id_from_url(url: &str) -> Option<String> {
    let (_, after) = url.split_once("/upload/")?;
    let rest = after
        .split_once('/')
        .filter(|(version, _)| {
            version.starts_with('v') && version[1..].chars().all(|c| c.is_ascii_digit())
        })
        .map_or(after, |(_, rest)| rest);
    let trimmed = rest.rsplit_once('.').map_or(rest, |(stem, _)| stem);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

#[async_trait]
impl ImageStore for Cloudinary {
    async fn upload(
        &self,
        folder: &str,
        public_id: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredImage, ImageStoreError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = self.sign(vec![
            ("folder", folder.to_owned()),
            ("public_id", public_id.to_owned()),
            ("timestamp", timestamp.clone()),
        ]);

        let part = Part::bytes(bytes)
            .file_name("upload")
            .mime_str(content_type)
            .map_err(|err| ImageStoreError::upload(err.to_string()))?;
        let form = Form::new()
            .text("api_key", self.settings.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder.to_owned())
            .text("public_id", public_id.to_owned())
            .text("signature", signature)
            .part("file", part);

        let url = self.action_url("upload")?;
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| ImageStoreError::upload(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ImageStoreError::upload(err.to_string()))?;
        if !status.is_success() {
            return Err(ImageStoreError::upload(format!(
                "upload returned {status}: {body}"
            )));
        }
        let parsed: UploadResponse = serde_json::from_str(&body)
            .map_err(|err| ImageStoreError::upload(err.to_string()))?;
        debug!(url = %parsed.secure_url, "image uploaded");
        Ok(StoredImage {
            url: parsed.secure_url,
        })
    }

    async fn delete(&self, url: &str) -> Result<(), ImageStoreError> {
        let public_id = public_id_from_url(url)
            .ok_or_else(|| ImageStoreError::delete(format!("unrecognised delivery URL: {url}")))?;
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = self.sign(vec![
            ("public_id", public_id.clone()),
            ("timestamp", timestamp.clone()),
        ]);

        let form = Form::new()
            .text("api_key", self.settings.api_key.clone())
            .text("timestamp", timestamp)
            .text("public_id", public_id)
            .text("signature", signature);

        let action_url = self.action_url("destroy")?;
        let response = self
            .client
            .post(action_url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| ImageStoreError::delete(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ImageStoreError::delete(err.to_string()))?;
        if !status.is_success() {
            return Err(ImageStoreError::delete(format!(
                "destroy returned {status}: {body}"
            )));
        }
        let parsed: DestroyResponse = serde_json::from_str(&body)
            .map_err(|err| ImageStoreError::delete(err.to_string()))?;
        if parsed.result != "ok" && parsed.result != "not found" {
            return Err(ImageStoreError::delete(format!(
                "destroy returned result {}",
                parsed.result
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[rstest]
    #[case(
        "https://res.cloudinary.com/demo/image/upload/v1712345/profile_pictures/user_1_ab.png",
        Some("profile_pictures/user_1_ab")
    )]
    #[case(
        "https://res.cloudinary.com/demo/image/upload/post_images/user_2_cd.jpg",
        Some("post_images/user_2_cd")
    )]
    #[case("https://example.com/not-cloudinary.png", None)]
    fn parses_public_id_from_delivery_url(
        #[case] url: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(public_id_from_url(url).as_deref(), expected);
    }

    #[test]
    fn signature_is_stable_for_sorted_params() {
        let settings = CloudinarySettings {
            cloud_name: "demo".into(),
            api_key: "key".into(),
            api_secret: "secret".into(),
        };
        let cloudinary = Cloudinary::new(settings).expect("client builds");
        let a = cloudinary.sign(vec![
            ("timestamp", "100".into()),
            ("folder", "profile_pictures".into()),
        ]);
        let b = cloudinary.sign(vec![
            ("folder", "profile_pictures".into()),
            ("timestamp", "100".into()),
        ]);
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn upload_returns_secure_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/demo/image/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "secure_url": "https://res.cloudinary.com/demo/image/upload/v1/x/y.png"
            })))
            .mount(&server)
            .await;
        let endpoint = Url::parse(&format!("{}/", server.uri())).expect("mock server url");
        let cloudinary = Cloudinary::with_endpoint(
            endpoint,
            CloudinarySettings {
                cloud_name: "demo".into(),
                api_key: "key".into(),
                api_secret: "secret".into(),
            },
        )
        .expect("client builds");
        let stored = cloudinary
            .upload("x", "y", vec![1, 2, 3], "image/png")
            .await
            .expect("upload succeeds");
        assert!(stored.url.ends_with("/x/y.png"));
    }
}
