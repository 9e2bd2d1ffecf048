//! Signed uploads to the Cloudinary object store.
//!
//! The provider authenticates a request with a SHA-1 over the canonicalized
//! parameter set plus a shared secret. Image uploads sign `{public_id,
//! timestamp}`; raw (document) uploads additionally sign `{folder,
//! resource_type}` — that asymmetry is the provider's contract and is
//! reproduced exactly. A failed upload aborts the enclosing operation; there
//! is no retry.

use std::rc::Rc;

use serde::Deserialize;
use sha1::{Digest, Sha1};

use crate::config::CloudinaryConfig;
use crate::shared::errors::{AppError, Result};
use crate::shared::services::transport::{ApiTransport, Part};

/// Produces the upload signature and the public key that accompanies it.
///
/// The default signer holds the API secret client-side; swapping in a
/// server-issued signature only requires a new implementation of this trait.
pub trait Signer {
    fn api_key(&self) -> &str;
    fn sign(&self, canonical: &str) -> String;
}

pub struct ApiSecretSigner {
    api_key: String,
    api_secret: String,
}

impl ApiSecretSigner {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self {
            api_key,
            api_secret,
        }
    }
}

impl Signer for ApiSecretSigner {
    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn sign(&self, canonical: &str) -> String {
        signature(canonical, &self.api_secret)
    }
}

/// Lowercase hex SHA-1 of the canonical string with the secret appended.
pub fn signature(canonical: &str, secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(canonical.as_bytes());
    hasher.update(secret.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Sorts keys lexicographically and joins `key=value` pairs with `&`.
pub fn canonical_params(params: &[(&str, String)]) -> String {
    let mut sorted: Vec<_> = params.iter().collect();
    sorted.sort_by_key(|(key, _)| *key);
    sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Replaces every non-alphanumeric character with `_`, matching the
/// provider's public-id constraints.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadOutcome {
    pub secure_url: String,
    pub public_id: String,
}

pub struct CloudinaryClient<H> {
    transport: Rc<H>,
    cloud_name: String,
    signer: Rc<dyn Signer>,
}

impl<H> Clone for CloudinaryClient<H> {
    fn clone(&self) -> Self {
        Self {
            transport: Rc::clone(&self.transport),
            cloud_name: self.cloud_name.clone(),
            signer: Rc::clone(&self.signer),
        }
    }
}

impl<H: ApiTransport> CloudinaryClient<H> {
    pub fn new(transport: Rc<H>, config: &CloudinaryConfig) -> Self {
        Self {
            transport,
            cloud_name: config.cloud_name.clone(),
            signer: Rc::new(ApiSecretSigner::new(
                config.api_key.clone(),
                config.api_secret.clone(),
            )),
        }
    }

    pub fn with_signer(transport: Rc<H>, cloud_name: String, signer: Rc<dyn Signer>) -> Self {
        Self {
            transport,
            cloud_name,
            signer,
        }
    }

    /// Uploads a binary image into `folder`, e.g. retinal scans into "scans".
    pub async fn upload_image(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        mime_type: &str,
        folder: &str,
    ) -> Result<UploadOutcome> {
        let timestamp = chrono::Utc::now().timestamp();
        let millis = chrono::Utc::now().timestamp_millis();
        let public_id = format!("{folder}/{millis}_{}", sanitize_file_name(file_name));

        let signed = [
            ("public_id", public_id.clone()),
            ("timestamp", timestamp.to_string()),
        ];
        let signature = self.signer.sign(&canonical_params(&signed));

        let parts = vec![
            (
                "file",
                Part::Bytes {
                    data: bytes,
                    file_name: file_name.to_string(),
                    mime_type: mime_type.to_string(),
                },
            ),
            ("public_id", Part::Text(public_id)),
            ("timestamp", Part::Text(timestamp.to_string())),
            ("signature", Part::Text(signature)),
            ("api_key", Part::Text(self.signer.api_key().to_string())),
        ];

        self.submit("image", parts).await
    }

    /// Uploads a document (e.g. a generated PDF) as a raw resource. The
    /// signed set differs from image uploads by provider mandate.
    pub async fn upload_raw(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        folder: &str,
    ) -> Result<UploadOutcome> {
        let timestamp = chrono::Utc::now().timestamp();
        let public_id = format!("{}_{timestamp}", sanitize_file_name(file_name));

        let signed = [
            ("folder", folder.to_string()),
            ("public_id", public_id.clone()),
            ("resource_type", "raw".to_string()),
            ("timestamp", timestamp.to_string()),
        ];
        let signature = self.signer.sign(&canonical_params(&signed));

        let parts = vec![
            (
                "file",
                Part::Bytes {
                    data: bytes,
                    file_name: file_name.to_string(),
                    mime_type: "application/pdf".to_string(),
                },
            ),
            ("api_key", Part::Text(self.signer.api_key().to_string())),
            ("folder", Part::Text(folder.to_string())),
            ("public_id", Part::Text(public_id)),
            ("resource_type", Part::Text("raw".to_string())),
            ("timestamp", Part::Text(timestamp.to_string())),
            ("signature", Part::Text(signature)),
        ];

        self.submit("raw", parts).await
    }

    async fn submit(
        &self,
        resource: &str,
        parts: Vec<(&'static str, Part)>,
    ) -> Result<UploadOutcome> {
        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/{resource}/upload",
            self.cloud_name
        );
        let body = self
            .transport
            .post_multipart(&url, parts)
            .await
            .map_err(|e| match e {
                // The provider message travels verbatim to the caller.
                AppError::Api { message, .. } => AppError::Upload(message),
                other => other,
            })?;
        serde_json::from_value(body).map_err(|e| AppError::Malformed(e.to_string()))
    }
}
