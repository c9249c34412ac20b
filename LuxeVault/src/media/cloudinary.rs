//! Cloudinary unsigned-preset uploads
//!
//! `POST https://api.cloudinary.com/v1_1/{cloud}/{raw|image}/upload` with a
//! multipart body carrying `file` and `upload_preset`.

use std::time::Duration;

use serde::Deserialize;

use super::{MediaHost, ResourceKind, UploadFile, UploadedMedia};
use crate::config::VaultConfig;
use crate::error::{Error, Result};

const API_ROOT: &str = "https://api.cloudinary.com/v1_1";

/// Uploads can be up to 50 MB, so allow a generous read window
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Cloudinary account + preset
#[derive(Clone)]
pub struct CloudinaryHost {
    cloud_name: String,
    upload_preset: String,
    agent: ureq::Agent,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    public_id: Option<String>,
    delete_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl CloudinaryHost {
    pub fn new(config: &VaultConfig) -> Self {
        Self::with_account(&config.cloud_name, &config.upload_preset)
    }

    pub fn with_account(cloud_name: &str, upload_preset: &str) -> Self {
        Self {
            cloud_name: cloud_name.to_string(),
            upload_preset: upload_preset.to_string(),
            agent: ureq::AgentBuilder::new().timeout(UPLOAD_TIMEOUT).build(),
        }
    }

    pub fn upload_url(&self, kind: ResourceKind) -> String {
        format!("{API_ROOT}/{}/{}/upload", self.cloud_name, kind.as_str())
    }

    fn delete_url(&self) -> String {
        format!("{API_ROOT}/{}/delete_by_token", self.cloud_name)
    }
}

/// Build a `multipart/form-data` body with the preset field and one file part
fn multipart_body(boundary: &str, preset: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let safe_name = file_name.replace(['"', '\r', '\n'], "_");
    let mut body = Vec::with_capacity(bytes.len() + 512);
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"upload_preset\"\r\n\r\n{preset}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{safe_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

/// Turn a rejected upload into the host's own message when it sent one
fn rejection(err: ureq::Error, kind: ResourceKind) -> Error {
    match err {
        ureq::Error::Status(_, response) => {
            let body = response.into_string().unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("Upload failed for {}", kind.as_str()));
            Error::UploadRejected { message }
        }
        other => other.into(),
    }
}

fn into_media(response: UploadResponse) -> Result<UploadedMedia> {
    Ok(UploadedMedia {
        secure_url: response
            .secure_url
            .ok_or(Error::UploadResponseIncomplete { field: "secure_url" })?,
        public_id: response
            .public_id
            .ok_or(Error::UploadResponseIncomplete { field: "public_id" })?,
        delete_token: response.delete_token,
    })
}

impl MediaHost for CloudinaryHost {
    fn upload(&self, file: &UploadFile, kind: ResourceKind) -> Result<UploadedMedia> {
        let bytes = file.read()?;
        let boundary = format!("----LuxeVault{}", uuid::Uuid::new_v4().simple());
        let body = multipart_body(
            &boundary,
            &self.upload_preset,
            file.file_name(),
            file.content_type(),
            &bytes,
        );

        tracing::info!(
            "Uploading {} ({} bytes) as {}",
            file.file_name(),
            bytes.len(),
            kind.as_str()
        );

        let response: UploadResponse = self
            .agent
            .post(&self.upload_url(kind))
            .set(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .send_bytes(&body)
            .map_err(|e| rejection(e, kind))?
            .into_json()?;

        into_media(response)
    }

    fn delete_by_token(&self, token: &str) -> Result<()> {
        self.agent
            .post(&self.delete_url())
            .send_form(&[("token", token)])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_urls() {
        let host = CloudinaryHost::with_account("studio", "preset");
        assert_eq!(
            host.upload_url(ResourceKind::Raw),
            "https://api.cloudinary.com/v1_1/studio/raw/upload"
        );
        assert_eq!(
            host.upload_url(ResourceKind::Image),
            "https://api.cloudinary.com/v1_1/studio/image/upload"
        );
    }

    #[test]
    fn test_multipart_layout() {
        let body = multipart_body("XYZ", "3d_portfolio", "a\"b.glb", "model/gltf-binary", b"DATA");
        let text = String::from_utf8(body).unwrap();
        assert!(text.starts_with("--XYZ\r\n"));
        assert!(text.contains("name=\"upload_preset\"\r\n\r\n3d_portfolio\r\n"));
        assert!(text.contains("filename=\"a_b.glb\""));
        assert!(text.contains("Content-Type: model/gltf-binary\r\n\r\nDATA\r\n"));
        assert!(text.ends_with("--XYZ--\r\n"));
    }

    #[test]
    fn test_response_requires_url_and_id() {
        let ok: UploadResponse = serde_json::from_str(
            r#"{"secure_url":"https://res/x.glb","public_id":"x","delete_token":"t","bytes":10}"#,
        )
        .unwrap();
        let media = into_media(ok).unwrap();
        assert_eq!(media.delete_token.as_deref(), Some("t"));

        let missing: UploadResponse = serde_json::from_str(r#"{"public_id":"x"}"#).unwrap();
        assert!(matches!(
            into_media(missing),
            Err(Error::UploadResponseIncomplete { field: "secure_url" })
        ));
    }
}
