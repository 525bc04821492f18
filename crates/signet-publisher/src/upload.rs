use crate::error::{PublisherError, Result};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use signet_core::Metadata;
use std::time::Duration;

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// POST the artifact and its metadata to `{relay_url}/upload`. A 2xx status
/// is success; anything else is a transport error carrying the response
/// body, matching the relay's convention of returning a short message in the
/// body rather than structured error detail.
pub fn upload(
    relay_url: &str,
    token: &str,
    binary_name: &str,
    artifact: &[u8],
    metadata: &Metadata,
) -> Result<String> {
    let metadata_json = serde_json::to_string(metadata)?;

    let form = Form::new()
        .text("token", token.to_string())
        .text("version", metadata.version.clone())
        .text("metadata", metadata_json)
        .part(
            "file",
            Part::bytes(artifact.to_vec()).file_name(binary_name.to_string()),
        );

    let client = Client::builder().timeout(UPLOAD_TIMEOUT).build()?;

    let url = format!("{}/upload", relay_url.trim_end_matches('/'));
    let response = client.post(&url).multipart(form).send()?;

    let status = response.status();
    let body = response.text().unwrap_or_default();

    if !status.is_success() {
        return Err(PublisherError::RelayRejected { status, body });
    }

    Ok(body)
}
