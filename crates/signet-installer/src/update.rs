//! Downloads, verifies, and stages a new artifact before it is handed to
//! [`crate::swap`] for installation.

use crate::error::{InstallerError, Result};
use signet_core::{Metadata, VerifyingKey};
use std::path::PathBuf;
use std::time::Duration;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn build_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()
}

/// GET `/latest`. Returns `Ok(None)` on a 404 (no version published yet) so
/// callers can treat "nothing to do" distinctly from a transport failure.
pub async fn fetch_latest(client: &reqwest::Client, relay_url: &str) -> Result<Option<Metadata>> {
    let url = format!("{}/latest", relay_url.trim_end_matches('/'));
    let response = client.get(&url).send().await?;
    if response.status() == reqwest::StatusCode::NOT_FOUND {
        return Ok(None);
    }
    let response = response.error_for_status()?;
    let bytes = response.bytes().await?;
    Ok(Some(serde_json::from_slice(&bytes)?))
}

/// Download `/download`, verify checksum and Ed25519 signature against
/// `public_key`, and stage the verified bytes to `{temp_dir}/signet-new`
/// with mode `0755`. Returns the staged path.
///
/// A signature failure is logged distinctly from a checksum failure: it
/// indicates the relay served bytes under forged provenance, which a
/// corrupted-in-transit checksum failure does not imply.
pub async fn download_and_stage(
    client: &reqwest::Client,
    relay_url: &str,
    metadata: &Metadata,
    public_key: &VerifyingKey,
) -> Result<PathBuf> {
    let url = format!("{}/download", relay_url.trim_end_matches('/'));
    let response = client.get(&url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?.to_vec();

    if let Err(err) = metadata.verify_integrity(&bytes, public_key) {
        if matches!(err, signet_core::CoreError::ChecksumMismatch { .. }) {
            tracing::error!(%err, "downloaded artifact checksum mismatch, aborting update");
        } else {
            tracing::error!(%err, "downloaded artifact signature invalid, possible injection attempt");
        }
        return Err(InstallerError::IntegrityFailed(err));
    }

    stage_bytes(&bytes)
}

fn stage_bytes(bytes: &[u8]) -> Result<PathBuf> {
    let path = std::env::temp_dir().join("signet-new");
    std::fs::write(&path, bytes)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
    }

    Ok(path)
}
