//! Build metadata carried alongside every artifact.

use crate::crypto::{sha256_hex, verify_base64};
use crate::error::{CoreError, Result};
use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};

/// Metadata describing a published artifact.
///
/// `signature` covers the raw artifact bytes directly, not this struct's own
/// serialized form — the metadata is a cover letter, not part of the signed
/// payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub version: String,
    pub build_time: String,
    pub checksum: String,
    pub platform: String,
    pub signature: String,
}

impl Metadata {
    /// Verify both invariants the pipeline relies on: the checksum matches
    /// `artifact`, and the signature is a valid Ed25519 signature over
    /// `artifact` under `public_key`. Checksum is checked first so a
    /// mismatch is reported with both digests rather than a generic
    /// signature failure.
    pub fn verify_integrity(&self, artifact: &[u8], public_key: &VerifyingKey) -> Result<()> {
        let actual = sha256_hex(artifact);
        if actual != self.checksum {
            return Err(CoreError::ChecksumMismatch {
                expected: self.checksum.clone(),
                actual,
            });
        }
        verify_base64(public_key, artifact, &self.signature)
    }

    /// Parse metadata from its JSON wire form.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Serialize metadata to pretty-printed JSON, matching the form persisted
    /// to `latest.json` on the relay.
    pub fn to_json_pretty(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Serialize metadata to compact JSON, matching the form carried in the
    /// publisher's multipart `metadata` field.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::sign_base64;
    use ed25519_dalek::SigningKey;
    use rand::rngs::OsRng;

    fn sample(artifact: &[u8], signing_key: &SigningKey) -> Metadata {
        Metadata {
            version: "20260101-000000".into(),
            build_time: "2026-01-01 00:00:00".into(),
            checksum: sha256_hex(artifact),
            platform: "darwin/arm64".into(),
            signature: sign_base64(signing_key, artifact),
        }
    }

    #[test]
    fn metadata_json_round_trips() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let artifact = b"binary contents";
        let metadata = sample(artifact, &signing_key);

        let bytes = metadata.to_json().unwrap();
        let parsed = Metadata::from_json(&bytes).unwrap();
        assert_eq!(parsed, metadata);
    }

    #[test]
    fn verify_integrity_accepts_valid_pair() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let artifact = b"binary contents";
        let metadata = sample(artifact, &signing_key);
        assert!(metadata
            .verify_integrity(artifact, &signing_key.verifying_key())
            .is_ok());
    }

    #[test]
    fn verify_integrity_rejects_checksum_mismatch() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let artifact = b"binary contents";
        let metadata = sample(artifact, &signing_key);
        let err = metadata
            .verify_integrity(b"different contents", &signing_key.verifying_key())
            .unwrap_err();
        assert!(matches!(err, CoreError::ChecksumMismatch { .. }));
    }

    #[test]
    fn verify_integrity_rejects_forged_signature_over_different_bytes() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let artifact = b"binary contents";
        // Sign different bytes but report the real artifact's checksum —
        // checksum check passes, signature check must still fail.
        let mut metadata = sample(artifact, &signing_key);
        metadata.signature = sign_base64(&signing_key, b"other bytes entirely");

        let err = metadata
            .verify_integrity(artifact, &signing_key.verifying_key())
            .unwrap_err();
        assert!(matches!(err, CoreError::SignatureInvalid));
    }
}
