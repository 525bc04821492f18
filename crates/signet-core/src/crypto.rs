//! SHA-256 digests and Ed25519 signing/verification over raw artifact bytes.

use crate::error::{CoreError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 digest of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Sign `bytes` and return the Base64-encoded Ed25519 signature.
pub fn sign_base64(signing_key: &SigningKey, bytes: &[u8]) -> String {
    let signature: Signature = signing_key.sign(bytes);
    STANDARD.encode(signature.to_bytes())
}

/// Decode a Base64 Ed25519 signature and verify it over `bytes`.
pub fn verify_base64(verifying_key: &VerifyingKey, bytes: &[u8], signature_b64: &str) -> Result<()> {
    let raw = STANDARD.decode(signature_b64.as_bytes())?;
    let array: [u8; 64] = raw
        .try_into()
        .map_err(|v: Vec<u8>| CoreError::SignatureLength(v.len()))?;
    let signature = Signature::from_bytes(&array);
    verifying_key
        .verify(bytes, &signature)
        .map_err(|_| CoreError::SignatureInvalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::SigningKey;
    use rand::rngs::OsRng;

    #[test]
    fn sign_then_verify_succeeds() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let verifying_key = signing_key.verifying_key();
        let data = b"artifact bytes";

        let sig = sign_base64(&signing_key, data);
        assert!(verify_base64(&verifying_key, data, &sig).is_ok());
    }

    #[test]
    fn tampered_bytes_fail_verification() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let verifying_key = signing_key.verifying_key();
        let sig = sign_base64(&signing_key, b"original");
        assert!(verify_base64(&verifying_key, b"tampered", &sig).is_err());
    }

    #[test]
    fn tampered_signature_fails_verification() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let verifying_key = signing_key.verifying_key();
        let mut sig = sign_base64(&signing_key, b"data");
        // Flip a character in the base64 signature.
        let mut chars: Vec<char> = sig.chars().collect();
        let last = chars.len() - 1;
        chars[last] = if chars[last] == 'A' { 'B' } else { 'A' };
        sig = chars.into_iter().collect();
        assert!(verify_base64(&verifying_key, b"data", &sig).is_err());
    }

    #[test]
    fn wrong_key_fails_verification() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let other_key = SigningKey::generate(&mut OsRng);
        let sig = sign_base64(&signing_key, b"data");
        assert!(verify_base64(&other_key.verifying_key(), b"data", &sig).is_err());
    }

    #[test]
    fn sha256_hex_matches_known_vector() {
        // SHA-256("") = e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
