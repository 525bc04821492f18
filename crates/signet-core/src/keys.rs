//! PEM-encoded Ed25519 keypairs.
//!
//! The wire format is a conforming PEM envelope (`-----BEGIN ... KEY-----`)
//! whose Base64 body may hold either the raw 32-byte key or a PKCS8/SPKI DER
//! wrapper. The last 32 bytes of the decoded body are always the key
//! material for Ed25519 — that's the only part of the DER structure this
//! pipeline relies on, so the "take the trailing 32 bytes" fallback below is
//! correct for both forms without a full ASN.1 parser.

use crate::error::{CoreError, Result};
use ed25519_dalek::{SigningKey, VerifyingKey};

const PRIVATE_KEY_TAG: &str = "PRIVATE KEY";
const PUBLIC_KEY_TAG: &str = "PUBLIC KEY";

fn trailing_32(bytes: &[u8]) -> Result<[u8; 32]> {
    if bytes.len() < 32 {
        return Err(CoreError::KeyTooShort(bytes.len()));
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes[bytes.len() - 32..]);
    Ok(out)
}

/// Parse an Ed25519 signing key from a `PRIVATE KEY` PEM document.
pub fn parse_private_key_pem(contents: &str) -> Result<SigningKey> {
    let parsed = pem::parse(contents)?;
    let seed = trailing_32(parsed.contents())?;
    Ok(SigningKey::from_bytes(&seed))
}

/// Encode an Ed25519 seed as a `PRIVATE KEY` PEM document.
pub fn encode_private_key_pem(signing_key: &SigningKey) -> String {
    let block = pem::Pem::new(PRIVATE_KEY_TAG, signing_key.to_bytes().to_vec());
    pem::encode(&block)
}

/// Parse an Ed25519 verifying key from a `PUBLIC KEY` PEM document.
pub fn parse_public_key_pem(contents: &str) -> Result<VerifyingKey> {
    let parsed = pem::parse(contents)?;
    let raw = trailing_32(parsed.contents())?;
    VerifyingKey::from_bytes(&raw).map_err(|_| CoreError::InvalidKeyBytes)
}

/// Encode an Ed25519 public key as a `PUBLIC KEY` PEM document.
pub fn encode_public_key_pem(verifying_key: &VerifyingKey) -> String {
    let block = pem::Pem::new(PUBLIC_KEY_TAG, verifying_key.to_bytes().to_vec());
    pem::encode(&block)
}

/// Generate a fresh Ed25519 keypair.
pub fn generate_keypair<R: rand::CryptoRng + rand::RngCore>(rng: &mut R) -> SigningKey {
    SigningKey::generate(rng)
}
