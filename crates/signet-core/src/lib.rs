//! Shared crypto primitives, PEM codec, and wire types for the signet
//! three-party signed binary distribution pipeline.
//!
//! This crate implements the invariants every agent (publisher, relay,
//! installer) depends on: `checksum == SHA256(artifact)` and
//! `Verify(public_key, artifact, signature) == true`. Any (artifact,
//! metadata) pair violating either condition is rejected by
//! [`Metadata::verify_integrity`].

mod crypto;
mod error;
mod keys;
mod metadata;

pub use crypto::{sha256_hex, sign_base64, verify_base64};
pub use error::{CoreError, Result};
pub use keys::{
    encode_private_key_pem, encode_public_key_pem, generate_keypair, parse_private_key_pem,
    parse_public_key_pem,
};
pub use metadata::Metadata;

pub use ed25519_dalek::{SigningKey, VerifyingKey};
