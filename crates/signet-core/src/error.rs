/// Convenient result alias for `signet-core` operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur while encoding, decoding, or verifying signet artifacts.
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    /// The PEM envelope is missing its `BEGIN`/`END` markers or has the wrong label.
    #[error("malformed PEM: {0}")]
    Pem(#[from] pem::PemError),
    /// The PEM body decoded to fewer than 32 bytes — too short to contain a key.
    #[error("key material too short: expected at least 32 bytes, got {0}")]
    KeyTooShort(usize),
    /// The 32-byte key material was rejected by `ed25519-dalek`.
    #[error("invalid ed25519 key bytes")]
    InvalidKeyBytes,
    /// A Base64 field (signature) failed to decode.
    #[error("malformed base64: {0}")]
    Base64(#[from] base64::DecodeError),
    /// A signature was not exactly 64 bytes after Base64 decoding.
    #[error("signature must be 64 bytes, got {0}")]
    SignatureLength(usize),
    /// Ed25519 verification failed against the supplied public key.
    #[error("ed25519 signature verification failed")]
    SignatureInvalid,
    /// Metadata JSON could not be parsed.
    #[error("malformed metadata: {0}")]
    Metadata(#[from] serde_json::Error),
    /// The artifact's SHA-256 digest did not match the metadata checksum.
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },
    /// Filesystem I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
